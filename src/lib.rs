//! Evasive Click core crate.
//!
//! A button that runs away from the cursor for five seconds while the player
//! tries to click it as often as possible. The round logic lives in [`game`]
//! and only talks to the page through the [`surface::Surface`] trait, so it runs
//! natively (see [`surface::HeadlessSurface`]); [`web`] wires it to a real page.
//!
//! Host page contract: elements with the ids in [`config::ElementIds`], then
//! `start_game()` once the wasm module is initialised.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod game;
pub mod random;
pub mod surface;
pub mod web;

pub use config::GameConfig;
pub use error::GameError;
pub use game::{GameController, RoundPhase, Session};
pub use random::{RandomSource, SeededRandom};
pub use surface::{HeadlessSurface, Point, Size, Surface};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second init (e.g. module re-instantiated in tests) keeps the first logger.
    console_log::init_with_level(log::Level::Info).ok();
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::mount(GameConfig::default())?;
    Ok(())
}

/// Like `start_game`, with a JSON object overriding any subset of [`GameConfig`].
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    web::mount(GameConfig::from_json(json)?)?;
    Ok(())
}

/// Milliseconds on the same clock as `requestAnimationFrame` timestamps.
fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
