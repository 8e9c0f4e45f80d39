//! Browser glue: binds the host page to a [`GameController`] and drives it from
//! a `requestAnimationFrame` loop.
//!
//! The controller lives in a thread-local; every listener and the frame loop
//! borrow it for the duration of one callback, which is all the coordination a
//! single-threaded page needs.

pub mod dom;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, MouseEvent, window};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::GameController;
use crate::random::SeededRandom;
use dom::DomSurface;

// Mounted controller; `None` until `mount` succeeds.
thread_local! {
    static GAME: RefCell<Option<GameController<DomSurface>>> = RefCell::new(None);
}

/// Run `f` against the mounted controller, if any.
fn with_game(f: impl FnOnce(&mut GameController<DomSurface>)) {
    GAME.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => {
            if let Some(game) = slot.as_mut() {
                f(game);
            }
        }
        Err(_) => log::debug!("game busy; event dropped"),
    });
}

/// Bind to the page described by `config.ids` and start the frame loop.
/// Mounting twice swaps the controller but keeps the first set of listeners.
pub fn mount(config: GameConfig) -> Result<(), GameError> {
    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;

    let surface = DomSurface::bind(&doc, &config.ids)?;
    let target = surface.target().clone();
    let restart = doc.get_element_by_id(&config.ids.restart);
    let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

    let controller = GameController::new(config, surface, SeededRandom::new(seed));
    let previous = GAME.with(|cell| cell.replace(Some(controller)));
    if previous.is_some() {
        log::warn!("game remounted; reusing existing listeners");
        return Ok(());
    }
    log::info!("game mounted (seed {seed})");

    listen(&target, "click", |_evt| {
        let now = crate::performance_now();
        with_game(|g| g.handle_primary_click(now));
    })?;
    listen(&target, "dblclick", |_evt| with_game(|g| g.reset_round()))?;
    match restart {
        Some(btn) => listen(&btn, "click", |_evt| with_game(|g| g.reset_round()))?,
        None => log::debug!("no restart control on page"),
    }
    listen(&doc, "mousemove", |evt| {
        with_game(|g| {
            let pointer = g.surface().area_point(evt.client_x() as f64, evt.client_y() as f64);
            g.handle_pointer_move(pointer);
        })
    })?;

    start_frame_loop();
    Ok(())
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(MouseEvent) + 'static,
) -> Result<(), GameError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(cb: &FrameCallback) {
    if let (Some(w), Some(closure)) = (window(), cb.borrow().as_ref()) {
        w.request_animation_frame(closure.as_ref().unchecked_ref()).ok();
    }
}

// The one ticking source: every frame advances the round's timers.
fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_game(|game| game.advance(ts));
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}
