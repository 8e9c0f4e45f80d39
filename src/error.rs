//! Error types for setup and the wasm boundary.
//!
//! Runtime faults inside a round never escape the controller (see the recovery
//! path in `game`); everything here is raised while mounting onto the page.

use wasm_bindgen::JsValue;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("no window")]
    NoWindow,

    #[error("no document")]
    NoDocument,

    #[error("required element #{0} not found")]
    MissingElement(String),

    #[error("element #{0} is not an HTML element")]
    WrongElementType(String),

    /// Layout readback produced a non-finite coordinate.
    #[error("invalid target position ({x}, {y})")]
    InvalidPosition { x: f64, y: f64 },

    #[error("JS error: {0}")]
    Js(String),

    #[cfg(feature = "serde_json")]
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
