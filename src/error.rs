//! Structured error types for isolated-scroll.
//!
//! Event handling itself never fails: a missing element or a disabled widget
//! simply lets events pass. Errors come from precondition violations while
//! wiring the widget up (child count, margins, malformed props) and from the
//! scenario tooling.

use crate::boundary::Edge;

/// All errors that can occur while configuring or hosting the widget.
#[derive(Debug, thiserror::Error)]
pub enum IsolatedScrollError {
    /// The widget wraps exactly one scrollable child.
    #[error("expected exactly one child element, found {0}")]
    ChildCount(usize),

    /// A boundary margin was negative or not a number.
    #[error("invalid {edge} margin: {value}")]
    InvalidMargin { edge: Edge, value: f64 },

    /// Props object could not be interpreted.
    #[error("invalid props: {0}")]
    InvalidProps(String),

    /// DOM call failed (listener registration, attribute write).
    #[error("DOM error: {0}")]
    Dom(String),

    /// Scenario (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IsolatedScrollError>;

#[cfg(target_arch = "wasm32")]
impl From<IsolatedScrollError> for wasm_bindgen::JsValue {
    fn from(e: IsolatedScrollError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
