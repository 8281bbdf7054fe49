//! Error types for the pagination module
//!
//! Steady-state layout never fails: bad measurements are clamped and healed by
//! the next recompute. These errors only surface at the boundaries, when a
//! configuration is parsed or when the browser binding cannot reach the DOM.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Boundary error for configuration and host integration
#[derive(Debug, Error)]
pub enum PaginationError {
    /// A geometry value is out of range, or the page leaves no room for content
    #[error("Invalid pagination config: {0}")]
    InvalidConfig(String),

    /// Configuration or document JSON could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The host environment is missing something the binding needs
    #[error("Host error: {0}")]
    Host(String),
}

impl From<PaginationError> for JsValue {
    fn from(err: PaginationError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PaginationError>;
