//! Structured error types for xlviewport.
//!
//! Every variant is non-recoverable for the current request. The message is
//! client-facing and the HTTP layer passes it through verbatim.

use crate::types::SelectionKind;

/// All errors that can occur while resolving a viewport request.
#[derive(Debug, thiserror::Error)]
pub enum ViewportError {
    /// Missing or invalid request parameter.
    #[error("{0}")]
    Validation(String),

    /// Malformed selection, anchor, window or navigation token.
    #[error("{0}")]
    Parse(String),

    /// Anchor not legal for the selection kind.
    #[error("Invalid anchor {anchor} for {kind}")]
    InvalidAnchor {
        anchor: crate::types::Anchor,
        kind: SelectionKind,
    },

    /// Patch or range-based mutation addressed outside its scope.
    #[error("{0}")]
    Scope(String),

    /// Label does not resolve to a stored mapping.
    #[error("Unknown label {0}")]
    UnknownLabel(String),

    /// Grid configuration rejected.
    #[error("Invalid config: {0}")]
    Config(String),

    /// JSON (de)serialization failure on one of the JSON surfaces.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ViewportError>;

impl ViewportError {
    /// A `Parse` error for text that is not a valid `what`.
    pub(crate) fn invalid(what: impl std::fmt::Display, text: &str) -> Self {
        Self::Parse(format!("Invalid {what} {text:?}"))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<ViewportError> for wasm_bindgen::JsValue {
    fn from(e: ViewportError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
