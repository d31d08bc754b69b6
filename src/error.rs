//! Error taxonomy for the canvas engine.
//!
//! ERROR HANDLING
//! ==============
//! Nothing in the engine is fatal. Gesture misses and degenerate shapes are
//! not errors at all; the variants below cover the boundaries to the outside
//! world (remote payloads, the document store, the render surface). Callers
//! log them and carry on with the current scene unchanged.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Grepable error code and retryable flag for structured log fields.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// A realtime payload or stored document could not be decoded.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    /// The document store could not be reached.
    #[error("document store request failed: {0}")]
    StoreRequest(#[from] reqwest::Error),
    /// The document store answered with a non-success status.
    #[error("document store returned {status} for {url}")]
    StoreStatus { status: u16, url: String },
    /// A drawing call on the render surface failed.
    #[error("render failed: {0}")]
    Render(String),
}

impl ErrorCode for CanvasError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedPayload(_) => "E_MALFORMED_PAYLOAD",
            Self::StoreRequest(_) => "E_STORE_REQUEST",
            Self::StoreStatus { .. } => "E_STORE_STATUS",
            Self::Render(_) => "E_RENDER",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::StoreRequest(_) => true,
            Self::StoreStatus { status, .. } => *status >= 500,
            Self::MalformedPayload(_) | Self::Render(_) => false,
        }
    }
}
