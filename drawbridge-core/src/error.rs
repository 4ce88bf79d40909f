//! Domain-specific error types for the drawbridge protocol layer.
//!
//! Errors fall into two families:
//! - **transport-fatal**: the frame boundary itself can no longer be
//!   trusted (short reads, malformed frames, unroutable tags, I/O on the
//!   control channel). The server loop stops and the process exits.
//! - **request-recoverable**: a single request could not be carried out
//!   (backend rejection, bad geometry, draw channel failure). These are
//!   turned into an `Rerror` reply and the session continues.

use thiserror::Error;

/// The canonical error type for drawbridge.
#[derive(Debug, Error)]
pub enum DrawError {
    // ── Transport Errors (fatal) ─────────────────────────────────
    /// The control channel reported an I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The control channel closed in the middle of a frame.
    #[error("message too short: expected {expected} bytes, got {actual}")]
    MessageTooShort { expected: usize, actual: usize },

    /// A frame could not be parsed into a message.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// A numeric value did not map to any known enum variant.
    #[error("unknown {type_name} discriminant: {value:#x}")]
    UnknownVariant { type_name: &'static str, value: u64 },

    /// The declared frame length exceeds the reader limit.
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    // ── Request Errors (recoverable) ─────────────────────────────
    /// The display backend rejected the call.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The window geometry string of an `init` request is malformed.
    #[error("{0}")]
    Geometry(String),

    /// A window operation arrived before `init` created a window.
    #[error("no window: init not received")]
    NoWindow,

    /// The auxiliary draw-data channel failed.
    #[error("draw channel: {0}")]
    DrawChannel(std::io::Error),
}

impl DrawError {
    /// Returns `true` if the error invalidates the session.
    ///
    /// Fatal errors are never answered with a reply: the frame boundary
    /// is no longer reliable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DrawError::Io(_)
                | DrawError::MessageTooShort { .. }
                | DrawError::InvalidMessage(_)
                | DrawError::UnknownVariant { .. }
                | DrawError::FrameTooLarge { .. }
        )
    }

    /// Shorthand for building an [`DrawError::InvalidMessage`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        DrawError::InvalidMessage(reason.into())
    }
}

// ── BackendError ─────────────────────────────────────────────────

/// Error reported by a [`DisplayBackend`] call.
///
/// Carries the backend's own human-readable description, which ends up
/// verbatim in the `Rerror` reply.
///
/// [`DisplayBackend`]: crate::backend::DisplayBackend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        BackendError(message.into())
    }
}

impl From<&str> for BackendError {
    fn from(s: &str) -> Self {
        BackendError(s.to_string())
    }
}

impl From<String> for BackendError {
    fn from(s: String) -> Self {
        BackendError(s)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DrawError>;
