//! Error types for session control

use crate::types::MediaId;
use thiserror::Error;

/// Session errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Media id has no entry in the library
    #[error("Media not found: {media_id}")]
    NotFound { media_id: MediaId },

    /// Explicit queue position outside the current queue
    #[error("Invalid queue position {position} (queue length {len})")]
    InvalidQueuePosition { position: usize, len: usize },

    /// The session service is no longer running
    #[error("Session closed")]
    SessionClosed,
}

impl SessionError {
    /// Create a not found error
    pub fn not_found(media_id: &MediaId) -> Self {
        Self::NotFound {
            media_id: media_id.clone(),
        }
    }
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
