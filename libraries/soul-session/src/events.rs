//! Session Events
//!
//! Event-based communication for controllers and UIs observing a session.
//! Events are emitted at key points:
//! - State changes (reported by the engine, plus prepare and failures)
//! - Seek progress (periodic, forwarded from the engine)
//! - Now-playing changes (forwarded from the engine)
//! - Metadata, queue and activity changes caused by commands

use crate::types::{MediaId, MediaMetadata, PlaybackState, PlaylistItem};
use serde::{Deserialize, Serialize};

/// Events emitted by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
        /// Position reported with the change
        position_ms: u64,
    },

    /// Seek bar update
    SeekProgress {
        /// Current position
        progress_ms: u64,
        /// Track length
        max_ms: u64,
    },

    /// The engine switched to a different media id
    NowPlayingChanged { media_id: MediaId },

    /// Prepared metadata replaced
    MetadataChanged { metadata: Option<MediaMetadata> },

    /// Queue edited
    QueueChanged {
        items: Vec<PlaylistItem>,
        current_index: Option<usize>,
    },

    /// Session became active or inactive
    ActiveChanged { active: bool },

    /// Playback gave up (engine error, or tracks failing back to back)
    PlaybackFailed { reason: String },
}

impl SessionEvent {
    /// Short name, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::StateChanged { .. } => "state_changed",
            SessionEvent::SeekProgress { .. } => "seek_progress",
            SessionEvent::NowPlayingChanged { .. } => "now_playing_changed",
            SessionEvent::MetadataChanged { .. } => "metadata_changed",
            SessionEvent::QueueChanged { .. } => "queue_changed",
            SessionEvent::ActiveChanged { .. } => "active_changed",
            SessionEvent::PlaybackFailed { .. } => "playback_failed",
        }
    }
}
