//! Playback engine contract
//!
//! The engine does the actual decoding and output. Every operation returns
//! immediately; the engine reports what happened later, from its own thread
//! or task, through the [`EngineEventSink`] it was built with. The sink feeds
//! the same channel the session commands go through, so engine reports never
//! touch session state directly.

use crate::service::SessionMessage;
use crate::types::{MediaId, MediaMetadata, PlaybackState};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc::WeakUnboundedSender;
use tracing::trace;

/// Platform playback engine
pub trait PlaybackEngine: Send {
    /// Begin or resume playback of `metadata`
    fn play_from_media(&mut self, metadata: &MediaMetadata);

    /// Pause playback
    fn pause(&mut self);

    /// Stop playback and release the current track
    fn stop(&mut self);

    /// Seek within the current track
    fn seek_to(&mut self, position: Duration);
}

/// Reports emitted by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Engine state changed
    StateChanged {
        state: PlaybackState,
        position_ms: u64,
    },

    /// Periodic progress while playing or seeking
    SeekProgress { progress_ms: u64, max_ms: u64 },

    /// Track reached its end naturally
    PlaybackComplete,

    /// Engine started rendering a different media id
    NowPlaying { media_id: MediaId },

    /// Engine could not play (decode error, missing file, ...)
    Error { message: String },
}

/// Handle an engine uses to report back to its session
///
/// Cheap to clone and safe to use from any thread. The sink does not keep
/// the session alive: once every `SessionHandle` is gone, reports are dropped.
#[derive(Debug, Clone)]
pub struct EngineEventSink {
    tx: WeakUnboundedSender<SessionMessage>,
}

impl EngineEventSink {
    pub(crate) fn new(tx: WeakUnboundedSender<SessionMessage>) -> Self {
        Self { tx }
    }

    /// Send a raw engine event
    pub fn send(&self, event: EngineEvent) {
        let delivered = self
            .tx
            .upgrade()
            .is_some_and(|tx| tx.send(SessionMessage::Engine(event)).is_ok());
        if !delivered {
            trace!("Session closed, dropping engine event");
        }
    }

    pub fn state_changed(&self, state: PlaybackState, position_ms: u64) {
        self.send(EngineEvent::StateChanged { state, position_ms });
    }

    pub fn seek_progress(&self, progress_ms: u64, max_ms: u64) {
        self.send(EngineEvent::SeekProgress {
            progress_ms,
            max_ms,
        });
    }

    pub fn playback_complete(&self) {
        self.send(EngineEvent::PlaybackComplete);
    }

    pub fn now_playing(&self, media_id: MediaId) {
        self.send(EngineEvent::NowPlaying { media_id });
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(EngineEvent::Error {
            message: message.into(),
        });
    }
}
