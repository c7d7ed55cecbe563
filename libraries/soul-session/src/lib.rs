//! Soul Player - Media Session
//!
//! Playback queue and session state machine for Soul Player.
//!
//! This crate provides:
//! - Session playlist with a wrapping cursor
//! - Session state machine (prepare, play, pause, stop, skip, seek)
//! - Auto-advance on track completion, with storm protection
//! - Typed command and event unions
//! - A single-writer service that serializes commands and engine reports
//!
//! # Architecture
//!
//! `soul-session` does not decode or output audio and does not store the
//! library. Both are collaborators handed in at construction:
//! - [`PlaybackEngine`] plays tracks and reports back through an
//!   [`EngineEventSink`]
//! - [`MediaLibrary`] resolves media ids to metadata
//!
//! # Example: Driving a session
//!
//! ```rust
//! use soul_session::{
//!     InMemoryLibrary, MediaMetadata, PlaybackEngine, SessionConfig, SessionService,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! struct SilentEngine;
//!
//! impl PlaybackEngine for SilentEngine {
//!     fn play_from_media(&mut self, _metadata: &MediaMetadata) {}
//!     fn pause(&mut self) {}
//!     fn stop(&mut self) {}
//!     fn seek_to(&mut self, _position: Duration) {}
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> soul_session::Result<()> {
//! let track = MediaMetadata {
//!     media_id: "track1".into(),
//!     title: "My Song".to_string(),
//!     artist: "Artist Name".to_string(),
//!     album: None,
//!     duration: Duration::from_secs(180),
//!     uri: "file:///music/song.mp3".to_string(),
//! };
//! let library: InMemoryLibrary = [track.clone()].into_iter().collect();
//!
//! let session = SessionService::spawn(
//!     Arc::new(library),
//!     |_sink| SilentEngine,
//!     SessionConfig::default(),
//! );
//!
//! session.add_queue_item(track.description()).await?;
//! session.play().await?;
//!
//! let snapshot = session.snapshot().await?;
//! assert!(snapshot.active);
//! # Ok(())
//! # }
//! ```

mod browse;
mod command;
mod config;
mod controller;
mod engine;
mod error;
mod events;
mod guard;
mod library;
mod queue;
mod service;
pub mod types;

// Public exports
pub use browse::{load_children, BrowseRoot};
pub use command::{PlayFromMediaIdRequest, SessionCommand};
pub use config::SessionConfig;
pub use controller::{SessionController, SessionSnapshot};
pub use engine::{EngineEvent, EngineEventSink, PlaybackEngine};
pub use error::{Result, SessionError};
pub use events::SessionEvent;
pub use guard::AutoAdvanceGuard;
pub use library::{InMemoryLibrary, MediaLibrary};
pub use queue::{Queue, Removal};
pub use service::{SessionHandle, SessionService};
pub use types::{
    MediaDescription, MediaId, MediaMetadata, PlaybackState, PlaylistItem, QueueKey,
};
