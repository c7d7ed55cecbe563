//! Session controller - core state machine
//!
//! Owns the playlist, the prepared metadata, the playback state and the
//! session activity flag. Commands and engine reports are applied one at a
//! time by whoever owns the controller (see [`crate::SessionService`]);
//! the controller itself never spawns or locks anything.

use crate::{
    command::{PlayFromMediaIdRequest, SessionCommand},
    config::SessionConfig,
    engine::{EngineEvent, PlaybackEngine},
    error::{Result, SessionError},
    events::SessionEvent,
    guard::AutoAdvanceGuard,
    library::MediaLibrary,
    queue::{Queue, Removal},
    types::{MediaDescription, MediaId, MediaMetadata, PlaybackState, PlaylistItem},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Point-in-time copy of the session, for queries and UIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: PlaybackState,
    pub active: bool,
    pub current_index: Option<usize>,
    pub queue: Vec<PlaylistItem>,
    pub prepared: Option<MediaMetadata>,
}

/// Media session state machine
///
/// ```text
/// Idle ──prepare──> Prepared ──play──> Playing <──> Paused
///   ^                                     │
///   └──release──   Stopped <──stop────────┘  (stop: from any state)
/// ```
///
/// `Playing`, `Paused` and `Stopped` mirror what the engine reports;
/// `Prepared` is set locally because the engine never sees a prepare.
pub struct SessionController<E: PlaybackEngine> {
    // State
    state: PlaybackState,
    active: bool,
    prepared: Option<MediaMetadata>,

    // Playlist
    queue: Queue,

    // Collaborators
    library: Arc<dyn MediaLibrary>,
    engine: E,

    // Feedback loop protection for engine completions
    guard: AutoAdvanceGuard,

    // Event queue for subscribers
    pending_events: Vec<SessionEvent>,
}

impl<E: PlaybackEngine> SessionController<E> {
    /// Create a controller with an empty queue
    pub fn new(library: Arc<dyn MediaLibrary>, engine: E, config: &SessionConfig) -> Self {
        Self {
            state: PlaybackState::Idle,
            active: false,
            prepared: None,
            queue: Queue::new(),
            library,
            engine,
            guard: AutoAdvanceGuard::new(config.max_auto_advances, config.auto_advance_window()),
            pending_events: Vec::new(),
        }
    }

    /// Apply a command
    pub fn handle(&mut self, command: SessionCommand) -> Result<()> {
        match command {
            SessionCommand::PlayFromMediaId(request) => self.play_from_media_id(request),
            SessionCommand::AddQueueItem(description) => {
                self.add_queue_item(description);
                Ok(())
            }
            SessionCommand::RemoveQueueItem(description) => {
                self.remove_queue_item(&description);
                Ok(())
            }
            SessionCommand::Prepare => self.prepare(),
            SessionCommand::Play => self.play(),
            SessionCommand::Pause => {
                self.pause();
                Ok(())
            }
            SessionCommand::Stop => {
                self.stop();
                Ok(())
            }
            SessionCommand::SkipToNext => self.skip_to_next(),
            SessionCommand::SkipToPrevious => self.skip_to_previous(),
            SessionCommand::SeekTo(position) => {
                self.seek_to(position);
                Ok(())
            }
        }
    }

    // ===== Commands =====

    /// Play a library item directly
    ///
    /// The looked-up metadata becomes the prepared media without going
    /// through the queue. Nothing changes if the id is unknown or the
    /// requested queue position cannot exist.
    pub fn play_from_media_id(&mut self, request: PlayFromMediaIdRequest) -> Result<()> {
        let metadata = self.lookup(&request.media_id)?;

        let len_after_reset = if request.reset_playlist {
            0
        } else {
            self.queue.len()
        };
        if let Some(position) = request.queue_position {
            if len_after_reset > 0 && position >= len_after_reset {
                return Err(SessionError::InvalidQueuePosition {
                    position,
                    len: len_after_reset,
                });
            }
        }

        info!(
            "Play from media id {} (reset: {}, position: {:?})",
            request.media_id, request.reset_playlist, request.queue_position
        );

        self.guard.reset();

        if request.reset_playlist {
            self.queue.reset();
        }

        self.set_prepared(Some(metadata));
        self.activate();

        match request.queue_position {
            Some(position) => self.queue.select(position)?,
            None => {
                self.queue.advance();
            }
        }
        self.emit_queue_changed();

        if let Some(metadata) = self.prepared.as_ref() {
            self.engine.play_from_media(metadata);
        }
        Ok(())
    }

    /// Append an item to the playlist
    pub fn add_queue_item(&mut self, description: MediaDescription) {
        debug!(
            "Add queue item {} at position {}",
            description.media_id,
            self.queue.len()
        );
        self.queue.add(PlaylistItem::new(description));
        self.emit_queue_changed();
    }

    /// Remove the first playlist entry matching `description`
    pub fn remove_queue_item(&mut self, description: &MediaDescription) {
        let key = PlaylistItem::new(description.clone()).key;

        match self.queue.remove(key) {
            Removal::Absent => {
                debug!("Remove queue item {}: not queued", description.media_id);
            }
            Removal::Removed { current_changed } => {
                debug!("Removed queue item {}", description.media_id);
                if current_changed && self.prepared.is_some() {
                    self.set_prepared(None);
                }
                self.emit_queue_changed();
            }
        }
    }

    /// Load metadata for the current playlist item
    pub fn prepare(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            debug!("Prepare ignored, queue is empty");
            return Ok(());
        }
        self.prepare_current()
    }

    /// Start playback of the prepared media, preparing it first if needed
    pub fn play(&mut self) -> Result<()> {
        self.guard.reset();
        self.start_playback()
    }

    /// Pause playback
    ///
    /// Only forwarded while the engine reports `Playing`.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            debug!("Pause ignored in state {:?}", self.state);
            return;
        }
        self.engine.pause();
    }

    /// Stop playback and deactivate the session
    pub fn stop(&mut self) {
        info!("Stop");
        self.engine.stop();
        self.deactivate();
    }

    /// Move to the next item (wrapping) and play it
    pub fn skip_to_next(&mut self) -> Result<()> {
        self.guard.reset();
        self.step(true)
    }

    /// Move to the previous item (wrapping) and play it
    pub fn skip_to_previous(&mut self) -> Result<()> {
        self.guard.reset();
        self.step(false)
    }

    /// Seek within the current track
    pub fn seek_to(&mut self, position: Duration) {
        debug!("Seek to {:?}", position);
        self.engine.seek_to(position);
    }

    /// Tear the session down
    ///
    /// Stops the engine if the session is active and returns to `Idle` with
    /// an empty playlist.
    pub fn release(&mut self) {
        info!("Releasing session");
        if self.active {
            self.engine.stop();
        }

        let had_items = !self.queue.is_empty();
        self.queue.reset();
        if had_items {
            self.emit_queue_changed();
        }
        if self.prepared.is_some() {
            self.set_prepared(None);
        }
        self.deactivate();
        self.set_state(PlaybackState::Idle, 0);
    }

    // ===== Engine reports =====

    /// Fold an engine report into the session
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        self.handle_engine_event_at(event, Instant::now());
    }

    /// Fold an engine report that arrived at `now`
    pub fn handle_engine_event_at(&mut self, event: EngineEvent, now: Instant) {
        match event {
            EngineEvent::StateChanged { state, position_ms } => {
                self.set_state(state, position_ms);
            }
            EngineEvent::SeekProgress {
                progress_ms,
                max_ms,
            } => {
                self.pending_events.push(SessionEvent::SeekProgress {
                    progress_ms,
                    max_ms,
                });
            }
            EngineEvent::NowPlaying { media_id } => {
                debug!("Now playing {}", media_id);
                self.pending_events
                    .push(SessionEvent::NowPlayingChanged { media_id });
            }
            EngineEvent::PlaybackComplete => self.auto_advance(now),
            EngineEvent::Error { message } => {
                warn!("Engine error: {}", message);
                self.fail(message);
            }
        }
    }

    fn auto_advance(&mut self, now: Instant) {
        // Completions racing a stop must not restart playback
        if !self.active || self.state == PlaybackState::Stopped {
            debug!("Playback complete after stop, ignored");
            return;
        }

        if self.queue.is_empty() {
            debug!("Playback complete, nothing queued");
            return;
        }

        if !self.guard.try_advance(now) {
            warn!(
                "Playback completed {} times in a row, giving up",
                self.guard.recent_count() + 1
            );
            self.engine.stop();
            self.deactivate();
            self.fail("Tracks keep ending immediately after starting".to_string());
            return;
        }

        info!("Playback complete, skipping to next");
        if let Err(e) = self.step(true) {
            warn!("Auto-advance failed: {}", e);
            self.fail(e.to_string());
        }
    }

    // ===== State Queries =====

    /// Get current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the session currently accepts routed commands
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Metadata loaded for the engine, if any
    pub fn prepared_media(&self) -> Option<&MediaMetadata> {
        self.prepared.as_ref()
    }

    /// The playlist
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// The engine (for platform code that needs to reach it)
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The library the session looks metadata up in
    pub fn library(&self) -> &dyn MediaLibrary {
        self.library.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            active: self.active,
            current_index: self.queue.current_index(),
            queue: self.queue.items().to_vec(),
            prepared: self.prepared.clone(),
        }
    }

    // ===== Events =====

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn lookup(&self, media_id: &MediaId) -> Result<MediaMetadata> {
        self.library
            .lookup(media_id)
            .ok_or_else(|| SessionError::not_found(media_id))
    }

    fn prepare_current(&mut self) -> Result<()> {
        let Some(item) = self.queue.current_item() else {
            return Ok(());
        };
        let media_id = item.media_id.clone();
        let metadata = self.lookup(&media_id)?;

        debug!("Prepared {}", media_id);
        self.set_prepared(Some(metadata));
        self.activate();

        if matches!(self.state, PlaybackState::Idle | PlaybackState::Stopped) {
            self.set_state(PlaybackState::Prepared, 0);
        }
        Ok(())
    }

    fn start_playback(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            debug!("Play ignored, queue is empty");
            return Ok(());
        }

        if self.prepared.is_none() {
            self.prepare_current()?;
        }

        if self.prepared.is_none() {
            return Ok(());
        }
        self.activate();

        if let Some(metadata) = self.prepared.as_ref() {
            info!("Playing {} ({})", metadata.media_id, metadata.title);
            self.engine.play_from_media(metadata);
        }
        Ok(())
    }

    /// Move the cursor one step and play the item under it
    fn step(&mut self, forward: bool) -> Result<()> {
        let moved = if forward {
            self.queue.advance()
        } else {
            self.queue.retreat()
        };

        let Some(index) = moved else {
            debug!("Skip ignored, queue is empty");
            return Ok(());
        };

        debug!("Skipped to queue index {}", index);
        if self.prepared.is_some() {
            self.set_prepared(None);
        }
        self.emit_queue_changed();
        self.start_playback()
    }

    fn fail(&mut self, reason: String) {
        self.set_state(PlaybackState::Stopped, 0);
        self.pending_events
            .push(SessionEvent::PlaybackFailed { reason });
    }

    fn set_state(&mut self, state: PlaybackState, position_ms: u64) {
        self.state = state;
        self.pending_events
            .push(SessionEvent::StateChanged { state, position_ms });
    }

    fn set_prepared(&mut self, metadata: Option<MediaMetadata>) {
        self.prepared.clone_from(&metadata);
        self.pending_events
            .push(SessionEvent::MetadataChanged { metadata });
    }

    fn activate(&mut self) {
        if !self.active {
            self.active = true;
            self.pending_events
                .push(SessionEvent::ActiveChanged { active: true });
        }
    }

    fn deactivate(&mut self) {
        if self.active {
            self.active = false;
            self.pending_events
                .push(SessionEvent::ActiveChanged { active: false });
        }
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(SessionEvent::QueueChanged {
            items: self.queue.items().to_vec(),
            current_index: self.queue.current_index(),
        });
    }
}
