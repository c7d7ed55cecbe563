/// Simulated playback engine
///
/// Plays nothing. A timer task walks the position through the track and
/// reports progress and completion the way a real output would.
use crate::config::EngineSettings;
use soul_session::{EngineEventSink, MediaMetadata, PlaybackEngine, PlaybackState};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub struct SimulatedEngine {
    sink: EngineEventSink,
    runtime: Handle,
    tick: Duration,
    speed: f64,

    /// Track currently loaded
    current: Option<MediaMetadata>,

    /// Position in the loaded track, shared with the timer task
    position_ms: Arc<AtomicU64>,

    paused: bool,
    timer: Option<JoinHandle<()>>,
}

impl SimulatedEngine {
    /// Create an engine on the current tokio runtime
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn new(sink: EngineEventSink, settings: &EngineSettings) -> Self {
        Self {
            sink,
            runtime: Handle::current(),
            tick: settings.tick(),
            speed: settings.speed,
            current: None,
            position_ms: Arc::new(AtomicU64::new(0)),
            paused: false,
            timer: None,
        }
    }

    /// Position in the loaded track
    pub fn position(&self) -> Duration {
        Duration::from_millis(self.position_ms.load(Ordering::Relaxed))
    }

    fn start_timer(&mut self, duration_ms: u64) {
        self.cancel_timer();

        let sink = self.sink.clone();
        let position_ms = Arc::clone(&self.position_ms);
        let tick = self.tick;
        let step_ms = ((tick.as_millis() as f64) * self.speed).max(1.0) as u64;

        self.timer = Some(self.runtime.spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // First tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;

                let position = position_ms.fetch_add(step_ms, Ordering::Relaxed) + step_ms;
                if position >= duration_ms {
                    position_ms.store(duration_ms, Ordering::Relaxed);
                    sink.seek_progress(duration_ms, duration_ms);
                    sink.playback_complete();
                    break;
                }
                sink.seek_progress(position, duration_ms);
            }
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl PlaybackEngine for SimulatedEngine {
    fn play_from_media(&mut self, metadata: &MediaMetadata) {
        let resume = self.paused
            && self
                .current
                .as_ref()
                .is_some_and(|current| current.media_id == metadata.media_id);

        if resume {
            info!("Resuming {} at {:?}", metadata.media_id, self.position());
        } else {
            info!("Playing {} ({})", metadata.media_id, metadata.title);
            self.position_ms.store(0, Ordering::Relaxed);
            self.current = Some(metadata.clone());
        }
        self.paused = false;

        let duration_ms = metadata.duration.as_millis() as u64;
        self.sink
            .state_changed(PlaybackState::Playing, self.position_ms.load(Ordering::Relaxed));
        self.sink.now_playing(metadata.media_id.clone());
        self.start_timer(duration_ms);
    }

    fn pause(&mut self) {
        if self.current.is_none() || self.paused {
            debug!("Nothing playing, pause ignored");
            return;
        }
        self.cancel_timer();
        self.paused = true;
        self.sink
            .state_changed(PlaybackState::Paused, self.position_ms.load(Ordering::Relaxed));
    }

    fn stop(&mut self) {
        self.cancel_timer();
        self.current = None;
        self.paused = false;
        self.position_ms.store(0, Ordering::Relaxed);
        self.sink.state_changed(PlaybackState::Stopped, 0);
    }

    fn seek_to(&mut self, position: Duration) {
        let Some(current) = &self.current else {
            debug!("Nothing loaded, seek ignored");
            return;
        };
        let duration_ms = current.duration.as_millis() as u64;
        let target = (position.as_millis() as u64).min(duration_ms);

        self.position_ms.store(target, Ordering::Relaxed);
        self.sink.seek_progress(target, duration_ms);
    }
}

impl Drop for SimulatedEngine {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
