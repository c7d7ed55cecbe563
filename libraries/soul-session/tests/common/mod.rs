//! Common test utilities and fixtures
#![allow(dead_code)]

use soul_session::{
    EngineEventSink, InMemoryLibrary, MediaDescription, MediaId, MediaMetadata, PlaybackEngine,
    PlaybackState,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Call observed by a [`RecordingEngine`]
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Play(MediaId),
    Pause,
    Stop,
    Seek(Duration),
}

/// Engine that records every call it receives
///
/// With a sink attached it also answers like a real engine would: plays
/// report `Playing` and the now-playing id, pause and stop report their
/// state.
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    calls: Arc<Mutex<Vec<EngineCall>>>,
    sink: Option<EngineEventSink>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reporting(sink: EngineEventSink) -> Self {
        Self {
            calls: Arc::default(),
            sink: Some(sink),
        }
    }

    /// Calls recorded so far
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Ids passed to `play_from_media`, in order
    pub fn plays(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::Play(id) => Some(id.as_str().to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn stops(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == EngineCall::Stop)
            .count()
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PlaybackEngine for RecordingEngine {
    fn play_from_media(&mut self, metadata: &MediaMetadata) {
        self.record(EngineCall::Play(metadata.media_id.clone()));
        if let Some(sink) = &self.sink {
            sink.state_changed(PlaybackState::Playing, 0);
            sink.now_playing(metadata.media_id.clone());
        }
    }

    fn pause(&mut self) {
        self.record(EngineCall::Pause);
        if let Some(sink) = &self.sink {
            sink.state_changed(PlaybackState::Paused, 0);
        }
    }

    fn stop(&mut self) {
        self.record(EngineCall::Stop);
        if let Some(sink) = &self.sink {
            sink.state_changed(PlaybackState::Stopped, 0);
        }
    }

    fn seek_to(&mut self, position: Duration) {
        self.record(EngineCall::Seek(position));
    }
}

pub fn create_track(id: &str) -> MediaMetadata {
    MediaMetadata {
        media_id: MediaId::new(id),
        title: format!("Track {}", id),
        artist: "Test Artist".to_string(),
        album: Some("Test Album".to_string()),
        duration: Duration::from_secs(180),
        uri: format!("file:///music/{}.mp3", id),
    }
}

pub fn describe(id: &str) -> MediaDescription {
    create_track(id).description()
}

/// Library holding one track per id
pub fn create_library(ids: &[&str]) -> Arc<InMemoryLibrary> {
    Arc::new(ids.iter().copied().map(create_track).collect())
}
