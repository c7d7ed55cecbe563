//! Core types for session control

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// Media identifier, as known to the media library
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    /// Create a new media ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MediaId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Full metadata of a track, as handed to the playback engine
///
/// Looked up from the library when a track is prepared; the controller never
/// fabricates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Library identifier
    pub media_id: MediaId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (optional)
    #[serde(default)]
    pub album: Option<String>,

    /// Track duration
    #[serde(rename = "duration_ms", with = "duration_millis")]
    pub duration: Duration,

    /// Where the engine reads the audio from
    pub uri: String,
}

impl MediaMetadata {
    /// Short description used to build queue items
    pub fn description(&self) -> MediaDescription {
        MediaDescription {
            media_id: self.media_id.clone(),
            title: self.title.clone(),
            subtitle: self.artist.clone(),
        }
    }
}

/// Lightweight description of a track, as sent by controllers when editing the queue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaDescription {
    pub media_id: MediaId,
    pub title: String,
    pub subtitle: String,
}

impl MediaDescription {
    /// Description carrying only an id (titles left empty)
    pub fn from_id(media_id: impl Into<String>) -> Self {
        Self {
            media_id: MediaId::new(media_id),
            title: String::new(),
            subtitle: String::new(),
        }
    }
}

/// Identity of a queue entry, derived from its description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueKey(u64);

impl QueueKey {
    /// Derive the key for a description
    pub fn of(description: &MediaDescription) -> Self {
        let mut hasher = DefaultHasher::new();
        description.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Entry of the session playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub media_id: MediaId,
    pub description: MediaDescription,
    pub key: QueueKey,
}

impl PlaylistItem {
    /// Build an item keyed by the description's identity
    pub fn new(description: MediaDescription) -> Self {
        Self {
            media_id: description.media_id.clone(),
            key: QueueKey::of(&description),
            description,
        }
    }
}

/// Playback state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaybackState {
    /// Nothing prepared yet (initial state, and after release)
    #[default]
    Idle,

    /// Metadata loaded, engine not started
    Prepared,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Stopped by the user, or after an engine failure
    Stopped,
}

/// Serializes a `Duration` as whole milliseconds
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
