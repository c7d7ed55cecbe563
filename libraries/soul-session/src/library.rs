//! Media library contract
//!
//! The controller never owns track storage. It is handed a library at
//! construction and asks it for metadata by id.

use crate::types::{MediaId, MediaMetadata};
use std::collections::BTreeMap;

/// Lookup and enumeration of known media
pub trait MediaLibrary: Send + Sync {
    /// Metadata for `media_id`, if the library knows it
    fn lookup(&self, media_id: &MediaId) -> Option<MediaMetadata>;

    /// Every known item, in a stable order
    fn items(&self) -> Vec<MediaMetadata>;
}

/// Library held in memory, ordered by media id
#[derive(Debug, Clone, Default)]
pub struct InMemoryLibrary {
    tracks: BTreeMap<MediaId, MediaMetadata>,
}

impl InMemoryLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a track
    pub fn insert(&mut self, metadata: MediaMetadata) {
        self.tracks.insert(metadata.media_id.clone(), metadata);
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if library is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl FromIterator<MediaMetadata> for InMemoryLibrary {
    fn from_iter<I: IntoIterator<Item = MediaMetadata>>(iter: I) -> Self {
        let mut library = Self::new();
        for metadata in iter {
            library.insert(metadata);
        }
        library
    }
}

impl MediaLibrary for InMemoryLibrary {
    fn lookup(&self, media_id: &MediaId) -> Option<MediaMetadata> {
        self.tracks.get(media_id).cloned()
    }

    fn items(&self) -> Vec<MediaMetadata> {
        self.tracks.values().cloned().collect()
    }
}
