//! Commands accepted by a session

use crate::types::{MediaDescription, MediaId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Play a library item directly, optionally starting a new playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayFromMediaIdRequest {
    pub media_id: MediaId,

    /// Discard the current playlist first
    #[serde(default)]
    pub reset_playlist: bool,

    /// Queue position of the item; when absent the cursor moves forward by one
    #[serde(default)]
    pub queue_position: Option<usize>,
}

impl PlayFromMediaIdRequest {
    pub fn new(media_id: impl Into<MediaId>) -> Self {
        Self {
            media_id: media_id.into(),
            reset_playlist: false,
            queue_position: None,
        }
    }

    /// Start a new playlist
    pub fn reset_playlist(mut self) -> Self {
        self.reset_playlist = true;
        self
    }

    /// Place the cursor at `position`
    pub fn at(mut self, position: usize) -> Self {
        self.queue_position = Some(position);
        self
    }
}

/// Session commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionCommand {
    PlayFromMediaId(PlayFromMediaIdRequest),
    AddQueueItem(MediaDescription),
    RemoveQueueItem(MediaDescription),
    Prepare,
    Play,
    Pause,
    Stop,
    SkipToNext,
    SkipToPrevious,
    SeekTo(Duration),
}
