//! Browse roots
//!
//! Only the trusted client may list the library; every other client gets an
//! empty root.

use crate::library::MediaLibrary;
use crate::types::MediaMetadata;
use serde::{Deserialize, Serialize};

/// Root handed to a browsing client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowseRoot {
    /// Client may list every playable item
    Playable,

    /// Client may connect but sees nothing
    Empty,
}

impl BrowseRoot {
    /// Pick the root for `client_id`
    pub fn for_client(client_id: &str, trusted_client_id: &str) -> Self {
        if client_id == trusted_client_id {
            BrowseRoot::Playable
        } else {
            BrowseRoot::Empty
        }
    }
}

/// Children of `root`
pub fn load_children(root: BrowseRoot, library: &dyn MediaLibrary) -> Vec<MediaMetadata> {
    match root {
        BrowseRoot::Playable => library.items(),
        BrowseRoot::Empty => Vec::new(),
    }
}
