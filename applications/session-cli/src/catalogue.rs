/// Track catalogue backing the CLI session
use anyhow::{Context, Result};
use soul_session::{InMemoryLibrary, MediaId, MediaMetadata};
use std::path::Path;
use std::time::Duration;

/// Read a JSON array of tracks
///
/// ```json
/// [{ "media_id": "t1", "title": "Intro", "artist": "Band",
///    "duration_ms": 5000, "uri": "file:///music/intro.flac" }]
/// ```
pub fn load_catalogue(path: &Path) -> Result<InMemoryLibrary> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalogue {:?}", path))?;
    parse_catalogue(&contents).with_context(|| format!("Invalid catalogue {:?}", path))
}

pub fn parse_catalogue(contents: &str) -> Result<InMemoryLibrary> {
    let tracks: Vec<MediaMetadata> = serde_json::from_str(contents)?;
    Ok(tracks.into_iter().collect())
}

/// Short tracks for trying the session out without a catalogue
pub fn demo_catalogue() -> InMemoryLibrary {
    [
        ("demo-1", "Morning Light", "The Tests", 6),
        ("demo-2", "Second Wind", "The Tests", 8),
        ("demo-3", "Loose Ends", "Quiet Fixtures", 5),
        ("demo-4", "Long Way Home", "Quiet Fixtures", 10),
    ]
    .into_iter()
    .map(|(id, title, artist, secs)| MediaMetadata {
        media_id: MediaId::new(id),
        title: title.to_string(),
        artist: artist.to_string(),
        album: Some("Demo".to_string()),
        duration: Duration::from_secs(secs),
        uri: format!("demo://{}", id),
    })
    .collect()
}
