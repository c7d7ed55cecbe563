/// Executes parsed input against a running session
use crate::commands::{Input, HELP};
use anyhow::Result;
use soul_session::{
    MediaDescription, MediaId, MediaLibrary, SessionEvent, SessionHandle, SessionSnapshot,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

/// What the input loop does next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one input line
pub async fn execute(
    session: &SessionHandle,
    library: &dyn MediaLibrary,
    client_id: &str,
    input: Input,
) -> Result<Flow> {
    match input {
        Input::PlayFromId(request) => {
            session
                .play_from_media_id(request.media_id, request.reset_playlist, request.queue_position)
                .await?;
        }
        Input::Add(media_id) => {
            session
                .add_queue_item(describe(library, &media_id))
                .await?;
        }
        Input::Remove(media_id) => {
            session
                .remove_queue_item(describe(library, &media_id))
                .await?;
        }
        Input::Prepare => session.prepare().await?,
        Input::Play => session.play().await?,
        Input::Pause => session.pause().await?,
        Input::Stop => session.stop().await?,
        Input::Next => session.skip_to_next().await?,
        Input::Previous => session.skip_to_previous().await?,
        Input::Seek(position) => session.seek_to(position).await?,
        Input::Queue => {
            let snapshot = session.snapshot().await?;
            println!("{}", format_queue(&snapshot));
        }
        Input::Browse => {
            let items = session.browse(client_id).await?;
            if items.is_empty() {
                println!("(nothing to browse for client {})", client_id);
            }
            for item in items {
                println!(
                    "{:<16} {} - {} ({}s)",
                    item.media_id,
                    item.artist,
                    item.title,
                    item.duration.as_secs()
                );
            }
        }
        Input::Help => println!("{}", HELP),
        Input::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

/// Queue description for `media_id`
///
/// Uses library titles when the id is known so that `add` and `remove` of
/// the same id always produce the same queue key.
pub fn describe(library: &dyn MediaLibrary, media_id: &MediaId) -> MediaDescription {
    library
        .lookup(media_id)
        .map(|metadata| metadata.description())
        .unwrap_or_else(|| MediaDescription::from_id(media_id.as_str()))
}

pub fn format_queue(snapshot: &SessionSnapshot) -> String {
    let mut lines = vec![format!(
        "state: {:?}{}",
        snapshot.state,
        if snapshot.active { " (active)" } else { "" }
    )];

    if snapshot.queue.is_empty() {
        lines.push("(queue is empty)".to_string());
    }
    for (index, item) in snapshot.queue.iter().enumerate() {
        let marker = if snapshot.current_index == Some(index) {
            '>'
        } else {
            ' '
        };
        lines.push(format!(
            "{} {:>3}. {} {}",
            marker, index, item.media_id, item.description.title
        ));
    }

    lines.join("\n")
}

/// Print session events as JSON lines until the session goes away
pub async fn print_events(mut events: broadcast::Receiver<SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::SeekProgress {
                progress_ms,
                max_ms,
            }) => {
                debug!("Progress {}/{} ms", progress_ms, max_ms);
            }
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => println!("event: {}", json),
                Err(e) => warn!("Failed to encode {} event: {}", event.kind(), e),
            },
            Err(RecvError::Lagged(skipped)) => {
                warn!("Event printer fell behind, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
