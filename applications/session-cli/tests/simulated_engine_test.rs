//! Simulated engine driven through a real session
//!
//! Runs with paused tokio time so the engine's timer is deterministic.

use soul_session::{
    InMemoryLibrary, MediaId, MediaMetadata, PlaybackState, SessionConfig, SessionEvent,
    SessionHandle, SessionService,
};
use soul_session_cli::{config::EngineSettings, engine::SimulatedEngine};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

// ===== Test Helpers =====

fn create_track(id: &str, duration_ms: u64) -> MediaMetadata {
    MediaMetadata {
        media_id: MediaId::new(id),
        title: format!("Track {}", id),
        artist: "Test Artist".to_string(),
        album: None,
        duration: Duration::from_millis(duration_ms),
        uri: format!("file:///music/{}.mp3", id),
    }
}

fn spawn_session(tracks: Vec<MediaMetadata>) -> SessionHandle {
    let library: InMemoryLibrary = tracks.into_iter().collect();
    let settings = EngineSettings {
        tick_ms: 250,
        speed: 1.0,
    };
    SessionService::spawn(
        Arc::new(library),
        move |sink| SimulatedEngine::new(sink, &settings),
        SessionConfig::default(),
    )
}

async fn wait_for<F>(rx: &mut broadcast::Receiver<SessionEvent>, mut predicate: F) -> SessionEvent
where
    F: FnMut(&SessionEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(60), async {
        loop {
            let event = rx.recv().await.unwrap();
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("event not published in time")
}

// ===== Tests =====

#[tokio::test(start_paused = true)]
async fn test_track_end_advances_to_next() {
    let session = spawn_session(vec![create_track("a", 1000), create_track("b", 1000)]);
    let mut rx = session.subscribe();

    session.add_queue_item(create_track("a", 1000).description()).await.unwrap();
    session.add_queue_item(create_track("b", 1000).description()).await.unwrap();
    session.play().await.unwrap();

    let progress = wait_for(&mut rx, |event| {
        matches!(event, SessionEvent::SeekProgress { .. })
    })
    .await;
    assert_eq!(
        progress,
        SessionEvent::SeekProgress {
            progress_ms: 250,
            max_ms: 1000
        }
    );

    let next = wait_for(&mut rx, |event| {
        matches!(event, SessionEvent::NowPlayingChanged { media_id } if media_id.as_str() == "b")
    })
    .await;
    assert_eq!(
        next,
        SessionEvent::NowPlayingChanged {
            media_id: MediaId::new("b")
        }
    );

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.current_index, Some(1));
    assert_eq!(snapshot.state, PlaybackState::Playing);
}

#[tokio::test(start_paused = true)]
async fn test_pause_and_resume_keep_position() {
    let session = spawn_session(vec![create_track("a", 10_000)]);
    let mut rx = session.subscribe();

    session.add_queue_item(create_track("a", 10_000).description()).await.unwrap();
    session.play().await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    session.pause().await.unwrap();
    let paused_at = match wait_for(&mut rx, |event| {
        matches!(
            event,
            SessionEvent::StateChanged {
                state: PlaybackState::Paused,
                ..
            }
        )
    })
    .await
    {
        SessionEvent::StateChanged { position_ms, .. } => position_ms,
        other => panic!("unexpected event {:?}", other),
    };
    assert!((250..=600).contains(&paused_at), "paused at {}", paused_at);

    session.play().await.unwrap();
    let resumed = wait_for(&mut rx, |event| {
        matches!(
            event,
            SessionEvent::StateChanged {
                state: PlaybackState::Playing,
                ..
            }
        )
    })
    .await;
    assert_eq!(
        resumed,
        SessionEvent::StateChanged {
            state: PlaybackState::Playing,
            position_ms: paused_at
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_seek_is_clamped_to_track_length() {
    let session = spawn_session(vec![create_track("a", 10_000)]);

    session.add_queue_item(create_track("a", 10_000).description()).await.unwrap();
    session.play().await.unwrap();
    let mut rx = session.subscribe();

    session.seek_to(Duration::from_secs(60)).await.unwrap();

    let event = wait_for(&mut rx, |event| {
        matches!(event, SessionEvent::SeekProgress { progress_ms: 10_000, .. })
    })
    .await;
    assert_eq!(
        event,
        SessionEvent::SeekProgress {
            progress_ms: 10_000,
            max_ms: 10_000
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_stop_reports_stopped() {
    let session = spawn_session(vec![create_track("a", 10_000)]);
    let mut rx = session.subscribe();

    session.add_queue_item(create_track("a", 10_000).description()).await.unwrap();
    session.play().await.unwrap();
    session.stop().await.unwrap();

    wait_for(&mut rx, |event| {
        matches!(
            event,
            SessionEvent::StateChanged {
                state: PlaybackState::Stopped,
                position_ms: 0
            }
        )
    })
    .await;

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Stopped);
    assert!(!snapshot.active);
}
