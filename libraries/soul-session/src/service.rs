//! Session service
//!
//! Hosts a [`SessionController`] on a single tokio task. Commands from
//! handles and reports from the engine arrive on the same channel and are
//! applied strictly in arrival order; events produced by each message are
//! published to subscribers before the next message is taken.

use crate::{
    browse::{load_children, BrowseRoot},
    command::{PlayFromMediaIdRequest, SessionCommand},
    config::SessionConfig,
    controller::{SessionController, SessionSnapshot},
    engine::{EngineEvent, EngineEventSink, PlaybackEngine},
    error::{Result, SessionError},
    events::SessionEvent,
    library::MediaLibrary,
    types::{MediaDescription, MediaId, MediaMetadata},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, trace, warn};

/// Messages processed by the session task
#[derive(Debug)]
pub(crate) enum SessionMessage {
    Command {
        command: SessionCommand,
        reply: Option<oneshot::Sender<Result<()>>>,
    },
    Engine(EngineEvent),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Browse {
        client_id: String,
        reply: oneshot::Sender<Vec<MediaMetadata>>,
    },
    Shutdown(oneshot::Sender<()>),
}

/// Single-writer host for a session controller
pub struct SessionService<E: PlaybackEngine> {
    controller: SessionController<E>,
    rx: mpsc::UnboundedReceiver<SessionMessage>,
    events: broadcast::Sender<SessionEvent>,
    trusted_client: String,
}

impl<E: PlaybackEngine + 'static> SessionService<E> {
    /// Start a session on the current tokio runtime
    ///
    /// `engine_factory` receives the sink the engine must report through.
    pub fn spawn<F>(
        library: Arc<dyn MediaLibrary>,
        engine_factory: F,
        config: SessionConfig,
    ) -> SessionHandle
    where
        F: FnOnce(EngineEventSink) -> E,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        let engine = engine_factory(EngineEventSink::new(tx.downgrade()));
        let service = SessionService {
            controller: SessionController::new(library, engine, &config),
            rx,
            events: events.clone(),
            trusted_client: config.trusted_client.clone(),
        };

        tokio::spawn(service.run());

        SessionHandle { tx, events }
    }

    async fn run(mut self) {
        info!("Session service started");
        let mut released = false;

        while let Some(message) = self.rx.recv().await {
            match message {
                SessionMessage::Command { command, reply } => {
                    debug!("Command: {:?}", command);
                    let result = self.controller.handle(command);
                    if let Err(e) = &result {
                        warn!("Command failed: {}", e);
                    }
                    self.publish();
                    if let Some(reply) = reply {
                        let _ = reply.send(result);
                    }
                }
                SessionMessage::Engine(event) => {
                    trace!("Engine event: {:?}", event);
                    self.controller.handle_engine_event(event);
                    self.publish();
                }
                SessionMessage::Snapshot(reply) => {
                    let _ = reply.send(self.controller.snapshot());
                }
                SessionMessage::Browse { client_id, reply } => {
                    let root = BrowseRoot::for_client(&client_id, &self.trusted_client);
                    debug!("Browse from {}: {:?}", client_id, root);
                    let _ = reply.send(load_children(root, self.controller.library()));
                }
                SessionMessage::Shutdown(reply) => {
                    self.controller.release();
                    self.publish();
                    released = true;
                    let _ = reply.send(());
                    break;
                }
            }
        }

        if !released {
            info!("All session handles dropped, releasing");
            self.controller.release();
            self.publish();
        }

        info!("Session service stopped");
    }

    fn publish(&mut self) {
        for event in self.controller.drain_events() {
            trace!("Publishing {}", event.kind());
            // Only fails when nobody is subscribed
            let _ = self.events.send(event);
        }
    }
}

/// Handle to a running session
///
/// Cloneable; every clone feeds the same command stream.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionMessage>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    /// Apply a command and wait for its outcome
    pub async fn send(&self, command: SessionCommand) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.post(SessionMessage::Command {
            command,
            reply: Some(reply),
        })?;
        rx.await.map_err(|_| SessionError::SessionClosed)?
    }

    /// Queue a command without waiting for it
    pub fn dispatch(&self, command: SessionCommand) -> Result<()> {
        self.post(SessionMessage::Command {
            command,
            reply: None,
        })
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.post(SessionMessage::Snapshot(reply))?;
        rx.await.map_err(|_| SessionError::SessionClosed)
    }

    /// List the library as seen by `client_id`
    pub async fn browse(&self, client_id: &str) -> Result<Vec<MediaMetadata>> {
        let (reply, rx) = oneshot::channel();
        self.post(SessionMessage::Browse {
            client_id: client_id.to_string(),
            reply,
        })?;
        rx.await.map_err(|_| SessionError::SessionClosed)
    }

    /// Release the session and stop its task
    pub async fn shutdown(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.post(SessionMessage::Shutdown(reply))?;
        rx.await.map_err(|_| SessionError::SessionClosed)
    }

    // ===== Command surface =====

    pub async fn play_from_media_id(
        &self,
        media_id: impl Into<MediaId>,
        reset_playlist: bool,
        queue_position: Option<usize>,
    ) -> Result<()> {
        self.send(SessionCommand::PlayFromMediaId(PlayFromMediaIdRequest {
            media_id: media_id.into(),
            reset_playlist,
            queue_position,
        }))
        .await
    }

    pub async fn add_queue_item(&self, description: MediaDescription) -> Result<()> {
        self.send(SessionCommand::AddQueueItem(description)).await
    }

    pub async fn remove_queue_item(&self, description: MediaDescription) -> Result<()> {
        self.send(SessionCommand::RemoveQueueItem(description)).await
    }

    pub async fn prepare(&self) -> Result<()> {
        self.send(SessionCommand::Prepare).await
    }

    pub async fn play(&self) -> Result<()> {
        self.send(SessionCommand::Play).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.send(SessionCommand::Pause).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.send(SessionCommand::Stop).await
    }

    pub async fn skip_to_next(&self) -> Result<()> {
        self.send(SessionCommand::SkipToNext).await
    }

    pub async fn skip_to_previous(&self) -> Result<()> {
        self.send(SessionCommand::SkipToPrevious).await
    }

    pub async fn seek_to(&self, position: Duration) -> Result<()> {
        self.send(SessionCommand::SeekTo(position)).await
    }

    fn post(&self, message: SessionMessage) -> Result<()> {
        self.tx
            .send(message)
            .map_err(|_| SessionError::SessionClosed)
    }
}
