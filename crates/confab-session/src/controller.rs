//! The session state machine.

use crate::error::SessionError;
use crate::grants::GrantProvider;
use crate::transport::{ConnectionState, RoomConnection, RoomEvent, RoomTransport};
use confab_audio::AudioPipeline;
use confab_types::{BandLevels, DEFAULT_PARTICIPANT_NAME, DEFAULT_ROOM_NAME};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;

/// Which presentation is showing. `Welcome` is published the moment an exit
/// begins, while the connection outlives it until the exit transition
/// completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Welcome,
    Active,
}

/// The room/participant pair sessions are started as.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub room_name: String,
    pub participant_name: String,
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self {
            room_name: DEFAULT_ROOM_NAME.to_string(),
            participant_name: DEFAULT_PARTICIPANT_NAME.to_string(),
        }
    }
}

struct ConnectionSlot {
    conn: Arc<dyn RoomConnection>,
    events_task: JoinHandle<()>,
}

/// Cycles the client between `Welcome` and `Active` for the life of the
/// page.
///
/// The single piece of state shared between external triggers and deferred
/// completion callbacks is the `active` flag. Every callback reads it at
/// the moment it fires: a completion scheduled before a re-entry must see
/// the re-entry, not the world as it was when the callback was scheduled.
pub struct SessionController {
    grants: Arc<dyn GrantProvider>,
    transport: Arc<dyn RoomTransport>,
    pipeline: Arc<AudioPipeline>,
    identity: SessionIdentity,
    active: AtomicBool,
    phase_tx: watch::Sender<SessionPhase>,
    connection: Mutex<Option<ConnectionSlot>>,
}

impl SessionController {
    pub fn new(
        grants: Arc<dyn GrantProvider>,
        transport: Arc<dyn RoomTransport>,
        identity: SessionIdentity,
    ) -> Arc<Self> {
        let (phase_tx, _) = watch::channel(SessionPhase::Welcome);
        Arc::new(Self {
            grants,
            transport,
            pipeline: Arc::new(AudioPipeline::new()),
            identity,
            active: AtomicBool::new(false),
            phase_tx,
            connection: Mutex::new(None),
        })
    }

    /// The latest session flag, read fresh.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Subscribes to presentation-phase changes.
    pub fn phase_updates(&self) -> watch::Receiver<SessionPhase> {
        self.phase_tx.subscribe()
    }

    /// Subscribes to the latest band levels for the waveform renderer.
    pub fn levels(&self) -> watch::Receiver<BandLevels> {
        self.pipeline.levels()
    }

    pub fn audio_pipeline(&self) -> &Arc<AudioPipeline> {
        &self.pipeline
    }

    /// `Welcome → Active`: issue a fresh grant and join the room.
    ///
    /// If a still-open connection exists (the user re-entered during the
    /// previous exit's fade-out) it is reused and no new grant is issued.
    /// If `end_session` fires while the join is in flight, the resolved
    /// connection is disconnected immediately instead of being orphaned.
    pub async fn start_session(self: &Arc<Self>) -> Result<(), SessionError> {
        self.set_active(true);

        {
            let slot = self.connection.lock().await;
            if let Some(slot) = slot.as_ref() {
                if slot.conn.state() == ConnectionState::Connected {
                    tracing::debug!("re-entered during exit transition, reusing open connection");
                    return Ok(());
                }
            }
        }

        let details = self
            .grants
            .connection_details(
                Some(&self.identity.room_name),
                Some(&self.identity.participant_name),
            )
            .await
            .map_err(|e| {
                self.set_active(false);
                e
            })?;

        let conn = self
            .transport
            .join(&details.server_url, &details.participant_token)
            .await
            .map_err(|e| {
                self.set_active(false);
                e
            })?;

        if !self.is_active() {
            tracing::debug!("session ended during join, disconnecting immediately");
            conn.disconnect().await;
            return Ok(());
        }

        let events_task = tokio::spawn(run_room_events(Arc::downgrade(self), conn.events()));
        let mut slot = self.connection.lock().await;
        if let Some(old) = slot.take() {
            old.events_task.abort();
            if old.conn.state() == ConnectionState::Connected {
                old.conn.disconnect().await;
            }
        }
        *slot = Some(ConnectionSlot { conn, events_task });

        tracing::info!(room = %details.room_name, "session started");
        Ok(())
    }

    /// `Active → Welcome (exiting)`: flip the flag and switch the
    /// presentation immediately. The connection is NOT closed here; that
    /// waits for [`finish_exit`](Self::finish_exit), so a fast re-entry
    /// during the exit animation finds it still open.
    pub fn end_session(&self) {
        self.set_active(false);
    }

    /// Exit-animation completion.
    ///
    /// Re-reads the *current* session flag: if a new session started while
    /// the animation played, this callback is stale and must do nothing.
    /// Otherwise the connection is closed, unless the remote side already
    /// closed it.
    pub async fn finish_exit(&self) {
        if self.is_active() {
            tracing::debug!("stale exit completion ignored, session is active again");
            return;
        }

        let slot = self.connection.lock().await.take();
        if let Some(slot) = slot {
            slot.events_task.abort();
            if slot.conn.state() != ConnectionState::Disconnected {
                slot.conn.disconnect().await;
            }
            self.pipeline.detach().await;
            tracing::info!("session connection closed");
        }
    }

    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
        let _ = self.phase_tx.send(if active {
            SessionPhase::Active
        } else {
            SessionPhase::Welcome
        });
    }
}

/// Per-connection event loop: wires live tracks into the analysis pipeline
/// and turns a remote disconnect into an exit.
async fn run_room_events(
    controller: Weak<SessionController>,
    mut events: broadcast::Receiver<RoomEvent>,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "room event stream lagged");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        let Some(controller) = controller.upgrade() else {
            break;
        };

        match event {
            RoomEvent::TrackPublished(track) => {
                if let Err(e) = controller.pipeline.attach(track.as_ref()).await {
                    tracing::warn!("failed to attach audio analysis: {}", e);
                }
            }
            RoomEvent::TrackUnpublished => {
                controller.pipeline.detach().await;
            }
            RoomEvent::Disconnected => {
                controller.pipeline.detach().await;
                controller.end_session();
                break;
            }
        }
    }
}
