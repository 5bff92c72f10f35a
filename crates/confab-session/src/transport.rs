//! The real-time transport seam.
//!
//! The session layer consumes exactly four transport verbs: join a room
//! with a signed token, disconnect, read the connection state, and receive
//! room events. A LiveKit client-SDK binding implements these downstream;
//! tests use in-process doubles.

use crate::error::SessionError;
use confab_audio::AudioTrack;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// Events delivered by an open room connection.
#[derive(Clone)]
pub enum RoomEvent {
    /// A remote participant published an audio track.
    TrackPublished(Arc<dyn AudioTrack>),
    /// The previously published track went away.
    TrackUnpublished,
    /// The server side closed the connection.
    Disconnected,
}

impl fmt::Debug for RoomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrackPublished(_) => f.write_str("TrackPublished"),
            Self::TrackUnpublished => f.write_str("TrackUnpublished"),
            Self::Disconnected => f.write_str("Disconnected"),
        }
    }
}

#[async_trait::async_trait]
pub trait RoomTransport: Send + Sync {
    /// Opens a connection to the room the token is scoped to.
    async fn join(
        &self,
        server_url: &str,
        token: &str,
    ) -> Result<Arc<dyn RoomConnection>, SessionError>;
}

#[async_trait::async_trait]
pub trait RoomConnection: Send + Sync {
    /// Closes the connection. Disconnecting an already-closed connection is
    /// a no-op.
    async fn disconnect(&self);

    fn state(&self) -> ConnectionState;

    /// Subscribes to this connection's event stream.
    fn events(&self) -> broadcast::Receiver<RoomEvent>;
}
