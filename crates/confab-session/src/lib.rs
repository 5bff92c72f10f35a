//! Session lifecycle for the Confab voice client.
//!
//! Orchestrates the transition between the welcome presentation and an
//! active session: issuing a join grant, joining the real-time room,
//! wiring live audio tracks into the analysis pipeline, and (the delicate
//! part) tearing the connection down only after the exit transition has
//! visually completed *and* the session is still confirmed inactive at that
//! moment.
//!
//! The exit animation runs concurrently with external connection-state
//! changes, so every completion callback re-reads the latest session flag
//! when it fires rather than trusting a value captured when it was
//! scheduled. A user who re-opens the session during the fade-out must not
//! have their brand-new connection torn down by the previous exit's stale
//! callback.
//!
//! The real-time transport itself is consumed through the [`RoomTransport`]
//! and [`RoomConnection`] traits; only four verbs are required (join,
//! disconnect, state, events).

pub mod controller;
pub mod error;
pub mod grants;
pub mod transport;

pub use controller::{SessionController, SessionIdentity, SessionPhase};
pub use error::SessionError;
pub use grants::{GrantProvider, HttpGrantProvider};
pub use transport::{ConnectionState, RoomConnection, RoomEvent, RoomTransport};
