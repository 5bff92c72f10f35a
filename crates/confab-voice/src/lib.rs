//! Access grant issuance for the Confab voice client.
//!
//! Mints scoped, time-limited LiveKit join tokens. Issuance is stateless:
//! every call produces an independent credential bound to exactly one room
//! with a fixed capability set and TTL, and nothing about an issued grant is
//! tracked afterwards.
//!
//! The signing itself is delegated to `livekit-api`; this crate owns the
//! configuration boundary (fail fast when credentials are missing, never
//! partially construct a grant) and the shape of the issued payload.

pub mod config;
pub mod error;
pub mod service;

pub use config::GrantConfig;
pub use error::VoiceError;
pub use service::GrantService;
