//! Shared types and constants for the Confab voice client.
//!
//! This crate provides the foundational types used across all Confab crates:
//! the connection-details payload exchanged with the credential endpoint and
//! the normalized band levels produced by the audio analysis pipeline.
//!
//! No crate in the workspace depends on anything *except* `confab-types` for
//! cross-cutting type definitions. This keeps the dependency graph clean and
//! prevents circular dependencies.

use serde::{Deserialize, Serialize};

pub mod levels;

pub use levels::{band_partition, BandLevels};

/// Room name used when a request does not name one.
pub const DEFAULT_ROOM_NAME: &str = "ace-room";

/// Participant name used when a request does not name one.
pub const DEFAULT_PARTICIPANT_NAME: &str = "guest";

/// Everything a client needs to join a real-time room: the service endpoint,
/// the room, and a signed, time-limited participant token.
///
/// Issued by the credential endpoint and consumed by the session lifecycle
/// layer. Immutable once issued; the token carries its own expiry and
/// capability set, and nothing about it is tracked server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDetails {
    /// WebSocket URL of the real-time service.
    #[serde(rename = "serverUrl")]
    pub server_url: String,
    /// The room the token is scoped to.
    #[serde(rename = "roomName")]
    pub room_name: String,
    /// Opaque signed join token.
    #[serde(rename = "participantToken")]
    pub participant_token: String,
    /// Display name the token was issued for.
    #[serde(rename = "participantName")]
    pub participant_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_details_uses_camel_case_wire_names() {
        let details = ConnectionDetails {
            server_url: "wss://rtc.example.com".to_string(),
            room_name: "ace-room".to_string(),
            participant_token: "tok".to_string(),
            participant_name: "guest".to_string(),
        };

        let json = serde_json::to_value(&details).expect("serialize");
        assert_eq!(json["serverUrl"], "wss://rtc.example.com");
        assert_eq!(json["roomName"], "ace-room");
        assert_eq!(json["participantToken"], "tok");
        assert_eq!(json["participantName"], "guest");
    }

    #[test]
    fn connection_details_round_trips() {
        let json = r#"{
            "serverUrl": "wss://rtc.example.com",
            "roomName": "lobby",
            "participantToken": "jwt",
            "participantName": "alice"
        }"#;

        let details: ConnectionDetails = serde_json::from_str(json).expect("deserialize");
        assert_eq!(details.room_name, "lobby");
        assert_eq!(details.participant_name, "alice");
    }
}
