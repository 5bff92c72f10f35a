use crate::config::GrantConfig;
use crate::error::VoiceError;
use confab_types::{ConnectionDetails, DEFAULT_PARTICIPANT_NAME, DEFAULT_ROOM_NAME};
use livekit_api::access_token::{AccessToken, VideoGrants};
use std::time::Duration;
use uuid::Uuid;

/// Stateless issuer of scoped join grants.
#[derive(Debug)]
pub struct GrantService {
    config: GrantConfig,
}

impl GrantService {
    pub fn new(config: GrantConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_configured()
    }

    /// Returns the browser-facing URL of the real-time service.
    pub fn server_url(&self) -> &str {
        &self.config.url
    }

    /// Issues a join grant for one room/participant pair.
    ///
    /// Missing or empty identifiers fall back to the defaults. The token is
    /// scoped to exactly the named room with join, publish, publish-data,
    /// and subscribe capabilities, and expires after the configured TTL.
    ///
    /// Issuing twice with identical inputs yields two independent, equally
    /// valid credentials: each grant carries a fresh issuance id, and no
    /// record of it is kept.
    pub fn issue(
        &self,
        room_name: Option<&str>,
        participant_name: Option<&str>,
    ) -> Result<ConnectionDetails, VoiceError> {
        if !self.config.is_configured() {
            return Err(VoiceError::Config);
        }

        let room_name = non_empty(room_name).unwrap_or(DEFAULT_ROOM_NAME);
        let participant_name = non_empty(participant_name).unwrap_or(DEFAULT_PARTICIPANT_NAME);
        let grant_id = Uuid::new_v4();

        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(participant_name)
            .with_name(participant_name)
            .with_metadata(&grant_id.to_string())
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: true,
                can_publish_data: true,
                can_subscribe: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.config.token_ttl_seconds));

        let participant_token = token.to_jwt()?;

        tracing::debug!(room = room_name, participant = participant_name, "issued join grant");

        Ok(ConnectionDetails {
            server_url: self.config.url.clone(),
            room_name: room_name.to_string(),
            participant_token,
            participant_name: participant_name.to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
