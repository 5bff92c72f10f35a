//! Where join grants come from.
//!
//! Each join attempt gets its own freshly issued credential. The provider
//! is either the in-process [`GrantService`] or the HTTP credential
//! endpoint, depending on how the client is deployed.

use crate::error::SessionError;
use confab_types::ConnectionDetails;
use confab_voice::GrantService;

#[async_trait::async_trait]
pub trait GrantProvider: Send + Sync {
    /// Issues connection details for one room/participant pair. `None` or
    /// empty identifiers fall back to the defaults.
    async fn connection_details(
        &self,
        room_name: Option<&str>,
        participant_name: Option<&str>,
    ) -> Result<ConnectionDetails, SessionError>;
}

#[async_trait::async_trait]
impl GrantProvider for GrantService {
    async fn connection_details(
        &self,
        room_name: Option<&str>,
        participant_name: Option<&str>,
    ) -> Result<ConnectionDetails, SessionError> {
        Ok(self.issue(room_name, participant_name)?)
    }
}

/// Fetches connection details from a credential endpoint over HTTP.
pub struct HttpGrantProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGrantProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl GrantProvider for HttpGrantProvider {
    async fn connection_details(
        &self,
        room_name: Option<&str>,
        participant_name: Option<&str>,
    ) -> Result<ConnectionDetails, SessionError> {
        let url = format!("{}/api/connection-details", self.base_url);

        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(room) = room_name {
            query.push(("roomName", room));
        }
        if let Some(participant) = participant_name {
            query.push(("participantName", participant));
        }

        let response = self.client.get(&url).query(&query).send().await?;
        if !response.status().is_success() {
            return Err(SessionError::Grant(format!(
                "credential endpoint returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}
