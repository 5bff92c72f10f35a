use serde::{Deserialize, Serialize};
use std::fmt;

fn default_token_ttl_seconds() -> u64 {
    600
}

/// Signing credentials and endpoint for the real-time service.
///
/// Resolved once at process start and treated as immutable for the process
/// lifetime.
#[derive(Clone, Serialize, Deserialize)]
pub struct GrantConfig {
    /// WebSocket URL of the real-time service, handed to joining clients.
    pub url: String,
    pub api_key: String,
    #[serde(skip_serializing)]
    pub api_secret: String,
    /// JWT token TTL in seconds for join tokens. Default: 600 (10 minutes).
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

impl Default for GrantConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

impl fmt::Debug for GrantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrantConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

impl GrantConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }

    /// Whether the endpoint and both signing credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_the_secret() {
        let config = GrantConfig::new("ws://localhost:7880", "devkey", "supersecret");
        let debug = format!("{:?}", config);
        assert!(debug.contains("devkey"));
        assert!(!debug.contains("supersecret"));
    }

    #[test]
    fn default_is_unconfigured() {
        let config = GrantConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.token_ttl_seconds, 600);
    }

    #[test]
    fn toml_without_ttl_uses_default() {
        let toml_str = r#"
            url = "ws://localhost:7880"
            api_key = "key"
            api_secret = "secret"
        "#;

        let config: GrantConfig = toml::from_str(toml_str).expect("parse TOML");
        assert!(config.is_configured());
        assert_eq!(config.token_ttl_seconds, 600);
    }
}
