use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    /// The endpoint or a signing credential is missing. Fatal to the issuer;
    /// callers surface it as a generic service-unavailable response without
    /// naming which value is absent.
    #[error("real-time service credentials are not configured")]
    Config,

    #[error("token signing failed: {0}")]
    Issuance(#[from] livekit_api::access_token::AccessTokenError),
}
