use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to obtain join grant: {0}")]
    Grant(String),

    #[error(transparent)]
    Issuance(#[from] confab_voice::VoiceError),

    #[error("credential request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("room transport error: {0}")]
    Transport(String),
}
