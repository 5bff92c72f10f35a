use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No audio track is available yet. Non-fatal: the visualization shows
    /// zero levels until one appears.
    #[error("no audio track available")]
    TrackUnavailable,

    /// The audio subsystem refused to build, read, or close the analysis
    /// graph. The pipeline resets to the detached state and retries on the
    /// next track event.
    #[error("analysis graph error: {0}")]
    Graph(String),
}
