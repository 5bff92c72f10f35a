//! Audio analysis pipeline for the Confab voice client.
//!
//! Given a live audio track, builds a frequency-analysis graph and samples
//! it on a fixed 50 ms cadence, reducing the spectrum to normalized
//! low/mid/high band levels. The latest triple is published over a `watch`
//! channel: single writer (the sampler), any number of readers (the
//! renderer), last-writer-wins, since only the newest sample is ever
//! meaningful.
//!
//! The capture subsystem is consumed through the [`AudioTrack`] /
//! [`SpectrumSource`] traits; the pipeline owns graph lifetime. At most one
//! analysis graph is ever live: attaching a replacement track fully tears
//! down the previous graph (stop timer, close source) before the new one is
//! built.

pub mod error;
pub mod pipeline;
pub mod source;

pub use error::AnalysisError;
pub use pipeline::{AudioPipeline, FFT_SIZE, SAMPLE_PERIOD};
pub use source::{AudioTrack, SpectrumSource};
