//! Attach/detach lifecycle and the fixed-cadence sampler task.

use crate::error::AnalysisError;
use crate::source::{AudioTrack, SpectrumSource};
use confab_types::BandLevels;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Size of the spectral transform; the spectrum exposes half as many bins.
pub const FFT_SIZE: usize = 256;

/// Fixed sampling period, decoupled from the render cadence.
pub const SAMPLE_PERIOD: Duration = Duration::from_millis(50);

/// Drives at most one live analysis graph and publishes the latest band
/// levels.
///
/// Teardown ordering per track change is strict: stop the sampling timer,
/// close the analysis graph, and only then allow a replacement graph to be
/// built. [`AudioPipeline::attach`] and [`AudioPipeline::detach`] await the
/// previous sampler's exit, so overlapping graphs cannot occur.
pub struct AudioPipeline {
    levels_tx: watch::Sender<BandLevels>,
    sampler: tokio::sync::Mutex<Option<Sampler>>,
}

struct Sampler {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl AudioPipeline {
    pub fn new() -> Self {
        let (levels_tx, _) = watch::channel(BandLevels::ZERO);
        Self {
            levels_tx,
            sampler: tokio::sync::Mutex::new(None),
        }
    }

    /// Subscribes to the latest committed band levels. Readers never wait
    /// on the sampler; `borrow` always yields the most recent sample.
    pub fn levels(&self) -> watch::Receiver<BandLevels> {
        self.levels_tx.subscribe()
    }

    /// The most recently committed band levels.
    pub fn current(&self) -> BandLevels {
        *self.levels_tx.borrow()
    }

    /// Builds an analysis graph over `track` and starts sampling it.
    ///
    /// Any previously attached graph is fully torn down first. On failure
    /// the pipeline is left detached with zero levels.
    pub async fn attach(&self, track: &dyn AudioTrack) -> Result<(), AnalysisError> {
        let mut slot = self.sampler.lock().await;
        stop_sampler(&mut slot, &self.levels_tx).await;

        let source = track.open_spectrum(FFT_SIZE)?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run_sampler(source, self.levels_tx.clone(), shutdown_rx));
        *slot = Some(Sampler {
            shutdown: shutdown_tx,
            task,
        });

        tracing::debug!("audio analysis attached");
        Ok(())
    }

    /// Stops sampling, closes the graph, and resets levels to zero.
    /// Detaching an already-detached pipeline is a no-op.
    pub async fn detach(&self) {
        let mut slot = self.sampler.lock().await;
        stop_sampler(&mut slot, &self.levels_tx).await;
    }
}

impl Default for AudioPipeline {
    fn default() -> Self {
        Self::new()
    }
}

async fn stop_sampler(slot: &mut Option<Sampler>, levels_tx: &watch::Sender<BandLevels>) {
    if let Some(sampler) = slot.take() {
        let _ = sampler.shutdown.send(true);
        if sampler.task.await.is_err() {
            tracing::warn!("sampler task panicked during teardown");
        }
        tracing::debug!("audio analysis detached");
    }
    let _ = levels_tx.send(BandLevels::ZERO);
}

/// The sampling loop. Owns the analysis graph and closes it on every exit
/// path: shutdown signal, pipeline drop, or a failed bin read.
async fn run_sampler(
    mut source: Box<dyn SpectrumSource>,
    levels_tx: watch::Sender<BandLevels>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut bins = vec![0u8; source.bin_count()];
    let mut ticker = interval(SAMPLE_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {
                match source.read_frequency_bins(&mut bins) {
                    Ok(()) => {
                        let _ = levels_tx.send(BandLevels::from_bins(&bins));
                    }
                    Err(e) => {
                        tracing::warn!("frequency read failed, resetting analysis pipeline: {}", e);
                        break;
                    }
                }
            }
        }
    }

    if let Err(e) = source.close() {
        tracing::warn!("failed to close analysis graph: {}", e);
    }
    let _ = levels_tx.send(BandLevels::ZERO);
}
