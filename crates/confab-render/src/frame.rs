//! The continuous draw loop.
//!
//! Runs on its own frame cadence, independent of the 50 ms sampling timer:
//! each frame reads whatever levels the sampler committed last, without
//! waiting on it.

use crate::palette::Theme;
use crate::surface::Surface;
use crate::waveform::WaveformRenderer;
use confab_types::BandLevels;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Display cadence (~60 Hz).
pub const FRAME_PERIOD: Duration = Duration::from_micros(16_667);

pub struct RenderLoop;

impl RenderLoop {
    /// Starts the draw loop on `surface`, reading the latest committed
    /// levels from `levels`. The loop self-reschedules every frame until
    /// [`RenderHandle::stop`] is called or the handle is dropped.
    pub fn spawn(
        surface: Box<dyn Surface>,
        levels: watch::Receiver<BandLevels>,
        theme: Theme,
    ) -> RenderHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let renderer = WaveformRenderer::new(theme);
        let task = tokio::spawn(run_frames(surface, levels, renderer, shutdown_rx));
        RenderHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Cancellation handle for a running draw loop.
///
/// Dropping the handle also stops the loop (the task exits when the
/// shutdown channel closes); `stop` additionally waits for the pending
/// frame to finish, so nothing draws after it returns.
pub struct RenderHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RenderHandle {
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if self.task.await.is_err() {
            tracing::warn!("render loop task panicked during teardown");
        }
    }
}

async fn run_frames(
    mut surface: Box<dyn Surface>,
    levels: watch::Receiver<BandLevels>,
    mut renderer: WaveformRenderer,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(FRAME_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {
                let current = *levels.borrow();
                renderer.render_frame(surface.as_mut(), current);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::StrokeStyle;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::{sleep, timeout};

    struct CountingSurface {
        frames: Arc<AtomicUsize>,
    }

    impl Surface for CountingSurface {
        fn clear(&mut self) {
            self.frames.fetch_add(1, Ordering::SeqCst);
        }

        fn stroke_polyline(&mut self, _points: &[(f32, f32)], _style: &StrokeStyle) {}
    }

    #[tokio::test]
    async fn loop_draws_until_stopped_and_not_after() {
        let frames = Arc::new(AtomicUsize::new(0));
        let (_levels_tx, levels_rx) = watch::channel(BandLevels::ZERO);

        let handle = RenderLoop::spawn(
            Box::new(CountingSurface {
                frames: frames.clone(),
            }),
            levels_rx,
            Theme::Dark,
        );

        sleep(Duration::from_millis(100)).await;
        timeout(Duration::from_secs(2), handle.stop())
            .await
            .expect("stop timed out");

        let drawn = frames.load(Ordering::SeqCst);
        assert!(drawn > 0, "loop never drew a frame");

        // No frame is scheduled after teardown.
        sleep(Duration::from_millis(100)).await;
        assert_eq!(frames.load(Ordering::SeqCst), drawn);
    }
}
