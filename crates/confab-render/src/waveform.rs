//! The per-frame wave math.

use crate::palette::{palette, Theme};
use crate::surface::{StrokeStyle, Surface};
use confab_types::BandLevels;

/// Logical surface width.
pub const SURFACE_WIDTH: f32 = 400.0;

/// Logical surface height.
pub const SURFACE_HEIGHT: f32 = 90.0;

/// Wave frequency shared by all three bands: same visual rhythm,
/// different amplitudes.
const ANGULAR_FREQUENCY: f32 = 0.045;

/// Horizontal sampling step for curve smoothness.
const SAMPLE_STEP: f32 = 2.0;

/// Idle amplitude, keeping a faint curve visible with no audio energy.
const BASE_AMPLITUDE: f32 = 5.0;

/// One band's curve parameters. The phase is owned exclusively by the
/// renderer: it advances every frame in proportion to the average band
/// level, persists for the life of the renderer, and starts at zero for a
/// fresh one.
#[derive(Debug, Clone)]
pub struct WaveSpec {
    pub color: &'static str,
    pub opacity: f32,
    pub base_amplitude: f32,
    pub gain: f32,
    /// Phase speed per unit of average audio level.
    pub speed: f32,
    pub line_width: f32,
    pub phase: f32,
}

/// Band order is low, mid, high. Mids get the highest gain since speech
/// lives there; highs move slowest.
fn wave_specs(theme: Theme) -> [WaveSpec; 3] {
    let colors = palette(theme);
    let gains = [28.0, 32.0, 25.0];
    let speeds = [0.15, 0.20, 0.10];
    let opacities = [0.65, 0.75, 0.65];

    std::array::from_fn(|band| WaveSpec {
        color: colors[band],
        opacity: opacities[band],
        base_amplitude: BASE_AMPLITUDE,
        gain: gains[band],
        speed: speeds[band],
        line_width: 2.5,
        phase: 0.0,
    })
}

/// Paints the three band curves.
pub struct WaveformRenderer {
    waves: [WaveSpec; 3],
}

impl WaveformRenderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            waves: wave_specs(theme),
        }
    }

    /// Swaps the palette without resetting the phases.
    pub fn set_theme(&mut self, theme: Theme) {
        let colors = palette(theme);
        for (wave, color) in self.waves.iter_mut().zip(colors) {
            wave.color = color;
        }
    }

    /// Current per-band phases (low, mid, high).
    pub fn phases(&self) -> [f32; 3] {
        [self.waves[0].phase, self.waves[1].phase, self.waves[2].phase]
    }

    /// Draws one frame from the given levels, then advances the phases.
    ///
    /// With all-zero levels the phases are left bit-identical, so an idle
    /// waveform is stable frame-over-frame rather than drifting.
    pub fn render_frame(&mut self, surface: &mut dyn Surface, levels: BandLevels) {
        surface.clear();

        let center_y = SURFACE_HEIGHT / 2.0;
        let band_levels = [levels.low, levels.mid, levels.high];
        let samples = (SURFACE_WIDTH / SAMPLE_STEP) as usize;

        for (wave, level) in self.waves.iter().zip(band_levels) {
            let amplitude = wave.base_amplitude + level * wave.gain;
            let mut points = Vec::with_capacity(samples);
            let mut x = 0.0;
            while x < SURFACE_WIDTH {
                let y = center_y + amplitude * (x * ANGULAR_FREQUENCY + wave.phase).sin();
                points.push((x, y));
                x += SAMPLE_STEP;
            }
            surface.stroke_polyline(
                &points,
                &StrokeStyle {
                    color: wave.color,
                    opacity: wave.opacity,
                    line_width: wave.line_width,
                },
            );
        }

        // Motion is audio-energy-proportional: no energy, no drift.
        let average = levels.average();
        for wave in &mut self.waves {
            wave.phase += average * wave.speed;
        }
    }
}
