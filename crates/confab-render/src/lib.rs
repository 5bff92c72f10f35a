//! Waveform rendering for the Confab voice client.
//!
//! Paints three phase-evolving sine curves, one per spectral band, onto a
//! fixed-size 2D surface, driven by the latest band levels from the audio
//! analysis pipeline. Motion is audio-energy-proportional: with no energy
//! the curves are static at base amplitude (a faint idle waveform, not a
//! blank surface).
//!
//! The drawing backend is abstracted behind [`Surface`]; this crate owns the
//! wave math, the theme palettes, and the frame loop lifecycle.

pub mod frame;
pub mod palette;
pub mod surface;
pub mod waveform;

pub use frame::{RenderHandle, RenderLoop, FRAME_PERIOD};
pub use palette::{palette, Theme};
pub use surface::{StrokeStyle, Surface};
pub use waveform::{WaveSpec, WaveformRenderer, SURFACE_HEIGHT, SURFACE_WIDTH};
