//! Normalized spectral band levels.
//!
//! The audio analysis pipeline reduces a byte-magnitude frequency spectrum to
//! three averages (low / mid / high), normalized into `[0, 1]`. The renderer
//! only ever reads the most recently committed triple.

use serde::{Deserialize, Serialize};

/// Average spectral energy per band, each in `[0, 1]`.
///
/// Mutated only by the analysis pipeline's sampling step; everything else
/// treats a value as an immutable snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BandLevels {
    pub low: f32,
    pub mid: f32,
    pub high: f32,
}

impl BandLevels {
    /// The reset value: a silent or absent track yields exactly this.
    pub const ZERO: Self = Self {
        low: 0.0,
        mid: 0.0,
        high: 0.0,
    };

    /// Reduces byte-magnitude frequency bins (0–255 scale) to normalized
    /// band levels.
    ///
    /// The bin range is split into three contiguous segments by
    /// [`band_partition`]; each level is the arithmetic mean magnitude of
    /// its segment divided by 255. An empty buffer (or empty segment)
    /// contributes 0.
    pub fn from_bins(bins: &[u8]) -> Self {
        if bins.is_empty() {
            return Self::ZERO;
        }

        let (low_end, mid_end) = band_partition(bins.len());

        Self {
            low: segment_mean(&bins[..low_end]),
            mid: segment_mean(&bins[low_end..mid_end]),
            high: segment_mean(&bins[mid_end..]),
        }
    }

    /// Mean of the three band levels; drives waveform phase advancement.
    pub fn average(self) -> f32 {
        (self.low + self.mid + self.high) / 3.0
    }
}

/// Splits `bin_count` bins into low `[0, a)`, mid `[a, b)`, high `[b, n)`
/// segments at the rounded 33% / 66% proportional indices.
///
/// For 128 bins this yields `[0, 42) / [42, 84) / [84, 128)`; for 12 bins,
/// `[0, 4) / [4, 8) / [8, 12)`.
pub fn band_partition(bin_count: usize) -> (usize, usize) {
    let low_end = (bin_count as f32 * 0.33).round() as usize;
    let mid_end = (bin_count as f32 * 0.66).round() as usize;
    (low_end.min(bin_count), mid_end.min(bin_count))
}

fn segment_mean(segment: &[u8]) -> f32 {
    if segment.is_empty() {
        return 0.0;
    }
    let sum: u32 = segment.iter().map(|&b| u32::from(b)).sum();
    (sum as f32 / segment.len() as f32) / 255.0
}
