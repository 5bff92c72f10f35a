//! Theme-aware wave colors.
//!
//! Two fixed palettes keyed by theme, one color per band (low, mid, high).
//! The strings are oklch values carried opaque to the surface; there is no
//! behavioral contract beyond the lookup.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Warm peach / sage green / earthy green.
const LIGHT: [&str; 3] = [
    "oklch(0.50 0.12 85)",
    "oklch(0.45 0.12 110)",
    "oklch(0.55 0.10 120)",
];

/// Purple-blue / royal blue / cyan.
const DARK: [&str; 3] = [
    "oklch(0.60 0.15 280)",
    "oklch(0.55 0.18 255)",
    "oklch(0.65 0.12 200)",
];

/// Per-band colors for the given theme, ordered low, mid, high.
pub fn palette(theme: Theme) -> [&'static str; 3] {
    match theme {
        Theme::Light => LIGHT,
        Theme::Dark => DARK,
    }
}
