//! Color palettes for flower heads.
//!
//! Each palette maps a flower's hue seed (0.0-1.0) to a concrete color through its own
//! hue/saturation/brightness formula or a small set of discrete buckets.

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA color, components in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const CLEAR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    /// Opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Neutral grey of the given lightness.
    pub const fn grey(white: f32) -> Self {
        Self::rgb(white, white, white)
    }

    /// Convert hue/saturation/brightness (all 0.0-1.0) to RGB.
    ///
    /// Hue wraps, so 1.0 and 0.0 are the same red.
    pub fn from_hsb(hue: f32, saturation: f32, brightness: f32) -> Self {
        let h = hue.rem_euclid(1.0) * 6.0;
        let s = saturation.clamp(0.0, 1.0);
        let v = brightness.clamp(0.0, 1.0);

        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as u32 % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::rgb(r, g, b)
    }

    /// Same color with alpha replaced.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Named color schemes, cycled in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Palette {
    #[default]
    Pastel,
    Sakura,
    Neon,
    Monochrome,
    Sunset,
}

impl Palette {
    /// Every palette in cycle order.
    pub const ALL: [Palette; 5] = [
        Palette::Pastel,
        Palette::Sakura,
        Palette::Neon,
        Palette::Monochrome,
        Palette::Sunset,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Palette::Pastel => "Pastel",
            Palette::Sakura => "Sakura",
            Palette::Neon => "Neon",
            Palette::Monochrome => "Monochrome",
            Palette::Sunset => "Sunset",
        }
    }

    /// Position of this palette in [`Palette::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&p| p == self).unwrap_or(0)
    }

    /// Cyclic successor, wrapping back to the first palette.
    pub fn next(self) -> Palette {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Map a seed in 0.0-1.0 to this palette's color.
    pub fn color_for_seed(self, seed: f32) -> Color {
        let seed = seed.clamp(0.0, 1.0);
        match self {
            Palette::Pastel => Color::from_hsb(seed, 0.4, 0.9),
            Palette::Sakura => {
                // Pinks and reds straddling the hue wrap at 1.0
                let hue = 0.9 + seed * 0.2;
                let hue = if hue > 1.0 { hue - 1.0 } else { hue };
                Color::from_hsb(hue, 0.3 + seed * 0.4, 0.95)
            }
            Palette::Neon => Color::from_hsb(seed, 0.8, 1.0),
            Palette::Monochrome => Color::grey(0.2 + seed * 0.8),
            Palette::Sunset => match (seed * 4.0) as u32 {
                0 => Color::from_hsb(0.05, 0.8, 0.9),
                1 => Color::from_hsb(0.12, 0.7, 1.0),
                2 => Color::from_hsb(0.95, 0.8, 0.8),
                _ => Color::from_hsb(0.8, 0.6, 0.7),
            },
        }
    }
}

impl std::fmt::Display for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
