//! Configuration types for garden tunables.

use serde::{Deserialize, Serialize};

use super::Palette;

/// Top-level garden configuration.
///
/// Every section carries `#[serde(default)]`, so a partial JSON file only needs the
/// fields it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    /// Entity bounds.
    pub capacity: CapacityConfig,
    /// Ground level as a fraction of viewport height.
    pub baseline_ratio: f32,
    /// Wind physics parameters.
    pub wind: WindConfig,
    /// Grow-on-hold parameters.
    pub growth: GrowthConfig,
    /// Visual knob defaults and their allowed ranges.
    pub visuals: VisualConfig,
    /// Renderer layer parameters.
    pub render: RenderConfig,
    /// Session seed for flower generation. `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            capacity: CapacityConfig::default(),
            baseline_ratio: 0.78,
            wind: WindConfig::default(),
            growth: GrowthConfig::default(),
            visuals: VisualConfig::default(),
            render: RenderConfig::default(),
            seed: None,
        }
    }
}

/// Maximum live entity counts. Oldest entries are evicted first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    pub max_flowers: usize,
    pub max_stems: usize,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            max_flowers: 60,
            max_stems: 30,
        }
    }
}

/// Wind model: a scalar strength and a direction in radians.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Strength after construction and after `clear_all`.
    pub default_strength: f32,
    /// Direction after construction and after `clear_all` (radians).
    pub default_direction: f32,
    /// Multiplicative decay per 60 Hz reference frame (0.0-1.0 exclusive).
    pub decay_rate: f32,
    /// Ceiling for strength.
    pub cap: f32,
    /// Strength below which decay snaps to zero.
    pub epsilon: f32,
    /// Direction change per unit of gyro rate per reference frame.
    pub gyro_direction_gain: f32,
    /// Strength added per unit of |gyro rate| per reference frame.
    pub gyro_strength_gain: f32,
    /// Swipe gust envelope.
    pub gust: GustConfig,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            default_strength: 5.0,
            default_direction: 0.0,
            decay_rate: 0.98,
            cap: 100.0,
            epsilon: 0.1,
            gyro_direction_gain: 0.1,
            gyro_strength_gain: 2.0,
            gust: GustConfig::default(),
        }
    }
}

/// Timed swipe gust: ease up to a peak, then ease back to a resting strength.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GustConfig {
    /// Minimum swipe length in points.
    pub min_distance: f32,
    /// Horizontal component must exceed vertical by this factor.
    pub horizontal_ratio: f32,
    /// Swipe points per unit of peak strength.
    pub distance_per_strength: f32,
    /// Ceiling for the peak.
    pub max_peak: f32,
    /// Seconds to reach the peak.
    pub rise: f32,
    /// Seconds to fall back to `rest_strength`.
    pub fall: f32,
    /// Strength the gust settles to.
    pub rest_strength: f32,
}

impl Default for GustConfig {
    fn default() -> Self {
        Self {
            min_distance: 50.0,
            horizontal_ratio: 1.5,
            distance_per_strength: 5.0,
            max_peak: 50.0,
            rise: 2.0,
            fall: 4.0,
            rest_strength: 5.0,
        }
    }
}

/// Grow-on-hold session parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Seconds between growth ticks.
    pub interval: f64,
    /// Scale added per tick.
    pub increment: f32,
    /// Upper bound for scale.
    pub max_scale: f32,
    /// Scale of a freshly spawned flower.
    pub initial_scale: f32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            interval: 0.05,
            increment: 0.05,
            max_scale: 2.5,
            initial_scale: 1.0,
        }
    }
}

/// Inclusive knob range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnobRange {
    pub min: f32,
    pub max: f32,
}

impl KnobRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp a value into the range. NaN falls back to `min`.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// UI-adjustable visual parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    pub palette: Palette,
    pub bloom_intensity: f32,
    pub bloom_range: KnobRange,
    pub chromatic_offset: f32,
    pub chromatic_range: KnobRange,
    pub global_scale: f32,
    pub scale_range: KnobRange,
    pub show_stars: bool,
    pub show_grass: bool,
    pub show_fireflies: bool,
    pub parallax_enabled: bool,
    pub gyro_wind_enabled: bool,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            palette: Palette::Pastel,
            bloom_intensity: 1.2,
            bloom_range: KnobRange::new(0.2, 3.0),
            chromatic_offset: 6.0,
            chromatic_range: KnobRange::new(0.0, 10.0),
            global_scale: 1.0,
            scale_range: KnobRange::new(0.5, 2.0),
            show_stars: true,
            show_grass: true,
            show_fireflies: true,
            parallax_enabled: true,
            gyro_wind_enabled: true,
        }
    }
}

/// Layer parameters for the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub grain_count: usize,
    /// Grain reseeds every `1 / grain_rate` seconds.
    pub grain_rate: f64,
    pub star_count: usize,
    pub star_seed: u64,
    pub grass_count: usize,
    pub firefly_count: usize,
    pub stamen_count: usize,
    pub glow_passes: usize,
    /// Extra distance beyond the viewport before a head is culled.
    pub cull_margin: f32,
    /// Maximum parallax displacement in points.
    pub parallax_max_offset: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            grain_count: 500,
            grain_rate: 10.0,
            star_count: 150,
            star_seed: 42,
            grass_count: 60,
            firefly_count: 8,
            stamen_count: 12,
            glow_passes: 3,
            cull_margin: 100.0,
            parallax_max_offset: 20.0,
        }
    }
}

impl GardenConfig {
    /// Ground level for a viewport of the given height.
    #[inline]
    pub fn baseline(&self, viewport_height: f32) -> f32 {
        viewport_height * self.baseline_ratio
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity.max_flowers == 0 || self.capacity.max_stems == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        if !(self.baseline_ratio > 0.0 && self.baseline_ratio <= 1.0) {
            return Err(ConfigError::InvalidBaseline(self.baseline_ratio));
        }
        let wind = &self.wind;
        if !(wind.decay_rate > 0.0 && wind.decay_rate < 1.0) {
            return Err(ConfigError::InvalidDecayRate(wind.decay_rate));
        }
        if !(wind.cap > 0.0) || wind.epsilon < 0.0 {
            return Err(ConfigError::InvalidRange { knob: "wind.cap" });
        }
        if !(wind.default_strength >= 0.0 && wind.default_strength <= wind.cap) {
            return Err(ConfigError::InvalidRange {
                knob: "wind.default_strength",
            });
        }
        let gust = &wind.gust;
        if gust.rise < 0.0 || gust.fall < 0.0 || gust.max_peak > wind.cap {
            return Err(ConfigError::InvalidRange { knob: "wind.gust" });
        }
        if !(gust.distance_per_strength > 0.0) {
            return Err(ConfigError::InvalidRange {
                knob: "wind.gust.distance_per_strength",
            });
        }
        if !(gust.rest_strength >= 0.0 && gust.rest_strength <= wind.cap) {
            return Err(ConfigError::InvalidRange {
                knob: "wind.gust.rest_strength",
            });
        }
        let growth = &self.growth;
        if !(growth.interval > 0.0)
            || growth.increment < 0.0
            || growth.initial_scale <= 0.0
            || growth.max_scale < growth.initial_scale
        {
            return Err(ConfigError::InvalidGrowth);
        }
        let visuals = &self.visuals;
        for (knob, range, value) in [
            ("bloom_intensity", visuals.bloom_range, visuals.bloom_intensity),
            ("chromatic_offset", visuals.chromatic_range, visuals.chromatic_offset),
            ("global_scale", visuals.scale_range, visuals.global_scale),
        ] {
            if range.min > range.max || !range.contains(value) {
                return Err(ConfigError::InvalidRange { knob });
            }
        }
        if !(self.render.grain_rate > 0.0) {
            return Err(ConfigError::InvalidRange { knob: "render.grain_rate" });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Flower and stem capacities must be non-zero")]
    InvalidCapacity,
    #[error("Baseline ratio must be in (0, 1], got {0}")]
    InvalidBaseline(f32),
    #[error("Wind decay rate must be in (0, 1), got {0}")]
    InvalidDecayRate(f32),
    #[error("Knob {knob} has an empty range or a default outside it")]
    InvalidRange { knob: &'static str },
    #[error("Growth interval must be positive and max scale at least the initial scale")]
    InvalidGrowth,
    #[error("Viewport dimensions must be positive and finite")]
    InvalidViewport,
}
