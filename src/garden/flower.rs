//! Flower entity model.
//!
//! A flower's generative parameters are drawn once from its seed and never change. Only
//! the nominal head (on move) and the scale (while growing) are mutable; everything that
//! animates is a pure function of time and wind.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::SeededRandom;
use crate::schema::{Color, Palette};

/// Range of petal counts a seed can produce.
pub const PETAL_COUNT_RANGE: (i64, i64) = (5, 12);
/// Range of base petal radii in points.
pub const PETAL_RADIUS_RANGE: (f32, f32) = (20.0, 40.0);
/// Range of idle sway frequencies in radians per second.
pub const SWAY_FREQUENCY_RANGE: (f64, f64) = (0.8, 1.5);
/// Range of stem curvature factors.
pub const STEM_CURVATURE_RANGE: (f32, f32) = (0.3, 1.2);

/// Wind strength beyond which the lean stops growing.
pub const MAX_EFFECTIVE_WIND: f32 = 100.0;

/// Idle sway amplitude per unit of stem curvature.
const IDLE_AMPLITUDE: f32 = 10.0;
/// Vertical idle bob relative to the horizontal sway.
const IDLE_BOB: f32 = 0.25;
/// Horizontal lean per unit of wind strength.
const WIND_LEAN: f32 = 0.3;
/// Vertical lean relative to horizontal lean.
const WIND_LEAN_Y: f32 = 0.4;
/// Gust flutter per unit of wind strength.
const WIND_FLUTTER: f32 = 0.08;
/// Flutter angular frequency.
const FLUTTER_FREQUENCY: f64 = 2.0;
/// Glow pulse angular frequency.
const GLOW_FREQUENCY: f64 = 1.2;

/// Opaque flower identifier, unique within a garden session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlowerId(pub u64);

impl std::fmt::Display for FlowerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "flower#{}", self.0)
    }
}

/// A generative flower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flower {
    id: FlowerId,
    seed: u64,
    anchor: Vec2,
    head: Vec2,
    petal_count: u32,
    petal_radius: f32,
    hue: f32,
    sway_phase: f64,
    sway_frequency: f64,
    stem_curvature: f32,
    /// Current growth scale.
    pub(crate) scale: f32,
    stem_path: Option<Vec<Vec2>>,
}

impl Flower {
    /// Create a flower whose stem rises vertically from `anchor` to `head`.
    ///
    /// Parameters are drawn in a fixed order, so a seed always produces the same flower.
    pub fn from_seed(id: FlowerId, head: Vec2, anchor: Vec2, seed: u64, scale: f32) -> Self {
        let mut rng = SeededRandom::new(seed);
        let petal_count = rng.next_int(PETAL_COUNT_RANGE.0, PETAL_COUNT_RANGE.1) as u32;
        let petal_radius = rng.next_f32(PETAL_RADIUS_RANGE.0, PETAL_RADIUS_RANGE.1);
        let hue = (rng.next_f64(0.0, 1.0) as f32).fract();
        let sway_phase = rng.next_angle();
        let sway_frequency = rng.next_f64(SWAY_FREQUENCY_RANGE.0, SWAY_FREQUENCY_RANGE.1);
        let stem_curvature = rng.next_f32(STEM_CURVATURE_RANGE.0, STEM_CURVATURE_RANGE.1);

        Self {
            id,
            seed,
            anchor,
            head,
            petal_count,
            petal_radius,
            hue,
            sway_phase,
            sway_frequency,
            stem_curvature,
            scale,
            stem_path: None,
        }
    }

    /// Create a flower on a hand-drawn stem.
    ///
    /// The first path point becomes the anchor and the last the nominal head. Returns
    /// `None` for paths with fewer than two points.
    pub fn from_stem_path(id: FlowerId, path: Vec<Vec2>, seed: u64, scale: f32) -> Option<Self> {
        if path.len() < 2 {
            return None;
        }
        let anchor = path[0];
        let head = path[path.len() - 1];
        let mut flower = Self::from_seed(id, head, anchor, seed, scale);
        flower.stem_path = Some(path);
        Some(flower)
    }

    #[inline]
    pub fn id(&self) -> FlowerId {
        self.id
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ground anchor.
    #[inline]
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Nominal (unswayed) head position.
    #[inline]
    pub fn head(&self) -> Vec2 {
        self.head
    }

    #[inline]
    pub fn petal_count(&self) -> u32 {
        self.petal_count
    }

    #[inline]
    pub fn petal_radius(&self) -> f32 {
        self.petal_radius
    }

    /// Hue seed in [0, 1).
    #[inline]
    pub fn hue(&self) -> f32 {
        self.hue
    }

    /// Sway phase in [0, 2π).
    #[inline]
    pub fn sway_phase(&self) -> f64 {
        self.sway_phase
    }

    #[inline]
    pub fn sway_frequency(&self) -> f64 {
        self.sway_frequency
    }

    #[inline]
    pub fn stem_curvature(&self) -> f32 {
        self.stem_curvature
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Drawn stem path, if this flower was planted by drawing.
    #[inline]
    pub fn stem_path(&self) -> Option<&[Vec2]> {
        self.stem_path.as_deref()
    }

    /// Vertical distance from anchor to nominal head.
    #[inline]
    pub fn stem_height(&self) -> f32 {
        (self.anchor.y - self.head.y).abs()
    }

    /// Fixed orientation of the petal ring.
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.sway_phase as f32
    }

    /// Head color under a palette.
    pub fn color(&self, palette: Palette) -> Color {
        palette.color_for_seed(self.hue)
    }

    /// Sway displacement from the nominal head at `time` under the given wind.
    ///
    /// Idle oscillation plus wind lean. Wind strength is clamped to
    /// [`MAX_EFFECTIVE_WIND`], so the displacement stays bounded.
    pub fn sway_offset(&self, time: f64, wind_strength: f32, wind_direction: f32) -> Vec2 {
        let idle_arg = time * self.sway_frequency + self.sway_phase;
        let amplitude = IDLE_AMPLITUDE * self.stem_curvature;
        let idle = Vec2::new(
            idle_arg.sin() as f32 * amplitude,
            idle_arg.cos() as f32 * amplitude * IDLE_BOB,
        );

        let strength = if wind_strength.is_finite() {
            wind_strength.clamp(0.0, MAX_EFFECTIVE_WIND)
        } else {
            0.0
        };
        if strength == 0.0 {
            return idle;
        }

        let direction = if wind_direction.is_finite() {
            wind_direction
        } else {
            0.0
        };
        let flutter = (time * FLUTTER_FREQUENCY + self.sway_phase).sin() as f32;
        let lean = Vec2::new(
            direction.cos() * strength * WIND_LEAN + flutter * strength * WIND_FLUTTER,
            direction.sin() * strength * WIND_LEAN * WIND_LEAN_Y,
        );
        idle + lean
    }

    /// Instantaneous head position at `time` under the given wind.
    pub fn head_position(&self, time: f64, wind_strength: f32, wind_direction: f32) -> Vec2 {
        self.head + self.sway_offset(time, wind_strength, wind_direction)
    }

    /// Brightness envelope in [0, 1].
    pub fn glow_pulse(&self, time: f64) -> f32 {
        (((time * GLOW_FREQUENCY + self.sway_phase).sin() + 1.0) / 2.0) as f32
    }

    /// Rendered petal radius.
    pub fn bloom_radius(&self, bloom_intensity: f32, global_scale: f32) -> f32 {
        self.petal_radius * self.scale * bloom_intensity * global_scale
    }

    /// Reposition the nominal head. Tapped flowers keep their anchor under the head.
    pub(crate) fn move_to(&mut self, point: Vec2) {
        match &mut self.stem_path {
            Some(path) => {
                let delta = point - self.head;
                // Drag the drawn path along, anchor stays planted
                let n = path.len().saturating_sub(1).max(1) as f32;
                for (i, p) in path.iter_mut().enumerate().skip(1) {
                    *p += delta * (i as f32 / n);
                }
            }
            None => self.anchor.x = point.x,
        }
        self.head = point;
    }

    /// Grow by `increment`, clamped to `max`. Returns whether the scale changed.
    pub(crate) fn grow(&mut self, increment: f32, max: f32) -> bool {
        let mut next = (self.scale + increment).min(max);
        // Absorb accumulated rounding so the cap is reached exactly
        if max - next < 1e-4 {
            next = max;
        }
        if next > self.scale {
            self.scale = next;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn flower(seed: u64) -> Flower {
        Flower::from_seed(
            FlowerId(1),
            Vec2::new(100.0, 100.0),
            Vec2::new(100.0, 624.0),
            seed,
            1.0,
        )
    }

    #[test]
    fn test_seed_reproduces_parameters() {
        let a = flower(8675309);
        let b = flower(8675309);
        assert_eq!(a.petal_count(), b.petal_count());
        assert_eq!(a.petal_radius(), b.petal_radius());
        assert_eq!(a.hue(), b.hue());
        assert_eq!(a.sway_phase(), b.sway_phase());
        assert_eq!(a.sway_frequency(), b.sway_frequency());
        assert_eq!(a.stem_curvature(), b.stem_curvature());
    }

    #[test]
    fn test_parameters_in_range_for_many_seeds() {
        for seed in 0..1000u64 {
            let f = flower(seed.wrapping_mul(2654435761));
            assert!((5..=12).contains(&f.petal_count()));
            assert!((20.0..=40.0).contains(&f.petal_radius()));
            assert!((0.0..1.0).contains(&f.hue()));
            assert!((0.0..TAU).contains(&f.sway_phase()));
            assert!((0.8..=1.5).contains(&f.sway_frequency()));
            assert!((0.3..=1.2).contains(&f.stem_curvature()));
        }
    }

    #[test]
    fn test_zero_wind_is_idle_only() {
        let f = flower(11);
        let t = 3.7;
        let offset = f.sway_offset(t, 0.0, 1.3);
        let arg = t * f.sway_frequency() + f.sway_phase();
        let expected_x = arg.sin() as f32 * 10.0 * f.stem_curvature();
        assert!((offset.x - expected_x).abs() < 1e-4);
        // Direction is irrelevant without strength
        assert_eq!(offset, f.sway_offset(t, 0.0, -2.0));
    }

    #[test]
    fn test_head_position_is_pure() {
        let f = flower(21);
        let a = f.head_position(12.5, 40.0, 0.5);
        let b = f.head_position(12.5, 40.0, 0.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sway_bounded_under_extreme_wind() {
        let f = flower(31);
        let bound = 10.0 * 1.2 + MAX_EFFECTIVE_WIND * (WIND_LEAN + WIND_FLUTTER) + 1.0;
        for i in 0..500 {
            let t = i as f64 * 0.37;
            let offset = f.sway_offset(t, 1e9, 0.0);
            assert!(offset.x.abs() <= bound);
            assert!(offset.y.abs() <= bound);
        }
        assert_eq!(f.sway_offset(1.0, 1e9, 0.0), f.sway_offset(1.0, 100.0, 0.0));
    }

    #[test]
    fn test_non_finite_wind_degrades_to_idle() {
        let f = flower(41);
        assert_eq!(f.sway_offset(2.0, f32::NAN, 0.0), f.sway_offset(2.0, 0.0, 0.0));
        let offset = f.sway_offset(2.0, 10.0, f32::INFINITY);
        assert!(offset.is_finite());
    }

    #[test]
    fn test_glow_pulse_bounded() {
        let f = flower(51);
        for i in 0..1000 {
            let g = f.glow_pulse(i as f64 * 0.1);
            assert!((0.0..=1.0).contains(&g));
        }
    }

    #[test]
    fn test_grow_clamps() {
        let mut f = flower(61);
        for _ in 0..40 {
            f.grow(0.05, 2.5);
        }
        assert!((f.scale() - 2.5).abs() < 1e-6);
        assert!(!f.grow(0.05, 2.5));
    }

    #[test]
    fn test_stem_path_sets_anchor_and_head() {
        let path = vec![
            Vec2::new(50.0, 600.0),
            Vec2::new(60.0, 500.0),
            Vec2::new(80.0, 400.0),
        ];
        let f = Flower::from_stem_path(FlowerId(2), path, 9, 1.0).unwrap();
        assert_eq!(f.anchor(), Vec2::new(50.0, 600.0));
        assert_eq!(f.head(), Vec2::new(80.0, 400.0));
        assert!((f.stem_height() - 200.0).abs() < 1e-4);
        assert!(Flower::from_stem_path(FlowerId(3), vec![Vec2::ZERO], 9, 1.0).is_none());
    }

    #[test]
    fn test_move_keeps_drawn_anchor() {
        let path = vec![Vec2::new(0.0, 600.0), Vec2::new(0.0, 400.0)];
        let mut f = Flower::from_stem_path(FlowerId(4), path, 1, 1.0).unwrap();
        f.move_to(Vec2::new(30.0, 380.0));
        assert_eq!(f.anchor(), Vec2::new(0.0, 600.0));
        assert_eq!(f.stem_path().unwrap()[1], Vec2::new(30.0, 380.0));

        let mut tapped = flower(5);
        tapped.move_to(Vec2::new(250.0, 90.0));
        assert_eq!(tapped.anchor().x, 250.0);
        assert_eq!(tapped.head(), Vec2::new(250.0, 90.0));
    }
}
