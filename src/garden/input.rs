//! Inputs from external collaborators: viewport, device motion and resolved gestures.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::schema::ConfigError;

/// Display surface size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Checked constructor for host-supplied sizes.
    pub fn try_new(width: f32, height: f32) -> Result<Self, ConfigError> {
        let viewport = Self::new(width, height);
        if viewport.is_valid() {
            Ok(viewport)
        } else {
            Err(ConfigError::InvalidViewport)
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Whether `point` lies within the viewport grown by `margin` on every side.
    #[inline]
    pub fn contains_with_margin(&self, point: Vec2, margin: f32) -> bool {
        point.is_finite()
            && point.x >= -margin
            && point.y >= -margin
            && point.x <= self.width + margin
            && point.y <= self.height + margin
    }

    /// Whether the box spanned by `min` and `max` touches the viewport grown by `margin`.
    #[inline]
    pub fn overlaps_with_margin(&self, min: Vec2, max: Vec2, margin: f32) -> bool {
        min.is_finite()
            && max.is_finite()
            && max.x >= -margin
            && max.y >= -margin
            && min.x <= self.width + margin
            && min.y <= self.height + margin
    }
}

/// One smoothed device-motion reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    /// Horizontal tilt in [-1, 1].
    pub tilt_x: f32,
    /// Vertical tilt in [-1, 1].
    pub tilt_y: f32,
    /// Rotation rate about the screen normal (radians per second).
    pub gyro_rate: f32,
}

impl MotionSample {
    /// Replace non-finite readings with zero and clamp tilt into [-1, 1].
    pub fn sanitized(self) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            tilt_x: finite(self.tilt_x).clamp(-1.0, 1.0),
            tilt_y: finite(self.tilt_y).clamp(-1.0, 1.0),
            gyro_rate: finite(self.gyro_rate),
        }
    }
}

/// Supplier of device motion, polled once per tick.
pub trait MotionSource {
    /// Latest reading, or `None` when the sensor is unavailable.
    fn sample(&mut self) -> Option<MotionSample>;
}

/// A device without motion sensors.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMotion;

impl MotionSource for NoMotion {
    fn sample(&mut self) -> Option<MotionSample> {
        None
    }
}

/// Holds whatever the host last pushed. Useful when motion arrives through callbacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct LatestMotion {
    pub current: Option<MotionSample>,
}

impl LatestMotion {
    pub fn set(&mut self, sample: MotionSample) {
        self.current = Some(sample);
    }
}

impl MotionSource for LatestMotion {
    fn sample(&mut self) -> Option<MotionSample> {
        self.current
    }
}

/// Low-pass filters the tilt of a raw source. The gyro rate passes through.
#[derive(Debug, Clone)]
pub struct LowPassMotion<S> {
    source: S,
    alpha: f32,
    smoothed: MotionSample,
}

impl<S: MotionSource> LowPassMotion<S> {
    /// Smoothing factor used for parallax tilt.
    pub const DEFAULT_ALPHA: f32 = 0.05;

    pub fn new(source: S) -> Self {
        Self::with_alpha(source, Self::DEFAULT_ALPHA)
    }

    pub fn with_alpha(source: S, alpha: f32) -> Self {
        Self {
            source,
            alpha: alpha.clamp(0.0, 1.0),
            smoothed: MotionSample::default(),
        }
    }
}

impl<S: MotionSource> MotionSource for LowPassMotion<S> {
    fn sample(&mut self) -> Option<MotionSample> {
        let raw = self.source.sample()?.sanitized();
        let a = self.alpha;
        self.smoothed = MotionSample {
            tilt_x: self.smoothed.tilt_x * (1.0 - a) + raw.tilt_x * a,
            tilt_y: self.smoothed.tilt_y * (1.0 - a) + raw.tilt_y * a,
            gyro_rate: raw.gyro_rate,
        };
        Some(self.smoothed)
    }
}

impl<S: MotionSource + ?Sized> MotionSource for Box<S> {
    fn sample(&mut self) -> Option<MotionSample> {
        (**self).sample()
    }
}

/// Resolved gesture events from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    Tap(Vec2),
    DragStart {
        point: Vec2,
    },
    DragMove {
        point: Vec2,
        /// Offset from the drag start.
        translation: Vec2,
    },
    DragEnd {
        point: Vec2,
        translation: Vec2,
        /// Seconds since the drag started.
        duration: f64,
    },
    /// Incremental magnification since the previous pinch event, not the cumulative
    /// gesture scale. Each event multiplies the global scale.
    Pinch(f32),
    Shake,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(MotionSample);

    impl MotionSource for Constant {
        fn sample(&mut self) -> Option<MotionSample> {
            Some(self.0)
        }
    }

    #[test]
    fn test_low_pass_converges() {
        let mut motion = LowPassMotion::new(Constant(MotionSample {
            tilt_x: 1.0,
            tilt_y: -1.0,
            gyro_rate: 0.5,
        }));
        let first = motion.sample().unwrap();
        assert!((first.tilt_x - 0.05).abs() < 1e-6);
        assert_eq!(first.gyro_rate, 0.5);
        let mut last = first;
        for _ in 0..500 {
            last = motion.sample().unwrap();
        }
        assert!((last.tilt_x - 1.0).abs() < 1e-3);
        assert!((last.tilt_y + 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_unavailable_sensor() {
        let mut motion = LowPassMotion::new(NoMotion);
        assert!(motion.sample().is_none());
    }

    #[test]
    fn test_sanitize() {
        let s = MotionSample {
            tilt_x: f32::NAN,
            tilt_y: 3.0,
            gyro_rate: f32::INFINITY,
        }
        .sanitized();
        assert_eq!(s, MotionSample {
            tilt_x: 0.0,
            tilt_y: 1.0,
            gyro_rate: 0.0
        });
    }

    #[test]
    fn test_viewport_margin() {
        let vp = Viewport::new(400.0, 800.0);
        assert!(vp.contains_with_margin(Vec2::new(-50.0, 100.0), 60.0));
        assert!(!vp.contains_with_margin(Vec2::new(-500.0, 100.0), 60.0));
        assert!(!vp.contains_with_margin(Vec2::new(f32::NAN, 100.0), 60.0));
        assert!(!Viewport::new(0.0, 10.0).is_valid());
        assert!(matches!(
            Viewport::try_new(f32::NAN, 10.0),
            Err(ConfigError::InvalidViewport)
        ));
        assert_eq!(Viewport::try_new(400.0, 800.0).unwrap(), vp);
    }

    #[test]
    fn test_viewport_overlap_spans_across() {
        let vp = Viewport::new(400.0, 800.0);
        // Both corners outside, box crosses the viewport
        assert!(vp.overlaps_with_margin(Vec2::new(-900.0, 100.0), Vec2::new(900.0, 200.0), 0.0));
        assert!(vp.overlaps_with_margin(Vec2::new(-150.0, 0.0), Vec2::new(-60.0, 10.0), 100.0));
        assert!(!vp.overlaps_with_margin(Vec2::new(-300.0, 0.0), Vec2::new(-200.0, 10.0), 100.0));
        assert!(!vp.overlaps_with_margin(Vec2::NAN, Vec2::ZERO, 100.0));
    }
}
