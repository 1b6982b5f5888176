//! Per-frame wind integration and hold-to-grow ticking.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use super::{GardenState, Gust, MotionSample};
use crate::schema::{GardenConfig, GustConfig, WindConfig};

/// Frame rate the per-frame gains and decay factor are expressed in.
pub const REFERENCE_FPS: f64 = 60.0;
/// Most growth ticks replayed in a single frame after a stall.
pub const MAX_GROWTH_CATCH_UP: usize = 64;

/// Outcome of one physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// Seconds since the previous step (0 on the first).
    pub dt: f64,
    /// Wind strength after the step.
    pub wind_strength: f32,
    /// Growth ticks that changed a flower's scale.
    pub grow_ticks: usize,
    /// Whether a gust owned the wind during this step.
    pub gusting: bool,
}

/// Integrates wind and growth once per animation tick.
#[derive(Debug, Clone)]
pub struct PhysicsUpdater {
    wind: WindConfig,
    gust: GustConfig,
}

impl PhysicsUpdater {
    pub fn new(config: &GardenConfig) -> Self {
        Self {
            wind: config.wind.clone(),
            gust: config.wind.gust.clone(),
        }
    }

    /// Advance the garden to `time`.
    ///
    /// Missing motion counts as zero input. Non-finite or backwards timestamps do not move
    /// the clock.
    pub fn step(
        &self,
        state: &mut GardenState,
        time: f64,
        motion: Option<MotionSample>,
    ) -> StepReport {
        let motion = motion.map(MotionSample::sanitized).unwrap_or_default();

        // 1. Clock
        if !time.is_finite() {
            log::warn!("ignoring non-finite frame time");
            return StepReport {
                wind_strength: state.wind.strength,
                ..StepReport::default()
            };
        }
        let dt = if state.clock_started {
            (time - state.current_time).max(0.0)
        } else {
            state.clock_started = true;
            0.0
        };
        state.current_time = state.current_time.max(time);
        let now = state.current_time;
        let frames = (dt * REFERENCE_FPS) as f32;

        // Parallax input for the renderer
        state.tilt = if state.visuals().parallax_enabled {
            Vec2::new(motion.tilt_x, motion.tilt_y)
        } else {
            Vec2::ZERO
        };

        // 2. Gust override, otherwise exponential decay
        let gusting = match state.wind.gust {
            Some(gust) => {
                match gust.strength_at(now) {
                    Some(strength) => state.wind.strength = strength,
                    None => {
                        log::debug!("gust settled at {:.2}", gust.rest);
                        state.wind.strength = gust.rest;
                        state.wind.gust = None;
                    }
                }
                true
            }
            None => {
                self.decay(state, frames);
                false
            }
        };

        // 3. Gyro stirring
        if state.visuals().gyro_wind_enabled && motion.gyro_rate != 0.0 && frames > 0.0 {
            let rate = motion.gyro_rate;
            state.wind.direction = (state.wind.direction
                + rate * self.wind.gyro_direction_gain * frames)
                .rem_euclid(TAU);
            if state.wind.gust.is_none() {
                state.wind.strength = (state.wind.strength
                    + rate.abs() * self.wind.gyro_strength_gain * frames)
                    .min(self.wind.cap);
            }
        }

        // 4. Hold-to-grow
        let grow_ticks = state.advance_growth(now, MAX_GROWTH_CATCH_UP);

        let report = StepReport {
            dt,
            wind_strength: state.wind.strength,
            grow_ticks,
            gusting,
        };
        log::trace!("physics step {report:?}");
        report
    }

    /// Frame-rate independent multiplicative decay with a snap to zero.
    fn decay(&self, state: &mut GardenState, frames: f32) {
        if frames <= 0.0 {
            return;
        }
        let wind = &mut state.wind;
        wind.strength *= wind.decay_rate.powf(frames);
        if wind.strength < self.wind.epsilon {
            wind.strength = 0.0;
        }
    }

    /// Turn a finished horizontal swipe into a gust. Returns `false` for non-swipes.
    ///
    /// Rightward swipes blow at 0 rad, leftward at π. The peak grows with swipe length.
    pub fn swipe(&self, state: &mut GardenState, translation: Vec2, time: f64) -> bool {
        let g = &self.gust;
        if !translation.is_finite()
            || translation.length() <= g.min_distance
            || translation.x.abs() <= translation.y.abs() * g.horizontal_ratio
        {
            return false;
        }
        let direction = if translation.x > 0.0 { 0.0 } else { PI };
        let peak = (translation.x.abs() / g.distance_per_strength)
            .min(g.max_peak)
            .min(self.wind.cap);
        let start = if time.is_finite() {
            time
        } else {
            state.current_time()
        };
        let gust = Gust {
            start_time: start,
            from: state.wind.strength,
            peak,
            rest: g.rest_strength.min(self.wind.cap),
            rise: g.rise,
            fall: g.fall,
        };
        log::debug!("swipe gust peak {peak:.1} direction {direction:.2}");
        state.set_gust(gust, direction);
        true
    }
}
