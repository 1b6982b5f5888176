//! The garden session: state, physics and renderer behind one frame-driven facade.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{
    FeedbackSink, FlowerId, GardenEvent, GardenState, Gesture, MotionSource, NoMotion, NullFeedback,
    PhysicsUpdater, StepReport, Viewport,
};
use crate::render::{Frame, Renderer};
use crate::schema::{ConfigError, GardenConfig, Palette};

/// Drags shorter than this count as a hold.
pub const HOLD_SLOP: f32 = 5.0;
/// Shortest drawn path that plants a stem.
pub const MIN_STEM_LENGTH: f32 = 60.0;
/// Minimum spacing between recorded path points.
const PATH_SPACING: f32 = 4.0;

/// What a gesture did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureOutcome {
    Ignored,
    Spawned(FlowerId),
    Growing(FlowerId),
    Drawing,
    Planted(FlowerId),
    Gust,
    Released,
    Scaled(f32),
    Reset,
}

/// Snapshot for front-ends and progress output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GardenStats {
    pub time: f64,
    pub flowers: usize,
    pub stems: usize,
    pub wind_strength: f32,
    pub wind_direction: f32,
    pub gusting: bool,
    pub growing: bool,
    pub palette: Palette,
}

/// Pointer state of the drag in progress.
#[derive(Debug, Clone)]
struct DragTracker {
    start: Vec2,
    flower: Option<FlowerId>,
    path: Vec<Vec2>,
    drawing: bool,
}

impl DragTracker {
    fn new(start: Vec2) -> Self {
        Self {
            start,
            flower: None,
            path: vec![start],
            drawing: false,
        }
    }

    fn extend(&mut self, point: Vec2) {
        if !point.is_finite() {
            return;
        }
        let far_enough = self
            .path
            .last()
            .is_none_or(|last| last.distance(point) >= PATH_SPACING);
        if far_enough {
            self.path.push(point);
        }
    }

    fn path_length(&self) -> f32 {
        self.path.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

/// A running garden.
///
/// Drive it with [`tick`](Self::tick) once per display frame. Gestures and direct
/// mutations may be interleaved freely between ticks; their events reach the feedback
/// sink before the call returns.
pub struct Garden {
    state: GardenState,
    physics: PhysicsUpdater,
    renderer: Renderer,
    feedback: Box<dyn FeedbackSink>,
    motion: Box<dyn MotionSource>,
    drag: Option<DragTracker>,
}

impl Garden {
    pub fn new(
        config: GardenConfig,
        feedback: impl FeedbackSink + 'static,
        motion: impl MotionSource + 'static,
    ) -> Result<Self, ConfigError> {
        let physics = PhysicsUpdater::new(&config);
        let renderer = Renderer::new(config.render.clone());
        let state = GardenState::new(config)?;
        log::info!("garden created");
        Ok(Self {
            state,
            physics,
            renderer,
            feedback: Box::new(feedback),
            motion: Box::new(motion),
            drag: None,
        })
    }

    /// A garden without feedback or motion.
    pub fn headless(config: GardenConfig) -> Result<Self, ConfigError> {
        Self::new(config, NullFeedback, NoMotion)
    }

    pub fn state(&self) -> &GardenState {
        &self.state
    }

    /// Mutable state for knob setters. Events queued through it are forwarded on the
    /// next call that flushes.
    pub fn state_mut(&mut self) -> &mut GardenState {
        &mut self.state
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    fn flush(&mut self) {
        for event in self.state.drain_events() {
            self.feedback.notify(&event);
        }
    }

    /// Advance physics to `time` using the latest motion sample.
    pub fn update(&mut self, time: f64) -> StepReport {
        let motion = self.motion.sample();
        let report = self.physics.step(&mut self.state, time, motion);
        self.flush();
        report
    }

    pub fn render(&self, time: f64, viewport: Viewport) -> Frame {
        self.renderer.render(&self.state, time, viewport)
    }

    /// Update then render.
    pub fn tick(&mut self, time: f64, viewport: Viewport) -> Frame {
        self.update(time);
        self.render(time, viewport)
    }

    pub fn stats(&self) -> GardenStats {
        let wind = self.state.wind();
        GardenStats {
            time: self.state.current_time(),
            flowers: self.state.flower_count(),
            stems: self.state.stem_count(),
            wind_strength: wind.strength,
            wind_direction: wind.direction,
            gusting: wind.gust.is_some(),
            growing: self.state.grow_session().is_some(),
            palette: self.state.palette(),
        }
    }

    /// Route a resolved gesture.
    pub fn handle_gesture(&mut self, gesture: Gesture, viewport: Viewport) -> GestureOutcome {
        let outcome = match gesture {
            Gesture::Tap(point) if point.is_finite() => {
                GestureOutcome::Spawned(self.state.spawn_flower(point, viewport))
            }
            Gesture::Tap(_) => GestureOutcome::Ignored,
            Gesture::DragStart { point } if point.is_finite() => {
                self.drag = Some(DragTracker::new(point));
                self.hold(viewport)
            }
            Gesture::DragStart { .. } => GestureOutcome::Ignored,
            Gesture::DragMove { point, translation } => {
                self.drag_move(point, translation, viewport)
            }
            Gesture::DragEnd {
                point, translation, ..
            } => self.drag_end(point, translation),
            Gesture::Pinch(factor) if factor.is_finite() && factor > 0.0 => {
                let scale = self.state.visuals().global_scale * factor;
                GestureOutcome::Scaled(self.state.set_global_scale(scale))
            }
            Gesture::Pinch(_) => GestureOutcome::Ignored,
            Gesture::Shake => {
                self.drag = None;
                self.state.record(GardenEvent::Shaken);
                self.state.reset_to_defaults();
                GestureOutcome::Reset
            }
        };
        log::trace!("{gesture:?} -> {outcome:?}");
        self.flush();
        outcome
    }

    /// Spawn the drag's flower once, then keep it growing.
    fn hold(&mut self, viewport: Viewport) -> GestureOutcome {
        let Some(drag) = self.drag.as_mut() else {
            return GestureOutcome::Ignored;
        };
        let now = self.state.current_time;
        match drag.flower {
            Some(id) => {
                if self.state.grow_session().is_none_or(|s| s.flower != id) {
                    self.state.start_growing(id, now);
                }
                GestureOutcome::Growing(id)
            }
            None => {
                let id = self.state.spawn_flower(drag.start, viewport);
                drag.flower = Some(id);
                self.state.start_growing(id, now);
                GestureOutcome::Spawned(id)
            }
        }
    }

    fn drag_move(&mut self, point: Vec2, translation: Vec2, viewport: Viewport) -> GestureOutcome {
        if !point.is_finite() || !translation.is_finite() {
            return GestureOutcome::Ignored;
        }
        // No tracker once the drag was cancelled; wait for the next DragStart
        let Some(drag) = self.drag.as_mut() else {
            return GestureOutcome::Ignored;
        };
        if !drag.drawing && translation.length() < HOLD_SLOP {
            return self.hold(viewport);
        }
        if !drag.drawing {
            drag.drawing = true;
            self.state.stop_growing();
        }
        drag.extend(point);
        GestureOutcome::Drawing
    }

    fn drag_end(&mut self, point: Vec2, translation: Vec2) -> GestureOutcome {
        self.state.stop_growing();
        let Some(mut drag) = self.drag.take() else {
            return GestureOutcome::Released;
        };
        let now = self.state.current_time();
        if self.physics.swipe(&mut self.state, translation, now) {
            return GestureOutcome::Gust;
        }
        if !drag.drawing {
            return GestureOutcome::Released;
        }
        drag.extend(point);
        if drag.path_length() < MIN_STEM_LENGTH {
            return GestureOutcome::Released;
        }
        // The stem's own flower replaces the one spawned when the drag began
        if let Some(seedling) = drag.flower {
            self.state.remove_flower(seedling);
        }
        match self.state.plant_stem(drag.path, now) {
            Some(id) => GestureOutcome::Planted(id),
            None => GestureOutcome::Released,
        }
    }

    pub fn spawn_flower(&mut self, point: Vec2, viewport: Viewport) -> FlowerId {
        let id = self.state.spawn_flower(point, viewport);
        self.flush();
        id
    }

    pub fn spawn_random_flower(&mut self, viewport: Viewport) -> FlowerId {
        let id = self.state.spawn_random_flower(viewport);
        self.flush();
        id
    }

    pub fn plant_stem(&mut self, path: Vec<Vec2>) -> Option<FlowerId> {
        let now = self.state.current_time();
        let id = self.state.plant_stem(path, now);
        self.flush();
        id
    }

    pub fn grow_flower(&mut self, id: FlowerId) -> bool {
        let grew = self.state.grow_flower(id);
        self.flush();
        grew
    }

    /// Start growing `id` on the garden clock.
    pub fn start_growing(&mut self, id: FlowerId) -> bool {
        let now = self.state.current_time();
        self.state.start_growing(id, now)
    }

    pub fn stop_growing(&mut self) {
        self.state.stop_growing();
    }

    pub fn move_flower(&mut self, id: FlowerId, point: Vec2) -> bool {
        self.state.move_flower(id, point)
    }

    pub fn remove_flower(&mut self, id: FlowerId) -> bool {
        self.state.remove_flower(id)
    }

    pub fn find_nearest_flower(&self, point: Vec2, threshold: Option<f32>) -> Option<FlowerId> {
        self.state.find_nearest_flower(point, threshold)
    }

    pub fn apply_wind_impulse(&mut self, strength: f32, direction: f32) {
        self.state.apply_wind_impulse(strength, direction);
        self.flush();
    }

    /// Start a swipe gust from a drag translation. Returns `false` for non-swipes.
    pub fn start_gust(&mut self, translation: Vec2) -> bool {
        let now = self.state.current_time();
        let started = self.physics.swipe(&mut self.state, translation, now);
        self.flush();
        started
    }

    pub fn cycle_palette(&mut self) -> Palette {
        let palette = self.state.cycle_palette();
        self.flush();
        palette
    }

    pub fn clear_all(&mut self) {
        self.drag = None;
        self.state.clear_all();
        self.flush();
    }

    pub fn reset_to_defaults(&mut self) {
        self.drag = None;
        self.state.reset_to_defaults();
        self.flush();
    }
}

impl std::fmt::Debug for Garden {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Garden")
            .field("state", &self.state)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::garden::{FeedbackKind, LatestMotion, MotionSample};
    use crate::render::Layer;

    const VIEWPORT: Viewport = Viewport::new(400.0, 800.0);

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<GardenEvent>>>);

    impl FeedbackSink for Recorder {
        fn notify(&mut self, event: &GardenEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    fn config() -> GardenConfig {
        GardenConfig {
            seed: Some(99),
            ..GardenConfig::default()
        }
    }

    fn recorded() -> (Garden, Recorder) {
        let recorder = Recorder::default();
        let garden = Garden::new(config(), recorder.clone(), NoMotion).unwrap();
        (garden, recorder)
    }

    #[test]
    fn test_tap_spawns_and_notifies() {
        let (mut garden, events) = recorded();
        let outcome = garden.handle_gesture(Gesture::Tap(Vec2::new(100.0, 100.0)), VIEWPORT);
        let GestureOutcome::Spawned(id) = outcome else {
            panic!("tap should spawn, got {outcome:?}");
        };
        assert_eq!(*events.0.borrow(), vec![GardenEvent::Spawned(id)]);
        assert_eq!(
            garden.handle_gesture(Gesture::Tap(Vec2::NAN), VIEWPORT),
            GestureOutcome::Ignored
        );
    }

    #[test]
    fn test_hold_spawns_once_and_grows() {
        let (mut garden, _) = recorded();
        garden.update(0.0);
        let start = Vec2::new(150.0, 300.0);
        let GestureOutcome::Spawned(id) =
            garden.handle_gesture(Gesture::DragStart { point: start }, VIEWPORT)
        else {
            panic!("drag start should spawn");
        };
        let jitter = Gesture::DragMove {
            point: start + Vec2::new(1.0, 1.0),
            translation: Vec2::new(1.0, 1.0),
        };
        assert_eq!(garden.handle_gesture(jitter, VIEWPORT), GestureOutcome::Growing(id));
        assert_eq!(garden.state().flower_count(), 1);

        for frame in 1..=30 {
            garden.update(frame as f64 / 60.0);
        }
        let scale = garden.state().flower(id).unwrap().scale();
        assert!(scale > 1.4 && scale < 1.6, "scale {scale}");

        let end = Gesture::DragEnd {
            point: start,
            translation: Vec2::ZERO,
            duration: 0.5,
        };
        assert_eq!(garden.handle_gesture(end, VIEWPORT), GestureOutcome::Released);
        assert!(garden.state().grow_session().is_none());
    }

    #[test]
    fn test_swipe_becomes_gust() {
        let (mut garden, events) = recorded();
        garden.update(0.0);
        let start = Vec2::new(300.0, 400.0);
        garden.handle_gesture(Gesture::DragStart { point: start }, VIEWPORT);
        garden.handle_gesture(
            Gesture::DragMove {
                point: start + Vec2::new(-120.0, 5.0),
                translation: Vec2::new(-120.0, 5.0),
            },
            VIEWPORT,
        );
        let outcome = garden.handle_gesture(
            Gesture::DragEnd {
                point: start + Vec2::new(-250.0, 10.0),
                translation: Vec2::new(-250.0, 10.0),
                duration: 0.3,
            },
            VIEWPORT,
        );
        assert_eq!(outcome, GestureOutcome::Gust);
        assert!(garden.stats().gusting);
        assert!(
            events
                .0
                .borrow()
                .iter()
                .any(|e| matches!(e, GardenEvent::WindGust { .. }))
        );
    }

    #[test]
    fn test_vertical_drag_plants_stem() {
        let (mut garden, _) = recorded();
        garden.update(0.0);
        let start = Vec2::new(200.0, 620.0);
        let GestureOutcome::Spawned(seedling) =
            garden.handle_gesture(Gesture::DragStart { point: start }, VIEWPORT)
        else {
            panic!("drag start should spawn");
        };
        for step in 1..=30 {
            let translation = Vec2::new(step as f32 * 0.5, -(step as f32) * 8.0);
            garden.handle_gesture(
                Gesture::DragMove {
                    point: start + translation,
                    translation,
                },
                VIEWPORT,
            );
        }
        let translation = Vec2::new(15.0, -240.0);
        let outcome = garden.handle_gesture(
            Gesture::DragEnd {
                point: start + translation,
                translation,
                duration: 1.0,
            },
            VIEWPORT,
        );
        let GestureOutcome::Planted(id) = outcome else {
            panic!("expected a planted stem, got {outcome:?}");
        };
        assert!(garden.state().flower(seedling).is_none());
        assert_eq!(garden.state().flower_count(), 1);
        assert_eq!(garden.state().stem_count(), 1);
        assert_eq!(garden.state().flower(id).unwrap().anchor(), start);
    }

    #[test]
    fn test_short_drawing_released() {
        let (mut garden, _) = recorded();
        let start = Vec2::new(200.0, 500.0);
        garden.handle_gesture(Gesture::DragStart { point: start }, VIEWPORT);
        garden.handle_gesture(
            Gesture::DragMove {
                point: start + Vec2::new(0.0, -20.0),
                translation: Vec2::new(0.0, -20.0),
            },
            VIEWPORT,
        );
        let outcome = garden.handle_gesture(
            Gesture::DragEnd {
                point: start + Vec2::new(0.0, -30.0),
                translation: Vec2::new(0.0, -30.0),
                duration: 0.2,
            },
            VIEWPORT,
        );
        assert_eq!(outcome, GestureOutcome::Released);
        assert_eq!(garden.state().stem_count(), 0);
    }

    #[test]
    fn test_pinch_scales_clamped() {
        let (mut garden, _) = recorded();
        assert_eq!(
            garden.handle_gesture(Gesture::Pinch(1.5), VIEWPORT),
            GestureOutcome::Scaled(1.5)
        );
        // Factors are per-event deltas and compound
        let GestureOutcome::Scaled(scale) = garden.handle_gesture(Gesture::Pinch(0.8), VIEWPORT)
        else {
            panic!("pinch should scale");
        };
        assert!((scale - 1.2).abs() < 1e-5);
        assert_eq!(
            garden.handle_gesture(Gesture::Pinch(10.0), VIEWPORT),
            GestureOutcome::Scaled(2.0)
        );
        assert_eq!(
            garden.handle_gesture(Gesture::Pinch(-1.0), VIEWPORT),
            GestureOutcome::Ignored
        );
    }

    #[test]
    fn test_shake_resets() {
        let (mut garden, events) = recorded();
        garden.spawn_flower(Vec2::new(100.0, 100.0), VIEWPORT);
        garden.cycle_palette();
        assert_eq!(garden.handle_gesture(Gesture::Shake, VIEWPORT), GestureOutcome::Reset);
        assert_eq!(garden.state().flower_count(), 0);
        assert_eq!(garden.state().palette(), Palette::Pastel);
        let events = events.0.borrow();
        assert_eq!(events.last(), Some(&GardenEvent::Reset));
        let shaken = events.iter().position(|e| *e == GardenEvent::Shaken).unwrap();
        assert_eq!(events[shaken].feedback(), FeedbackKind::Warning);
        assert_eq!(events[shaken + 1], GardenEvent::Cleared);
    }

    #[test]
    fn test_clear_cancels_drag_in_progress() {
        let (mut garden, _) = recorded();
        garden.update(0.0);
        let start = Vec2::new(150.0, 300.0);
        garden.handle_gesture(Gesture::DragStart { point: start }, VIEWPORT);
        garden.clear_all();

        let jitter = Gesture::DragMove {
            point: start + Vec2::new(1.0, 1.0),
            translation: Vec2::new(1.0, 1.0),
        };
        assert_eq!(garden.handle_gesture(jitter, VIEWPORT), GestureOutcome::Ignored);
        assert_eq!(garden.state().flower_count(), 0);
        assert!(garden.state().grow_session().is_none());

        let end = Gesture::DragEnd {
            point: start,
            translation: Vec2::ZERO,
            duration: 0.4,
        };
        assert_eq!(garden.handle_gesture(end, VIEWPORT), GestureOutcome::Released);
        assert_eq!(garden.state().flower_count(), 0);

        // The next gesture starts fresh
        assert!(matches!(
            garden.handle_gesture(Gesture::DragStart { point: start }, VIEWPORT),
            GestureOutcome::Spawned(_)
        ));
    }

    #[test]
    fn test_tick_renders_spawned_flower() {
        let (mut garden, _) = recorded();
        garden.spawn_flower(Vec2::new(200.0, 300.0), VIEWPORT);
        let frame = garden.tick(0.0, VIEWPORT);
        assert_eq!(frame.layer(Layer::Heads).unwrap().commands.len(), 1);
        assert!(frame.command_count() > 700);
    }

    #[test]
    fn test_motion_source_feeds_physics() {
        let motion = LatestMotion {
            current: Some(MotionSample {
                tilt_x: 0.3,
                tilt_y: 0.0,
                gyro_rate: 0.0,
            }),
        };
        let mut garden = Garden::new(config(), NullFeedback, motion).unwrap();
        garden.update(0.0);
        assert_eq!(garden.state().tilt(), Vec2::new(0.3, 0.0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut bad = config();
        bad.capacity.max_flowers = 0;
        assert!(matches!(
            Garden::headless(bad),
            Err(ConfigError::InvalidCapacity)
        ));
    }
}
