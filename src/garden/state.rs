//! Garden state - the aggregate root for flowers, stems and environment.
//!
//! All gesture-driven mutations land here. Each mutation queues the matching
//! [`GardenEvent`] in an outbox that the owner drains after the call.

use std::collections::VecDeque;

use glam::Vec2;

use super::{Flower, FlowerId, GardenEvent, SeededRandom, Stem, Viewport};
use crate::schema::{ConfigError, GardenConfig, Palette, VisualConfig};

/// Mixed into a flower seed to derive its stem's leaf seed.
const LEAF_SEED_SALT: u64 = 0x5EED_1EAF;
/// Default pick radius for [`GardenState::find_nearest_flower`].
pub const DEFAULT_PICK_RADIUS: f32 = 48.0;

/// Scalar wind: a direction and a decaying strength.
#[derive(Debug, Clone, PartialEq)]
pub struct Wind {
    /// Direction in radians. 0 blows right, π blows left.
    pub direction: f32,
    /// Strength, never negative.
    pub strength: f32,
    /// Multiplicative decay per 60 Hz reference frame.
    pub decay_rate: f32,
    /// Active swipe gust, which owns `strength` while present.
    pub gust: Option<Gust>,
}

impl Wind {
    fn from_config(config: &GardenConfig) -> Self {
        Self {
            direction: config.wind.default_direction,
            strength: config.wind.default_strength,
            decay_rate: config.wind.decay_rate,
            gust: None,
        }
    }
}

/// Timed wind envelope: ease from `from` to `peak` over `rise` seconds, then to `rest`
/// over `fall` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gust {
    pub start_time: f64,
    pub from: f32,
    pub peak: f32,
    pub rest: f32,
    pub rise: f32,
    pub fall: f32,
}

impl Gust {
    /// Strength at `time`, or `None` once the envelope has finished.
    pub fn strength_at(&self, time: f64) -> Option<f32> {
        let elapsed = (time - self.start_time).max(0.0) as f32;
        if elapsed < self.rise {
            let t = elapsed / self.rise;
            Some(lerp(self.from, self.peak, smoothstep(t)))
        } else if elapsed < self.rise + self.fall {
            let t = (elapsed - self.rise) / self.fall;
            Some(lerp(self.peak, self.rest, smoothstep(t)))
        } else {
            None
        }
    }
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// An active grow-on-hold session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowSession {
    pub flower: FlowerId,
    pub started_at: f64,
    /// Timestamp of the last growth tick (or the start).
    pub last_tick: f64,
}

/// UI-adjustable visual knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct Visuals {
    pub bloom_intensity: f32,
    pub chromatic_offset: f32,
    pub global_scale: f32,
    pub show_stars: bool,
    pub show_grass: bool,
    pub show_fireflies: bool,
    pub parallax_enabled: bool,
    pub gyro_wind_enabled: bool,
}

impl From<&VisualConfig> for Visuals {
    fn from(config: &VisualConfig) -> Self {
        Self {
            bloom_intensity: config.bloom_range.clamp(config.bloom_intensity),
            chromatic_offset: config.chromatic_range.clamp(config.chromatic_offset),
            global_scale: config.scale_range.clamp(config.global_scale),
            show_stars: config.show_stars,
            show_grass: config.show_grass,
            show_fireflies: config.show_fireflies,
            parallax_enabled: config.parallax_enabled,
            gyro_wind_enabled: config.gyro_wind_enabled,
        }
    }
}

/// The mutable garden.
#[derive(Debug, Clone)]
pub struct GardenState {
    config: GardenConfig,
    flowers: VecDeque<Flower>,
    stems: VecDeque<Stem>,
    pub(crate) wind: Wind,
    palette: Palette,
    visuals: Visuals,
    pub(crate) tilt: Vec2,
    pub(crate) current_time: f64,
    pub(crate) clock_started: bool,
    grow_session: Option<GrowSession>,
    next_id: u64,
    seeds: SeededRandom,
    events: Vec<GardenEvent>,
}

impl GardenState {
    /// Build an empty garden from configuration.
    pub fn new(config: GardenConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let session_seed = config.seed.unwrap_or_else(rand::random::<u64>);
        log::debug!("garden session seed {session_seed:#x}");

        Ok(Self {
            flowers: VecDeque::with_capacity(config.capacity.max_flowers),
            stems: VecDeque::with_capacity(config.capacity.max_stems),
            wind: Wind::from_config(&config),
            palette: config.visuals.palette,
            visuals: Visuals::from(&config.visuals),
            tilt: Vec2::ZERO,
            current_time: 0.0,
            clock_started: false,
            grow_session: None,
            next_id: 1,
            seeds: SeededRandom::new(session_seed),
            events: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &GardenConfig {
        &self.config
    }

    /// Live flowers in z-order (oldest first).
    pub fn flowers(&self) -> impl ExactSizeIterator<Item = &Flower> + '_ {
        self.flowers.iter()
    }

    pub fn flower_ids(&self) -> Vec<FlowerId> {
        self.flowers.iter().map(Flower::id).collect()
    }

    pub fn flower_count(&self) -> usize {
        self.flowers.len()
    }

    pub fn flower(&self, id: FlowerId) -> Option<&Flower> {
        self.flowers.iter().find(|f| f.id() == id)
    }

    fn flower_mut(&mut self, id: FlowerId) -> Option<&mut Flower> {
        self.flowers.iter_mut().find(|f| f.id() == id)
    }

    /// Drawn stems, oldest first.
    pub fn stems(&self) -> impl ExactSizeIterator<Item = &Stem> + '_ {
        self.stems.iter()
    }

    pub fn stem_count(&self) -> usize {
        self.stems.len()
    }

    pub fn wind(&self) -> &Wind {
        &self.wind
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn visuals(&self) -> &Visuals {
        &self.visuals
    }

    /// Last smoothed device tilt.
    pub fn tilt(&self) -> Vec2 {
        self.tilt
    }

    /// Last observed animation timestamp.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn grow_session(&self) -> Option<&GrowSession> {
        self.grow_session.as_ref()
    }

    /// Ground level for a viewport.
    pub fn baseline(&self, viewport: Viewport) -> f32 {
        self.config.baseline(viewport.height)
    }

    /// Take every queued event.
    pub fn drain_events(&mut self) -> Vec<GardenEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queue an event raised outside the state, such as a device shake.
    pub(crate) fn record(&mut self, event: GardenEvent) {
        self.events.push(event);
    }

    fn allocate_id(&mut self) -> FlowerId {
        let id = FlowerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push_flower(&mut self, flower: Flower) {
        while self.flowers.len() >= self.config.capacity.max_flowers {
            if let Some(evicted) = self.flowers.pop_front() {
                let id = evicted.id();
                log::debug!("evicting {id} at capacity");
                self.stems.retain(|s| s.flower() != Some(id));
            }
        }
        self.flowers.push_back(flower);
    }

    fn push_stem(&mut self, stem: Stem) {
        while self.stems.len() >= self.config.capacity.max_stems {
            if let Some(evicted) = self.stems.pop_front() {
                log::debug!(
                    "evicting stem planted at {:.1}s at capacity",
                    evicted.created_at()
                );
            }
        }
        self.stems.push_back(stem);
    }

    /// Spawn a flower whose head is at `point`, seeded from the session seed stream.
    pub fn spawn_flower(&mut self, point: Vec2, viewport: Viewport) -> FlowerId {
        let seed = self.seeds.next_u64();
        self.spawn_flower_with_seed(point, viewport, seed)
    }

    /// Spawn a flower with an explicit generative seed.
    ///
    /// Heads below the baseline are lifted onto it; the anchor sits on the baseline
    /// directly beneath the head.
    pub fn spawn_flower_with_seed(&mut self, point: Vec2, viewport: Viewport, seed: u64) -> FlowerId {
        let baseline = if viewport.is_valid() {
            self.baseline(viewport)
        } else {
            log::warn!("spawn with invalid viewport {viewport:?}, skipping baseline clamp");
            point.y
        };
        let head = Vec2::new(point.x, point.y.min(baseline));
        let anchor = Vec2::new(point.x, baseline);

        let id = self.allocate_id();
        let flower = Flower::from_seed(id, head, anchor, seed, self.config.growth.initial_scale);
        log::debug!(
            "spawned {id} at ({:.1}, {:.1}) with {} petals",
            head.x,
            head.y,
            flower.petal_count()
        );
        self.push_flower(flower);
        self.events.push(GardenEvent::Spawned(id));
        id
    }

    /// Spawn a flower at a random spot away from the edges.
    pub fn spawn_random_flower(&mut self, viewport: Viewport) -> FlowerId {
        let x = self.seeds.next_f32(50.0, (viewport.width - 50.0).max(50.0));
        let y = self.seeds.next_f32(100.0, (viewport.height - 200.0).max(100.0));
        self.spawn_flower(Vec2::new(x, y), viewport)
    }

    /// Plant a drawn stem with a flower at its tip.
    ///
    /// Non-finite points are dropped. Returns `None` if fewer than two points remain.
    pub fn plant_stem(&mut self, path: Vec<Vec2>, time: f64) -> Option<FlowerId> {
        let path: Vec<Vec2> = path.into_iter().filter(|p| p.is_finite()).collect();
        if path.len() < 2 {
            return None;
        }
        let seed = self.seeds.next_u64();
        let id = self.allocate_id();
        let flower =
            Flower::from_stem_path(id, path.clone(), seed, self.config.growth.initial_scale)?;
        let stem = Stem::from_path(path, seed ^ LEAF_SEED_SALT, time).with_flower(id);
        log::debug!(
            "planted {id} on a {:.0} pt stem with {} leaves",
            stem.length(),
            stem.leaves().len()
        );
        self.push_flower(flower);
        self.push_stem(stem);
        self.events.push(GardenEvent::StemPlanted(id));
        Some(id)
    }

    /// One growth tick for `id`. Stale ids are ignored.
    ///
    /// Returns whether the scale changed.
    pub fn grow_flower(&mut self, id: FlowerId) -> bool {
        let increment = self.config.growth.increment;
        let max = self.config.growth.max_scale;
        let Some(flower) = self.flower_mut(id) else {
            return false;
        };
        if !flower.grow(increment, max) {
            return false;
        }
        let scale = flower.scale();
        self.events.push(GardenEvent::Grew { id, scale });
        true
    }

    /// Begin growing `id` on the hold clock, replacing any prior session.
    ///
    /// Returns `false` (and leaves no session) if the flower does not exist.
    pub fn start_growing(&mut self, id: FlowerId, time: f64) -> bool {
        if self.flower(id).is_none() {
            self.grow_session = None;
            return false;
        }
        self.grow_session = Some(GrowSession {
            flower: id,
            started_at: time,
            last_tick: time,
        });
        true
    }

    /// End the grow session. Safe to call with no session active.
    pub fn stop_growing(&mut self) {
        if let Some(session) = self.grow_session.take() {
            log::trace!("stopped growing {}", session.flower);
        }
    }

    /// Run the growth ticks that are due at `time`, at most `max_ticks`.
    ///
    /// A session whose flower has gone ends silently. Backlog beyond `max_ticks` is dropped.
    pub(crate) fn advance_growth(&mut self, time: f64, max_ticks: usize) -> usize {
        let interval = self.config.growth.interval;
        let Some(session) = self.grow_session.as_mut() else {
            return 0;
        };
        let id = session.flower;
        let mut due = 0;
        while time - session.last_tick >= interval && due < max_ticks {
            session.last_tick += interval;
            due += 1;
        }
        if due == max_ticks {
            session.last_tick = session.last_tick.max(time);
        }

        if self.flower(id).is_none() {
            self.grow_session = None;
            return 0;
        }
        (0..due).filter(|_| self.grow_flower(id)).count()
    }

    /// Move the nominal head of `id`. Returns `false` for stale ids.
    pub fn move_flower(&mut self, id: FlowerId, point: Vec2) -> bool {
        if !point.is_finite() {
            return false;
        }
        match self.flower_mut(id) {
            Some(flower) => {
                flower.move_to(point);
                true
            }
            None => false,
        }
    }

    /// Remove `id` and any stem planted with it.
    pub fn remove_flower(&mut self, id: FlowerId) -> bool {
        let before = self.flowers.len();
        self.flowers.retain(|f| f.id() != id);
        if self.flowers.len() == before {
            return false;
        }
        self.stems.retain(|s| s.flower() != Some(id));
        if self.grow_session.is_some_and(|s| s.flower == id) {
            self.grow_session = None;
        }
        true
    }

    /// Nearest swayed head within `threshold` of `point` at the current time.
    ///
    /// `None` uses [`DEFAULT_PICK_RADIUS`].
    pub fn find_nearest_flower(&self, point: Vec2, threshold: Option<f32>) -> Option<FlowerId> {
        let threshold = threshold.unwrap_or(DEFAULT_PICK_RADIUS);
        let mut best: Option<(FlowerId, f32)> = None;
        for flower in &self.flowers {
            let head = flower.head_position(
                self.current_time,
                self.wind.strength,
                self.wind.direction,
            );
            let distance = head.distance(point);
            if distance < threshold && best.is_none_or(|(_, d)| distance < d) {
                best = Some((flower.id(), distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Drop every flower and stem, end growth and reset the wind.
    pub fn clear_all(&mut self) {
        log::info!(
            "clearing {} flowers and {} stems",
            self.flowers.len(),
            self.stems.len()
        );
        self.flowers.clear();
        self.stems.clear();
        self.grow_session = None;
        self.wind = Wind::from_config(&self.config);
        self.events.push(GardenEvent::Cleared);
    }

    /// [`clear_all`](Self::clear_all) plus palette and visual knobs back to configuration.
    pub fn reset_to_defaults(&mut self) {
        self.clear_all();
        self.palette = self.config.visuals.palette;
        self.visuals = Visuals::from(&self.config.visuals);
        log::info!("garden reset to defaults");
        self.events.push(GardenEvent::Reset);
    }

    /// Advance to the next palette.
    pub fn cycle_palette(&mut self) -> Palette {
        self.palette = self.palette.next();
        log::info!("palette -> {}", self.palette);
        self.events.push(GardenEvent::PaletteChanged(self.palette));
        self.palette
    }

    /// Boost wind strength (capped) and set its direction. Cancels any gust.
    pub fn apply_wind_impulse(&mut self, strength: f32, direction: f32) {
        let impulse = if strength.is_finite() { strength.max(0.0) } else { 0.0 };
        let cap = self.config.wind.cap;
        self.wind.strength = (self.wind.strength + impulse).min(cap);
        if direction.is_finite() {
            self.wind.direction = direction;
        }
        self.wind.gust = None;
        self.events.push(GardenEvent::WindGust {
            strength: self.wind.strength,
            direction: self.wind.direction,
        });
    }

    /// Install a gust envelope. Used by the physics updater for swipes.
    pub(crate) fn set_gust(&mut self, gust: Gust, direction: f32) {
        self.wind.direction = direction;
        self.wind.gust = Some(gust);
        self.events.push(GardenEvent::WindGust {
            strength: gust.peak,
            direction,
        });
    }

    pub fn set_bloom_intensity(&mut self, value: f32) -> f32 {
        self.visuals.bloom_intensity = self.config.visuals.bloom_range.clamp(value);
        self.visuals.bloom_intensity
    }

    pub fn set_chromatic_offset(&mut self, value: f32) -> f32 {
        self.visuals.chromatic_offset = self.config.visuals.chromatic_range.clamp(value);
        self.visuals.chromatic_offset
    }

    pub fn set_global_scale(&mut self, value: f32) -> f32 {
        self.visuals.global_scale = self.config.visuals.scale_range.clamp(value);
        self.visuals.global_scale
    }

    pub fn set_show_stars(&mut self, on: bool) {
        self.visuals.show_stars = on;
    }

    pub fn set_show_grass(&mut self, on: bool) {
        self.visuals.show_grass = on;
    }

    pub fn set_show_fireflies(&mut self, on: bool) {
        self.visuals.show_fireflies = on;
    }

    pub fn set_parallax_enabled(&mut self, on: bool) {
        self.visuals.parallax_enabled = on;
        if !on {
            self.tilt = Vec2::ZERO;
        }
    }

    pub fn set_gyro_wind_enabled(&mut self, on: bool) {
        self.visuals.gyro_wind_enabled = on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport::new(400.0, 800.0);

    fn garden() -> GardenState {
        GardenState::new(GardenConfig {
            seed: Some(42),
            ..GardenConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_spawn_above_baseline_is_unclamped() {
        let mut g = garden();
        let id = g.spawn_flower(Vec2::new(100.0, 100.0), VIEWPORT);
        let f = g.flower(id).unwrap();
        assert_eq!(f.head(), Vec2::new(100.0, 100.0));
        assert!((f.anchor().y - 624.0).abs() < 1e-3);
        assert_eq!(g.drain_events(), vec![GardenEvent::Spawned(id)]);
    }

    #[test]
    fn test_spawn_below_baseline_is_clamped() {
        let mut g = garden();
        let id = g.spawn_flower(Vec2::new(100.0, 790.0), VIEWPORT);
        assert!((g.flower(id).unwrap().head().y - 624.0).abs() < 1e-3);
    }

    #[test]
    fn test_capacity_fifo_eviction() {
        let mut g = garden();
        let max = g.config().capacity.max_flowers;
        let ids: Vec<FlowerId> = (0..max + 5)
            .map(|i| g.spawn_flower(Vec2::new(i as f32, 100.0), VIEWPORT))
            .collect();
        assert_eq!(g.flower_count(), max);
        assert_eq!(g.flower_ids(), ids[5..].to_vec());
    }

    #[test]
    fn test_ids_never_reused() {
        let mut g = garden();
        let a = g.spawn_flower(Vec2::new(10.0, 10.0), VIEWPORT);
        g.clear_all();
        let b = g.spawn_flower(Vec2::new(10.0, 10.0), VIEWPORT);
        assert_ne!(a, b);
    }

    #[test]
    fn test_grow_forty_ticks_clamps() {
        let mut g = garden();
        let id = g.spawn_flower(Vec2::new(100.0, 100.0), VIEWPORT);
        assert_eq!(g.flower(id).unwrap().scale(), 1.0);
        for _ in 0..40 {
            g.grow_flower(id);
        }
        assert!((g.flower(id).unwrap().scale() - 2.5).abs() < 1e-5);
        let grew = g
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GardenEvent::Grew { .. }))
            .count();
        assert_eq!(grew, 30);
    }

    #[test]
    fn test_grow_stale_id_is_noop() {
        let mut g = garden();
        assert!(!g.grow_flower(FlowerId(999)));
        assert!(!g.move_flower(FlowerId(999), Vec2::ZERO));
        assert!(!g.remove_flower(FlowerId(999)));
        assert!(!g.start_growing(FlowerId(999), 0.0));
        assert!(g.drain_events().is_empty());
    }

    #[test]
    fn test_stop_growing_idempotent() {
        let mut g = garden();
        g.stop_growing();
        g.stop_growing();
        let id = g.spawn_flower(Vec2::new(100.0, 100.0), VIEWPORT);
        g.start_growing(id, 0.0);
        g.stop_growing();
        g.stop_growing();
        assert!(g.grow_session().is_none());
        assert_eq!(g.flower(id).unwrap().scale(), 1.0);
    }

    #[test]
    fn test_new_session_replaces_old() {
        let mut g = garden();
        let a = g.spawn_flower(Vec2::new(100.0, 100.0), VIEWPORT);
        let b = g.spawn_flower(Vec2::new(200.0, 100.0), VIEWPORT);
        g.start_growing(a, 0.0);
        g.start_growing(b, 0.0);
        assert_eq!(g.grow_session().unwrap().flower, b);
    }

    #[test]
    fn test_advance_growth_ticks() {
        let mut g = garden();
        let id = g.spawn_flower(Vec2::new(100.0, 100.0), VIEWPORT);
        g.start_growing(id, 10.0);
        assert_eq!(g.advance_growth(10.26, 64), 5);
        assert!((g.flower(id).unwrap().scale() - 1.25).abs() < 1e-5);
    }

    #[test]
    fn test_advance_growth_ends_for_evicted_flower() {
        let mut g = garden();
        let id = g.spawn_flower(Vec2::new(100.0, 100.0), VIEWPORT);
        g.start_growing(id, 0.0);
        g.remove_flower(id);
        assert!(g.grow_session().is_none());

        let id = g.spawn_flower(Vec2::new(100.0, 100.0), VIEWPORT);
        g.start_growing(id, 0.0);
        g.clear_all();
        assert_eq!(g.advance_growth(1.0, 64), 0);
        assert!(g.grow_session().is_none());
    }

    #[test]
    fn test_palette_cycle() {
        let mut g = garden();
        assert_eq!(g.palette().index(), 0);
        for _ in 0..7 {
            g.cycle_palette();
        }
        assert_eq!(g.palette().index(), 2);
    }

    #[test]
    fn test_wind_impulse_capped() {
        let mut g = garden();
        g.apply_wind_impulse(80.0, 1.0);
        g.apply_wind_impulse(80.0, 2.0);
        assert_eq!(g.wind().strength, 100.0);
        assert_eq!(g.wind().direction, 2.0);
        g.apply_wind_impulse(f32::NAN, f32::NAN);
        assert_eq!(g.wind().strength, 100.0);
        assert_eq!(g.wind().direction, 2.0);
    }

    #[test]
    fn test_clear_all_resets_wind() {
        let mut g = garden();
        g.spawn_flower(Vec2::new(100.0, 100.0), VIEWPORT);
        g.plant_stem(vec![Vec2::new(10.0, 600.0), Vec2::new(12.0, 400.0)], 0.0);
        g.apply_wind_impulse(50.0, 3.0);
        g.clear_all();
        assert_eq!(g.flower_count(), 0);
        assert_eq!(g.stem_count(), 0);
        assert_eq!(g.wind().strength, 5.0);
        assert_eq!(g.wind().direction, 0.0);
    }

    #[test]
    fn test_reset_restores_knobs() {
        let mut g = garden();
        g.cycle_palette();
        g.set_bloom_intensity(2.5);
        g.set_show_stars(false);
        g.reset_to_defaults();
        assert_eq!(g.palette(), Palette::Pastel);
        assert_eq!(g.visuals().bloom_intensity, 1.2);
        assert!(g.visuals().show_stars);
        let events = g.drain_events();
        assert_eq!(events.last(), Some(&GardenEvent::Reset));
    }

    #[test]
    fn test_knob_setters_clamp() {
        let mut g = garden();
        assert_eq!(g.set_bloom_intensity(10.0), 3.0);
        assert_eq!(g.set_chromatic_offset(-1.0), 0.0);
        assert_eq!(g.set_global_scale(0.1), 0.5);
    }

    #[test]
    fn test_plant_stem() {
        let mut g = garden();
        assert!(g.plant_stem(vec![Vec2::new(1.0, 1.0)], 0.0).is_none());
        let path: Vec<Vec2> = (0..20)
            .map(|i| Vec2::new(200.0 + i as f32, 620.0 - i as f32 * 12.0))
            .collect();
        let id = g.plant_stem(path, 1.0).unwrap();
        let stem = g.stems().next().unwrap();
        assert_eq!(stem.flower(), Some(id));
        assert_eq!(g.flower(id).unwrap().anchor(), Vec2::new(200.0, 620.0));
        assert!(g.remove_flower(id));
        assert_eq!(g.stem_count(), 0);
    }

    #[test]
    fn test_stem_capacity_keeps_newest() {
        let mut g = GardenState::new(GardenConfig {
            seed: Some(42),
            capacity: crate::schema::CapacityConfig {
                max_flowers: 60,
                max_stems: 1,
            },
            ..GardenConfig::default()
        })
        .unwrap();
        let path = vec![Vec2::new(50.0, 600.0), Vec2::new(60.0, 400.0)];
        g.plant_stem(path.clone(), 1.0).unwrap();
        let newest = g.plant_stem(path, 2.5).unwrap();
        assert_eq!(g.stem_count(), 1);
        let stem = g.stems().next().unwrap();
        assert_eq!(stem.created_at(), 2.5);
        assert_eq!(stem.flower(), Some(newest));
    }

    #[test]
    fn test_find_nearest_flower() {
        let mut g = garden();
        let a = g.spawn_flower(Vec2::new(100.0, 100.0), VIEWPORT);
        let _b = g.spawn_flower(Vec2::new(300.0, 100.0), VIEWPORT);
        assert_eq!(g.find_nearest_flower(Vec2::new(105.0, 100.0), None), Some(a));
        assert_eq!(g.find_nearest_flower(Vec2::new(200.0, 500.0), None), None);
        // Sway stays within 15 px, so 80 px away is only inside the doubled radius
        let away = Vec2::new(180.0, 100.0);
        assert_eq!(g.find_nearest_flower(away, None), None);
        assert_eq!(g.find_nearest_flower(away, Some(DEFAULT_PICK_RADIUS * 2.0)), Some(a));
    }

    #[test]
    fn test_eviction_drops_linked_stem() {
        let mut g = GardenState::new(GardenConfig {
            seed: Some(42),
            capacity: crate::schema::CapacityConfig {
                max_flowers: 2,
                max_stems: 30,
            },
            ..GardenConfig::default()
        })
        .unwrap();
        let path: Vec<Vec2> = (0..20)
            .map(|i| Vec2::new(200.0, 620.0 - i as f32 * 12.0))
            .collect();
        let planted = g.plant_stem(path, 0.0).unwrap();
        g.spawn_flower(Vec2::new(100.0, 100.0), VIEWPORT);
        g.spawn_flower(Vec2::new(300.0, 100.0), VIEWPORT);
        assert!(g.flower(planted).is_none());
        assert_eq!(g.stem_count(), 0);
    }

    #[test]
    fn test_same_session_seed_same_flowers() {
        let mut a = garden();
        let mut b = garden();
        let fa = a.spawn_flower(Vec2::new(50.0, 50.0), VIEWPORT);
        let fb = b.spawn_flower(Vec2::new(50.0, 50.0), VIEWPORT);
        let (fa, fb) = (a.flower(fa).unwrap(), b.flower(fb).unwrap());
        assert_eq!(fa.seed(), fb.seed());
        assert_eq!(fa.petal_count(), fb.petal_count());
    }
}
