//! Scenery layers: sky, film grain, stars, grass, stems and ground fog.

use std::collections::HashSet;
use std::f64::consts::TAU;

use glam::Vec2;

use super::{DrawCommand, Paint, Path, Scene, Transform2, cubic_point, even_stops};
use crate::garden::{Flower, FlowerId, Leaf, MAX_EFFECTIVE_WIND, SeededRandom};
use crate::schema::Color;

const SKY: [Color; 4] = [
    Color::rgb(0.08, 0.10, 0.18),
    Color::rgb(0.04, 0.06, 0.12),
    Color::rgb(0.02, 0.03, 0.08),
    Color::rgb(0.01, 0.02, 0.05),
];
const PARALLAX_GAIN: f32 = 20.0;
const PARALLAX_GLOW: Color = Color::rgba(0.05, 0.1, 0.2, 0.4);

const GRAIN_RADIUS: f32 = 0.5;
const GRAIN_OPACITY: (f32, f32) = (0.02, 0.08);

const STAR_SIZE: (f32, f32) = (0.5, 2.5);
const STAR_SPEED: (f64, f64) = (0.8, 2.0);

const GRASS_SEED_STRIDE: u64 = 999;
const GRASS_OVERHANG: f32 = 50.0;
/// Blades root slightly below the baseline so their bases are hidden by the fog.
const GRASS_SINK: f32 = 10.0;
const GRASS_HEIGHT: (f32, f32) = (60.0, 140.0);
const GRASS_WIDTH: (f32, f32) = (4.0, 8.0);
const GRASS_LEAN: (f32, f32) = (-0.2, 0.2);
const GRASS_SPEED: (f64, f64) = (1.0, 3.0);
const GRASS_SWAY: f32 = 5.0;
const GRASS_WIND: f32 = 0.2;
const GRASS_BASE: Color = Color::rgb(0.05, 0.3, 0.35);
const GRASS_TIP: Color = Color::rgb(0.15, 0.65, 0.7);

const STEM_BASE: Color = Color::rgb(0.08, 0.46, 0.48);
const STEM_TIP: Color = Color::rgb(0.22, 0.78, 0.84);
const STEM_WIDTH: f32 = 2.0;
/// Horizontal control-point offset per unit of stem curvature.
pub const STEM_CURVE: f32 = 20.0;
/// `(t, angle, size, mirrored)` for the two leaves of a procedural stem.
const STEM_LEAVES: [(f32, f32, f32, bool); 2] = [(0.4, -0.8, 30.0, false), (0.7, 0.8, 25.0, true)];

const FOG_HEIGHT: f32 = 40.0;
const FOG_OPACITY: f32 = 0.8;

/// Wind strength and direction with non-finite values neutralised.
fn effective_wind(scene: &Scene<'_>) -> (f32, f32) {
    let wind = scene.state.wind();
    let strength = if wind.strength.is_finite() {
        wind.strength.clamp(0.0, MAX_EFFECTIVE_WIND)
    } else {
        0.0
    };
    let direction = if wind.direction.is_finite() {
        wind.direction
    } else {
        0.0
    };
    (strength, direction)
}

pub(super) fn background(scene: &Scene<'_>) -> Vec<DrawCommand> {
    let viewport = scene.viewport;
    let size = viewport.size();
    let mut commands = vec![DrawCommand::FillRect {
        origin: Vec2::ZERO,
        size,
        paint: Paint::linear(Vec2::ZERO, Vec2::new(0.0, viewport.height), &SKY),
    }];

    if scene.state.visuals().parallax_enabled {
        let max = match scene.config.parallax_max_offset.abs() {
            m if m.is_finite() => m,
            _ => 0.0,
        };
        let offset = (scene.state.tilt() * PARALLAX_GAIN).clamp(Vec2::splat(-max), Vec2::splat(max));
        commands.push(DrawCommand::FillRect {
            origin: Vec2::ZERO,
            size,
            paint: Paint::Radial {
                center: viewport.center() + offset,
                start_radius: 0.0,
                end_radius: viewport.height * 0.8,
                stops: even_stops(&[PARALLAX_GLOW, Color::BLACK.with_alpha(0.8)]),
            },
        });
    }
    commands
}

/// Film grain, constant within each `1 / grain_rate` second window.
pub(super) fn grain(scene: &Scene<'_>) -> Vec<DrawCommand> {
    let window = (scene.time.max(0.0) * scene.config.grain_rate).floor();
    let mut rng = SeededRandom::new(if window.is_finite() { window as u64 } else { 0 });
    let (w, h) = (scene.viewport.width, scene.viewport.height);
    (0..scene.config.grain_count)
        .map(|_| {
            let x = rng.next_f32(0.0, w);
            let y = rng.next_f32(0.0, h);
            let opacity = rng.next_f32(GRAIN_OPACITY.0, GRAIN_OPACITY.1);
            DrawCommand::circle(Vec2::new(x, y), GRAIN_RADIUS, Color::WHITE.with_alpha(opacity))
        })
        .collect()
}

/// Twinkling star field. Positions depend only on the seed and viewport.
pub(super) fn stars(scene: &Scene<'_>) -> Vec<DrawCommand> {
    let mut rng = SeededRandom::new(scene.config.star_seed);
    let (w, h) = (scene.viewport.width, scene.viewport.height);
    (0..scene.config.star_count)
        .map(|_| {
            let center = Vec2::new(rng.next_f32(0.0, w), rng.next_f32(0.0, h));
            let base = rng.next_f32(STAR_SIZE.0, STAR_SIZE.1);
            let speed = rng.next_f64(STAR_SPEED.0, STAR_SPEED.1);
            let phase = rng.next_f64(0.0, TAU);

            let twinkle = (((scene.time * speed + phase).sin() + 1.0) / 2.0) as f32;
            let size = base * (0.6 + 0.4 * twinkle);
            DrawCommand::circle(center, size / 2.0, Color::WHITE.with_alpha(0.4 + 0.6 * twinkle))
        })
        .collect()
}

pub(super) fn grass(scene: &Scene<'_>) -> Vec<DrawCommand> {
    let (strength, direction) = effective_wind(scene);
    let wind_sway = strength * GRASS_WIND * direction.cos();
    let width = scene.viewport.width;

    (0..scene.config.grass_count as u64)
        .map(|i| {
            let mut rng = SeededRandom::new(i * GRASS_SEED_STRIDE);
            let x = rng.next_f32(-GRASS_OVERHANG, width + GRASS_OVERHANG);
            let height = rng.next_f32(GRASS_HEIGHT.0, GRASS_HEIGHT.1);
            let blade = rng.next_f32(GRASS_WIDTH.0, GRASS_WIDTH.1);
            let lean = rng.next_f32(GRASS_LEAN.0, GRASS_LEAN.1);
            let speed = rng.next_f64(GRASS_SPEED.0, GRASS_SPEED.1);
            let phase = rng.next_f64(0.0, TAU);

            let sway = (scene.time * speed + phase).sin() as f32 * GRASS_SWAY + wind_sway;
            let transform =
                Transform2::translate(Vec2::new(x, scene.ground + GRASS_SINK)).rotated(lean);
            let path = Path::new()
                .move_to(Vec2::ZERO)
                .cubic_to(
                    Vec2::new(blade / 2.0, -height * 0.3),
                    Vec2::new(sway * 0.5, -height * 0.7),
                    Vec2::new(sway, -height),
                )
                .line_to(Vec2::new(blade, 0.0))
                .close()
                .transformed(&transform);
            let paint = Paint::linear(Vec2::ZERO, Vec2::new(0.0, -height), &[GRASS_BASE, GRASS_TIP])
                .transformed(&transform);
            DrawCommand::FillPath { path, paint }
        })
        .collect()
}

/// Bend weight for point `i` of `len`: the anchor stays put, the tip follows the head.
#[inline]
fn bend_weight(i: usize, len: usize) -> f32 {
    let n = len.saturating_sub(1).max(1) as f32;
    (i as f32 / n).powi(2)
}

fn bent_polyline(points: &[Vec2], bend: Vec2, width: f32) -> Option<DrawCommand> {
    let (&first, &last) = (points.first()?, points.last()?);
    let bent: Vec<Vec2> = points
        .iter()
        .enumerate()
        .map(|(i, &p)| p + bend * bend_weight(i, points.len()))
        .collect();
    Some(DrawCommand::StrokePath {
        path: Path::polyline(&bent),
        paint: Paint::linear(first, last + bend, &[STEM_BASE, STEM_TIP]),
        width,
    })
}

/// Rounded leaf on a drawn stem, long axis along local y.
fn drawn_leaf(leaf: &Leaf, position: Vec2) -> DrawCommand {
    let w = leaf.size * 0.8;
    let h = leaf.size * 2.0;
    let transform = Transform2::translate(position).rotated(leaf.angle);
    let path = Path::new()
        .move_to(Vec2::new(0.0, -h / 2.0))
        .line_to(Vec2::new(w, -h / 2.0))
        .cubic_to(
            Vec2::new(w, -h / 2.0 + h * 0.2),
            Vec2::new(w, h / 2.0 - h * 0.2),
            Vec2::new(w, h / 2.0),
        )
        .line_to(Vec2::new(0.0, h / 2.0))
        .cubic_to(
            Vec2::new(0.0, h / 2.0 - h * 0.2),
            Vec2::new(0.0, -h / 2.0 + h * 0.2),
            Vec2::new(0.0, -h / 2.0),
        )
        .close()
        .transformed(&transform);
    let paint = Paint::linear(
        Vec2::new(0.0, h / 2.0),
        Vec2::new(w, -h / 2.0),
        &[STEM_BASE.with_alpha(0.6), STEM_TIP],
    )
    .transformed(&transform);
    DrawCommand::FillPath { path, paint }
}

/// Teardrop leaf on a procedural stem, rooted at the local origin.
fn stem_leaf(size: f32, transform: Transform2) -> DrawCommand {
    let (w, h) = (size * 0.6, size);
    let path = Path::new()
        .move_to(Vec2::ZERO)
        .cubic_to(Vec2::new(w * 0.2, -h * 0.2), Vec2::new(w, -h * 0.8), Vec2::new(w, -h))
        .cubic_to(Vec2::new(w * 0.8, -h * 0.2), Vec2::new(0.0, -h * 0.2), Vec2::ZERO)
        .close()
        .transformed(&transform);
    let paint = Paint::linear(Vec2::ZERO, Vec2::new(w, -h), &[STEM_TIP.with_alpha(0.4), STEM_TIP])
        .transformed(&transform);
    DrawCommand::FillPath { path, paint }
}

/// Cubic stem from the anchor to the swayed head, with two leaves.
fn procedural_stem(commands: &mut Vec<DrawCommand>, flower: &Flower, head: Vec2) {
    let base = flower.anchor();
    let length = (head.y - base.y).abs();
    let curve = flower.stem_curvature() * STEM_CURVE;
    let c1 = Vec2::new(base.x + curve, base.y - length * 0.33);
    let c2 = Vec2::new(head.x - curve * 0.5, base.y - length * 0.66);

    commands.push(DrawCommand::StrokePath {
        path: Path::new().move_to(base).cubic_to(c1, c2, head),
        paint: Paint::linear(base, head, &[STEM_BASE, STEM_TIP]),
        width: STEM_WIDTH,
    });
    for (t, angle, size, mirrored) in STEM_LEAVES {
        let at = cubic_point(t, base, c1, c2, head);
        let transform = Transform2::translate(at).rotated(angle).flipped(mirrored);
        commands.push(stem_leaf(size, transform));
    }
}

/// Bounding box of `points`, grown by `pad` on every side.
fn bounds(points: impl IntoIterator<Item = Vec2>, pad: Vec2) -> Option<(Vec2, Vec2)> {
    let mut points = points.into_iter();
    let first = points.next()?;
    let (min, max) = points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
    Some((min - pad, max + pad))
}

/// Whether a stem spanning `points` (bent by up to `bend`) is near enough to draw.
fn stem_visible(scene: &Scene<'_>, points: impl IntoIterator<Item = Vec2>, bend: Vec2) -> bool {
    bounds(points, bend.abs()).is_some_and(|(min, max)| {
        scene
            .viewport
            .overlaps_with_margin(min, max, scene.config.cull_margin)
    })
}

pub(super) fn stems(scene: &Scene<'_>) -> Vec<DrawCommand> {
    let state = scene.state;
    let (strength, direction) = effective_wind(scene);
    let mut commands = Vec::new();
    let mut with_stem: HashSet<FlowerId> = HashSet::new();

    for stem in state.stems() {
        let bend = stem
            .flower()
            .and_then(|id| state.flower(id))
            .map(|f| f.sway_offset(scene.time, strength, direction))
            .filter(|b| b.is_finite())
            .unwrap_or(Vec2::ZERO);
        if let Some(id) = stem.flower() {
            with_stem.insert(id);
        }
        let points = stem.points();
        if !stem_visible(scene, points.iter().copied(), bend) {
            continue;
        }
        commands.extend(bent_polyline(points, bend, stem.thickness()));
        for leaf in stem.leaves() {
            let position = leaf.position + bend * bend_weight(leaf.path_index, points.len());
            commands.push(drawn_leaf(leaf, position));
        }
    }

    for flower in state.flowers() {
        let bend = flower.sway_offset(scene.time, strength, direction);
        let head = flower.head() + bend;
        if !head.is_finite() {
            continue;
        }
        match flower.stem_path() {
            // Drawn flower whose stem record was evicted
            Some(path) if !with_stem.contains(&flower.id()) => {
                if stem_visible(scene, path.iter().copied(), bend) {
                    commands.extend(bent_polyline(path, bend, STEM_WIDTH));
                }
            }
            Some(_) => {}
            None => {
                let curve = Vec2::new((flower.stem_curvature() * STEM_CURVE).abs(), 0.0);
                if stem_visible(scene, [flower.anchor(), head], curve) {
                    procedural_stem(&mut commands, flower, head);
                }
            }
        }
    }
    commands
}

pub(super) fn fog(scene: &Scene<'_>) -> Vec<DrawCommand> {
    let top = scene.ground - FOG_HEIGHT;
    vec![DrawCommand::FillRect {
        origin: Vec2::new(0.0, top),
        size: Vec2::new(scene.viewport.width, FOG_HEIGHT),
        paint: Paint::linear(
            Vec2::new(0.0, top),
            Vec2::new(0.0, scene.ground),
            &[Color::CLEAR, Color::BLACK.with_alpha(FOG_OPACITY)],
        ),
    }]
}
