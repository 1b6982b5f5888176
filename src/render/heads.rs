//! Flower heads: glow, RGB-split petals, core, stamens and fireflies.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{BlendMode, DrawCommand, Paint, Scene, rotate};
use crate::garden::Flower;
use crate::schema::Color;

/// Outermost glow circle relative to the petal radius.
const GLOW_SPREAD: f32 = 0.6;
const GLOW_ALPHA: f32 = 0.12;
const GLOW_BLUR: f32 = 8.0;

const CHANNEL_ALPHA: f32 = 0.8;
const CHANNEL_BLUR: f32 = 2.0;

const CORE_SCALE: f32 = 0.9;
const CORE_ALPHA: f32 = 0.6;
const CORE_BLUR: f32 = 4.0;

const STAMEN_INNER: f32 = 3.0;
const STAMEN_OUTER: f32 = 14.0;
const STAMEN_CENTER_BLUR: f32 = 6.0;

const FIREFLY_SPEED: f64 = 2.0;
const FIREFLY_PULSE_SPEED: f64 = 4.0;
const FIREFLY_ORBIT: f32 = 1.2;
const FIREFLY_SQUASH: f32 = 0.5;
const FIREFLY_MAX_SIZE: f32 = 6.0;
const FIREFLY_BLUR: f32 = 2.0;
const FIREFLY_COLORS: [Color; 2] = [Color::rgb(1.0, 0.98, 0.0), Color::rgb(0.14, 0.94, 1.0)];

/// Color channel of a chromatic pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Red,
    Green,
    Blue,
    /// All three channels coincide.
    Combined,
}

/// One layer of the RGB split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelPass {
    pub channel: Channel,
    pub offset: Vec2,
    pub color: Color,
    pub blend: BlendMode,
}

/// Petal passes for a chromatic offset.
///
/// Red shifts up-left, blue down-right and green stays centered, each added with
/// `PlusLighter`. When the three offsets coincide they sum to white, so a single
/// normal white pass is returned instead.
pub fn chromatic_passes(offset: f32) -> Vec<ChannelPass> {
    let o = if offset.is_finite() { offset } else { 0.0 };
    let d = Vec2::splat(o);
    let passes = [
        (Channel::Red, -d, Color::RED),
        (Channel::Green, Vec2::ZERO, Color::GREEN),
        (Channel::Blue, d, Color::BLUE),
    ]
    .map(|(channel, offset, color)| ChannelPass {
        channel,
        offset,
        color: color.with_alpha(CHANNEL_ALPHA),
        blend: BlendMode::PlusLighter,
    });

    if passes.iter().all(|p| p.offset == passes[0].offset) {
        vec![ChannelPass {
            channel: Channel::Combined,
            offset: passes[0].offset,
            color: Color::WHITE.with_alpha(CHANNEL_ALPHA),
            blend: BlendMode::Normal,
        }]
    } else {
        passes.to_vec()
    }
}

/// Farthest a head's drawing reaches from its center.
pub fn head_extent(radius: f32, chromatic_offset: f32) -> f32 {
    let petals = radius * (1.0 + GLOW_SPREAD);
    let fireflies = radius * FIREFLY_ORBIT + FIREFLY_MAX_SIZE;
    petals.max(fireflies).max(STAMEN_OUTER) + chromatic_offset.abs() * std::f32::consts::SQRT_2
}

/// Ring of elliptical petals around `head`.
fn petals(head: Vec2, count: u32, radius: f32, rotation: f32, color: Color) -> Vec<DrawCommand> {
    let step = TAU / count.max(1) as f32;
    (0..count)
        .map(|i| {
            let angle = rotation + step * i as f32;
            DrawCommand::FillEllipse {
                center: head + rotate(Vec2::new(radius / 2.0, 0.0), angle),
                radii: Vec2::new(radius / 2.0, radius / 4.0),
                rotation: angle,
                paint: Paint::solid(color),
            }
        })
        .collect()
}

fn glow(head: Vec2, radius: f32, color: Color, pulse: f32, bloom: f32, passes: usize) -> DrawCommand {
    let n = passes as f32;
    let strength = (0.5 + 0.5 * pulse) * bloom;
    let circles = (0..passes)
        .map(|i| {
            let r = radius * (1.0 + GLOW_SPREAD * (n - i as f32) / n);
            let alpha = GLOW_ALPHA * (i as f32 + 1.0) / n * strength;
            DrawCommand::circle(head, r, color.with_alpha(alpha.clamp(0.0, 1.0)))
        })
        .collect();
    DrawCommand::group(BlendMode::Screen, GLOW_BLUR, circles)
}

fn stamens(head: Vec2, color: Color, count: usize) -> DrawCommand {
    let mut commands = Vec::with_capacity(2 + count * 4);
    commands.push(DrawCommand::circle(head, 8.0, Color::WHITE.with_alpha(0.9)));
    commands.push(DrawCommand::group(
        BlendMode::Normal,
        STAMEN_CENTER_BLUR,
        vec![DrawCommand::circle(head, 6.0, Color::WHITE)],
    ));

    let step = TAU / count.max(1) as f32;
    for i in 0..count {
        let dir = Vec2::from_angle(step * i as f32);
        let start = head + dir * STAMEN_INNER;
        let end = head + dir * STAMEN_OUTER;
        commands.push(DrawCommand::Line {
            start,
            end,
            color: Color::WHITE.with_alpha(0.4),
            width: 2.5,
        });
        commands.push(DrawCommand::Line {
            start,
            end,
            color: color.with_alpha(0.7),
            width: 1.5,
        });
        commands.push(DrawCommand::circle(end, 4.0, color.with_alpha(0.3)));
        commands.push(DrawCommand::circle(end, 3.0, color.with_alpha(0.9)));
    }
    DrawCommand::group(BlendMode::Normal, 0.0, commands)
}

fn fireflies(head: Vec2, radius: f32, time: f64, count: usize) -> DrawCommand {
    let orbit = radius * FIREFLY_ORBIT;
    let lights = (0..count)
        .map(|i| {
            let offset = std::f64::consts::TAU * i as f64 / count as f64;
            let angle = time * FIREFLY_SPEED + offset;
            let at = head
                + Vec2::new(
                    angle.cos() as f32 * orbit,
                    angle.sin() as f32 * orbit * FIREFLY_SQUASH,
                );
            let pulse = (((time * FIREFLY_PULSE_SPEED + offset).sin() + 1.0) / 2.0) as f32;
            let size = 3.0 + 3.0 * pulse;
            DrawCommand::circle(
                at,
                size / 2.0,
                FIREFLY_COLORS[i % 2].with_alpha(0.6 + 0.4 * pulse),
            )
        })
        .collect();
    DrawCommand::group(BlendMode::Normal, FIREFLY_BLUR, lights)
}

/// One flower head as a group, or `None` if it is culled.
pub(super) fn flower_head(scene: &Scene<'_>, flower: &Flower) -> Option<DrawCommand> {
    let state = scene.state;
    let wind = state.wind();
    let visuals = state.visuals();

    let head = flower.head_position(scene.time, wind.strength, wind.direction);
    let radius = flower.bloom_radius(visuals.bloom_intensity, visuals.global_scale);
    if !head.is_finite() || !radius.is_finite() {
        return None;
    }
    let extent = head_extent(radius, visuals.chromatic_offset);
    if !scene
        .viewport
        .contains_with_margin(head, extent + scene.config.cull_margin)
    {
        return None;
    }

    let color = flower.color(state.palette());
    let rotation = flower.rotation();
    let count = flower.petal_count();
    let mut commands = Vec::with_capacity(7);

    if scene.config.glow_passes > 0 {
        commands.push(glow(
            head,
            radius,
            color,
            flower.glow_pulse(scene.time),
            visuals.bloom_intensity,
            scene.config.glow_passes,
        ));
    }
    for pass in chromatic_passes(visuals.chromatic_offset) {
        commands.push(DrawCommand::Group {
            blend: pass.blend,
            blur: CHANNEL_BLUR,
            offset: pass.offset,
            commands: petals(head, count, radius, rotation, pass.color),
        });
    }
    commands.push(DrawCommand::group(
        BlendMode::PlusLighter,
        CORE_BLUR,
        petals(head, count, radius * CORE_SCALE, rotation, color.with_alpha(CORE_ALPHA)),
    ));
    commands.push(stamens(head, color, scene.config.stamen_count));
    if visuals.show_fireflies && scene.config.firefly_count > 0 {
        commands.push(fireflies(head, radius, scene.time, scene.config.firefly_count));
    }
    Some(DrawCommand::group(BlendMode::Normal, 0.0, commands))
}

pub(super) fn flower_heads(scene: &Scene<'_>) -> Vec<DrawCommand> {
    scene
        .state
        .flowers()
        .filter_map(|flower| flower_head(scene, flower))
        .collect()
}
