//! Draw commands.
//!
//! The renderer never touches pixels. It emits a display list of [`DrawCommand`]s in
//! screen space (points) that the host interprets with whatever 2D backend it has.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Transform2;
use crate::schema::Color;

/// How a group composites over what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    /// `1 - (1 - src) * (1 - dst)`.
    Screen,
    /// Additive, saturating at white.
    PlusLighter,
}

/// One color stop of a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient in 0.0-1.0.
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Evenly spaced stops from a color list.
pub fn even_stops(colors: &[Color]) -> Vec<GradientStop> {
    let last = colors.len().saturating_sub(1).max(1) as f32;
    colors
        .iter()
        .enumerate()
        .map(|(i, &c)| GradientStop::new(i as f32 / last, c))
        .collect()
}

/// Fill or stroke source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Paint {
    Solid { color: Color },
    Linear {
        start: Vec2,
        end: Vec2,
        stops: Vec<GradientStop>,
    },
    Radial {
        center: Vec2,
        start_radius: f32,
        end_radius: f32,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid { color }
    }

    pub fn linear(start: Vec2, end: Vec2, colors: &[Color]) -> Self {
        Paint::Linear {
            start,
            end,
            stops: even_stops(colors),
        }
    }

    /// Solid color of this paint, if it is solid.
    pub fn as_solid(&self) -> Option<Color> {
        match self {
            Paint::Solid { color } => Some(*color),
            _ => None,
        }
    }

    /// Map gradient geometry through a transform. Solid paints are unchanged.
    pub fn transformed(self, transform: &Transform2) -> Self {
        match self {
            Paint::Linear { start, end, stops } => Paint::Linear {
                start: transform.apply(start),
                end: transform.apply(end),
                stops,
            },
            Paint::Radial {
                center,
                start_radius,
                end_radius,
                stops,
            } => Paint::Radial {
                center: transform.apply(center),
                start_radius,
                end_radius,
                stops,
            },
            solid => solid,
        }
    }
}

/// Path element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum PathSegment {
    MoveTo { to: Vec2 },
    LineTo { to: Vec2 },
    CubicTo { c1: Vec2, c2: Vec2, to: Vec2 },
    Close,
}

/// A vector path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open polyline through `points`.
    pub fn polyline(points: &[Vec2]) -> Self {
        let mut path = Self::new();
        if let Some((&first, rest)) = points.split_first() {
            path = path.move_to(first);
            for &p in rest {
                path = path.line_to(p);
            }
        }
        path
    }

    pub fn move_to(mut self, to: Vec2) -> Self {
        self.segments.push(PathSegment::MoveTo { to });
        self
    }

    pub fn line_to(mut self, to: Vec2) -> Self {
        self.segments.push(PathSegment::LineTo { to });
        self
    }

    pub fn cubic_to(mut self, c1: Vec2, c2: Vec2, to: Vec2) -> Self {
        self.segments.push(PathSegment::CubicTo { c1, c2, to });
        self
    }

    pub fn close(mut self) -> Self {
        self.segments.push(PathSegment::Close);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Map every point through a transform.
    pub fn transformed(mut self, transform: &Transform2) -> Self {
        for segment in &mut self.segments {
            *segment = match *segment {
                PathSegment::MoveTo { to } => PathSegment::MoveTo {
                    to: transform.apply(to),
                },
                PathSegment::LineTo { to } => PathSegment::LineTo {
                    to: transform.apply(to),
                },
                PathSegment::CubicTo { c1, c2, to } => PathSegment::CubicTo {
                    c1: transform.apply(c1),
                    c2: transform.apply(c2),
                    to: transform.apply(to),
                },
                PathSegment::Close => PathSegment::Close,
            };
        }
        self
    }

    /// Every point in the path, control points included.
    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.segments.iter().flat_map(|s| match *s {
            PathSegment::MoveTo { to } | PathSegment::LineTo { to } => vec![to],
            PathSegment::CubicTo { c1, c2, to } => vec![c1, c2, to],
            PathSegment::Close => Vec::new(),
        })
    }
}

/// A single drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DrawCommand {
    FillRect {
        origin: Vec2,
        size: Vec2,
        paint: Paint,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        paint: Paint,
    },
    /// Ellipse with semi-axes `radii`, rotated by `rotation` radians about its center.
    FillEllipse {
        center: Vec2,
        radii: Vec2,
        rotation: f32,
        paint: Paint,
    },
    FillPath {
        path: Path,
        paint: Paint,
    },
    StrokePath {
        path: Path,
        paint: Paint,
        width: f32,
    },
    Line {
        start: Vec2,
        end: Vec2,
        color: Color,
        width: f32,
    },
    /// Children drawn into an offscreen layer, translated by `offset`, blurred by `blur`
    /// points, then composited with `blend`.
    Group {
        blend: BlendMode,
        blur: f32,
        offset: Vec2,
        commands: Vec<DrawCommand>,
    },
}

impl DrawCommand {
    /// Group with no offset.
    pub fn group(blend: BlendMode, blur: f32, commands: Vec<DrawCommand>) -> Self {
        DrawCommand::Group {
            blend,
            blur,
            offset: Vec2::ZERO,
            commands,
        }
    }

    #[inline]
    pub fn circle(center: Vec2, radius: f32, color: Color) -> Self {
        DrawCommand::FillCircle {
            center,
            radius,
            paint: Paint::solid(color),
        }
    }

    /// This command plus all nested commands.
    pub fn count(&self) -> usize {
        match self {
            DrawCommand::Group { commands, .. } => {
                1 + commands.iter().map(DrawCommand::count).sum::<usize>()
            }
            _ => 1,
        }
    }

    /// Children of a group, empty for primitives.
    pub fn children(&self) -> &[DrawCommand] {
        match self {
            DrawCommand::Group { commands, .. } => commands,
            _ => &[],
        }
    }
}
