//! Hand-drawn stems with leaves.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{FlowerId, SeededRandom};

/// Path points between consecutive leaves.
pub const LEAF_SPACING: usize = 6;
/// Default stroke width of a drawn stem.
pub const STEM_THICKNESS: f32 = 2.0;
/// Outward tilt of a leaf relative to the path tangent.
const LEAF_TILT: f32 = 0.8;
const LEAF_SIZE_RANGE: (f32, f32) = (8.0, 14.0);

/// Which side of the stem a leaf grows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeafSide {
    Left,
    Right,
}

impl LeafSide {
    /// Sign applied to the outward tilt.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            LeafSide::Left => -1.0,
            LeafSide::Right => 1.0,
        }
    }

    fn flip(self) -> Self {
        match self {
            LeafSide::Left => LeafSide::Right,
            LeafSide::Right => LeafSide::Left,
        }
    }
}

/// A leaf attached to a drawn stem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaf {
    pub position: Vec2,
    /// Orientation in radians.
    pub angle: f32,
    pub size: f32,
    pub side: LeafSide,
    /// Index of the path point the leaf sits on.
    pub path_index: usize,
}

/// A drawn stem. Geometry is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stem {
    points: Vec<Vec2>,
    leaves: Vec<Leaf>,
    thickness: f32,
    created_at: f64,
    flower: Option<FlowerId>,
}

impl Stem {
    /// Build a stem from a drawn path, placing leaves deterministically from `seed`.
    ///
    /// Leaves sit every [`LEAF_SPACING`] points (never on the endpoints), alternate sides,
    /// and lean away from the local tangent.
    pub fn from_path(points: Vec<Vec2>, seed: u64, created_at: f64) -> Self {
        let mut rng = SeededRandom::new(seed);
        let mut leaves = Vec::new();
        let mut side = if rng.next_u64() & 1 == 0 {
            LeafSide::Left
        } else {
            LeafSide::Right
        };

        if points.len() > 2 {
            let mut i = LEAF_SPACING.min(points.len() - 2).max(1);
            while i < points.len() - 1 {
                let tangent = points[i + 1] - points[i - 1];
                let heading = if tangent.length_squared() > f32::EPSILON {
                    tangent.y.atan2(tangent.x)
                } else {
                    -std::f32::consts::FRAC_PI_2
                };
                leaves.push(Leaf {
                    position: points[i],
                    angle: heading + std::f32::consts::FRAC_PI_2 + side.sign() * LEAF_TILT,
                    size: rng.next_f32(LEAF_SIZE_RANGE.0, LEAF_SIZE_RANGE.1),
                    side,
                    path_index: i,
                });
                side = side.flip();
                i += LEAF_SPACING;
            }
        }

        Self {
            points,
            leaves,
            thickness: STEM_THICKNESS,
            created_at,
            flower: None,
        }
    }

    /// Link this stem to the flower growing on it.
    pub fn with_flower(mut self, id: FlowerId) -> Self {
        self.flower = Some(id);
        self
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    #[inline]
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    #[inline]
    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    #[inline]
    pub fn created_at(&self) -> f64 {
        self.created_at
    }

    /// Flower growing on this stem, if any.
    #[inline]
    pub fn flower(&self) -> Option<FlowerId> {
        self.flower
    }

    /// Total polyline length.
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}
