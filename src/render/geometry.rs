use glam::Vec2;

/// Flip on x, then rotate, then translate.
///
/// Matches a drawing context that was translated, rotated and mirrored in that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2 {
    pub translation: Vec2,
    pub rotation: f32,
    pub flip_x: bool,
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2 {
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rotation: 0.0,
        flip_x: false,
    };

    pub fn translate(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn flipped(mut self, flip_x: bool) -> Self {
        self.flip_x = flip_x;
        self
    }

    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        let p = if self.flip_x { Vec2::new(-p.x, p.y) } else { p };
        rotate(p, self.rotation) + self.translation
    }
}

/// Rotate `v` by `angle` radians.
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Point on a cubic Bézier at `t`.
#[inline]
pub fn cubic_point(t: f32, p0: Vec2, c1: Vec2, c2: Vec2, p1: Vec2) -> Vec2 {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + c1 * (3.0 * mt * mt * t) + c2 * (3.0 * mt * t * t) + p1 * (t * t * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_rotate_quarter_turn() {
        assert!(close(rotate(Vec2::X, FRAC_PI_2), Vec2::Y));
    }

    #[test]
    fn test_transform_order() {
        let t = Transform2::translate(Vec2::new(10.0, 0.0))
            .rotated(FRAC_PI_2)
            .flipped(true);
        // (1, 0) -> flip (-1, 0) -> rotate (0, -1) -> translate (10, -1)
        assert!(close(t.apply(Vec2::X), Vec2::new(10.0, -1.0)));
    }

    #[test]
    fn test_cubic_endpoints() {
        let (p0, c1, c2, p1) = (Vec2::ZERO, Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0), Vec2::X * 10.0);
        assert!(close(cubic_point(0.0, p0, c1, c2, p1), p0));
        assert!(close(cubic_point(1.0, p0, c1, c2, p1), p1));
        assert!(close(cubic_point(0.5, p0, c1, c2, p1), Vec2::new(5.0, 7.5)));
    }
}
