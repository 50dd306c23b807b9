//! Quadratic Bezier evaluation

use glam::Vec3;

/// A quadratic Bezier segment through control points `p0`, `p1`, `p2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
}

impl QuadraticBezier {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self { p0, p1, p2 }
    }

    /// Curve value at `t` in [0, 1], blended around the middle control point.
    ///
    /// Algebraically identical to the Bernstein form
    /// `(1-t)^2 p0 + 2t(1-t) p1 + t^2 p2`.
    #[inline]
    pub fn eval(&self, t: f32) -> Vec3 {
        self.p1 + (1.0 - t) * (1.0 - t) * (self.p0 - self.p1) + t * t * (self.p2 - self.p1)
    }

    /// Non-normalized derivative at `t`.
    #[inline]
    pub fn direction(&self, t: f32) -> Vec3 {
        2.0 * (1.0 - t) * (self.p1 - self.p0) + 2.0 * t * (self.p2 - self.p1)
    }
}
