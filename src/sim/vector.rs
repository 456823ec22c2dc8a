//! 2D vector helpers
//!
//! Positions and velocities are plain `glam::Vec2`. This trait adds the
//! arena-specific helpers in both copy-returning and in-place flavors. Every
//! normalization goes through `normalize_or_zero`: the zero vector stays zero.

use glam::Vec2;

/// Arena vector helpers over `Vec2`
pub trait Vector2Ext: Sized {
    /// Vector pointing from `from` to `to`
    fn from_points(from: Vec2, to: Vec2) -> Self;

    /// Unit vector for a heading in radians
    fn from_heading(angle: f32) -> Self;

    /// Magnitude (`sqrt(x² + y²)`)
    fn mag(self) -> f32;

    /// Heading in radians (`atan2(y, x)`)
    fn heading(self) -> f32;

    /// Unit-length copy; the zero vector maps to zero
    fn unit(self) -> Self;

    /// Copy rescaled to magnitude `m` (zero stays zero)
    fn with_mag(self, m: f32) -> Self;

    /// Copy divided by `n`; dividing by zero yields zero
    fn div_by(self, n: f32) -> Self;

    /// Distance between two points
    fn dist(self, other: Self) -> f32;

    /// Normalize in place
    fn normalize_mut(&mut self);

    /// Rescale in place to magnitude `m`
    fn set_mag(&mut self, m: f32);

    /// Multiply in place
    fn scale_mut(&mut self, n: f32);

    /// Divide in place (dividing by zero yields zero)
    fn div_mut(&mut self, n: f32);

    /// Zero any component whose magnitude is below `epsilon`
    fn snap_small(&mut self, epsilon: f32);
}

impl Vector2Ext for Vec2 {
    #[inline]
    fn from_points(from: Vec2, to: Vec2) -> Self {
        to - from
    }

    #[inline]
    fn from_heading(angle: f32) -> Self {
        Vec2::new(angle.cos(), angle.sin())
    }

    #[inline]
    fn mag(self) -> f32 {
        self.length()
    }

    #[inline]
    fn heading(self) -> f32 {
        self.y.atan2(self.x)
    }

    #[inline]
    fn unit(self) -> Self {
        self.normalize_or_zero()
    }

    #[inline]
    fn with_mag(self, m: f32) -> Self {
        self.normalize_or_zero() * m
    }

    #[inline]
    fn div_by(self, n: f32) -> Self {
        if n == 0.0 { Vec2::ZERO } else { self / n }
    }

    #[inline]
    fn dist(self, other: Self) -> f32 {
        self.distance(other)
    }

    fn normalize_mut(&mut self) {
        *self = self.normalize_or_zero();
    }

    fn set_mag(&mut self, m: f32) {
        *self = self.with_mag(m);
    }

    fn scale_mut(&mut self, n: f32) {
        *self *= n;
    }

    fn div_mut(&mut self, n: f32) {
        *self = self.div_by(n);
    }

    fn snap_small(&mut self, epsilon: f32) {
        if self.x.abs() < epsilon {
            self.x = 0.0;
        }
        if self.y.abs() < epsilon {
            self.y = 0.0;
        }
    }
}
