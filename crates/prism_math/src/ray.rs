use crate::Vec3;

/// A ray in 3D space with an origin and a unit direction.
///
/// The direction is normalized once at construction and never mutated
/// afterwards, so downstream intersection code can rely on it being a
/// unit vector (parametric `t` values are then world-space distances).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Create a new ray, normalizing the direction.
    ///
    /// Returns `None` if the direction is too short to normalize.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        if direction.length_squared() < 1e-12 {
            return None;
        }
        Some(Self {
            origin,
            direction: direction.normalize(),
        })
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the unit direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
