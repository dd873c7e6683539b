//! Point light sources.

use prism_math::Vec3;

use crate::error::GeometryError;

/// A point light with a position, an RGB color and a scalar intensity.
///
/// Lights are created at scene setup and are read-only during rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl Light {
    /// Create a light. Intensity must be positive.
    pub fn new(position: Vec3, color: Vec3, intensity: f32) -> Result<Self, GeometryError> {
        if !(intensity > 0.0) || !intensity.is_finite() {
            return Err(GeometryError::NonPositiveIntensity(intensity));
        }
        Ok(Self {
            position,
            color,
            intensity,
        })
    }

    /// A white light with the given intensity.
    pub fn white(position: Vec3, intensity: f32) -> Result<Self, GeometryError> {
        Self::new(position, Vec3::ONE, intensity)
    }
}
