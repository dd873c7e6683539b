//! Surface appearance: materials and procedural textures.

use prism_math::Vec3;

use crate::error::GeometryError;

/// Surface color source: either a constant RGB value or a pure function
/// of the hit point. The renderer only evaluates procedural textures at
/// confirmed hit points.
#[derive(Clone, Copy)]
pub enum Texture {
    Solid(Vec3),
    Procedural(fn(Vec3) -> Vec3),
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Texture::Solid(color) => f.debug_tuple("Solid").field(color).finish(),
            Texture::Procedural(_) => f.write_str("Procedural(..)"),
        }
    }
}

impl Texture {
    /// Evaluate the texture at a surface point.
    pub fn color_at(&self, point: Vec3) -> Vec3 {
        match self {
            Texture::Solid(color) => *color,
            Texture::Procedural(func) => func(point),
        }
    }
}

/// Checkerboard pattern in the XZ plane, alternating black and white.
pub fn checkerboard(point: Vec3) -> Vec3 {
    let scale = 2.0;
    let ix = (point.x * scale).floor() as i64;
    let iz = (point.z * scale).floor() as i64;
    if (ix + iz).rem_euclid(2) == 0 {
        Vec3::ONE
    } else {
        Vec3::ZERO
    }
}

/// Vertical gradient from warm at the bottom to cool at the top.
pub fn vertical_gradient(point: Vec3) -> Vec3 {
    let t = (point.y / 5.0).clamp(0.0, 1.0);
    Vec3::new(1.0 - t, 1.0 - t, t)
}

/// Surface appearance parameters.
///
/// Reflectivity and transparency are blend weights in [0, 1]; they need
/// not sum to 1 but the tracer clamps the combined result so energy never
/// exceeds the displayable range.
#[derive(Debug, Clone)]
pub struct Material {
    pub texture: Texture,
    /// Fraction of the final color taken from the reflected ray, in [0, 1].
    pub reflectivity: f32,
    /// Fraction of the final color taken from the refracted ray, in [0, 1].
    pub transparency: f32,
    /// Index of refraction (1.0 = air, 1.5 = glass), must be >= 1.
    pub refractive_index: f32,
    /// Blinn-Phong specular exponent, must be positive.
    pub shininess: f32,
}

impl Material {
    /// Create a material, validating every parameter.
    pub fn new(
        texture: Texture,
        reflectivity: f32,
        transparency: f32,
        refractive_index: f32,
        shininess: f32,
    ) -> Result<Self, GeometryError> {
        let check_unit = |name: &'static str, value: f32| {
            if !(0.0..=1.0).contains(&value) || !value.is_finite() {
                Err(GeometryError::InvalidMaterialParameter { name, value })
            } else {
                Ok(())
            }
        };
        check_unit("reflectivity", reflectivity)?;
        check_unit("transparency", transparency)?;
        if !(refractive_index >= 1.0) || !refractive_index.is_finite() {
            return Err(GeometryError::InvalidMaterialParameter {
                name: "refractive_index",
                value: refractive_index,
            });
        }
        if !(shininess > 0.0) || !shininess.is_finite() {
            return Err(GeometryError::InvalidMaterialParameter {
                name: "shininess",
                value: shininess,
            });
        }

        Ok(Self {
            texture,
            reflectivity,
            transparency,
            refractive_index,
            shininess,
        })
    }

    /// A plain diffuse material with the given base color.
    pub fn diffuse(color: Vec3) -> Self {
        Self {
            texture: Texture::Solid(color),
            reflectivity: 0.0,
            transparency: 0.0,
            refractive_index: 1.0,
            shininess: 50.0,
        }
    }

    /// A partially reflective material.
    pub fn reflective(color: Vec3, reflectivity: f32) -> Result<Self, GeometryError> {
        Self::new(Texture::Solid(color), reflectivity, 0.0, 1.0, 50.0)
    }

    /// A transparent material with the given index of refraction.
    pub fn transparent(transparency: f32, refractive_index: f32) -> Result<Self, GeometryError> {
        Self::new(
            Texture::Solid(Vec3::ONE),
            0.0,
            transparency,
            refractive_index,
            50.0,
        )
    }

    /// Base color at a surface point.
    pub fn color_at(&self, point: Vec3) -> Vec3 {
        self.texture.color_at(point)
    }
}
