//! Error types for scene construction and queries.

use thiserror::Error;

/// Invalid geometry or appearance parameters, rejected at construction
/// time so that degenerate inputs never reach the intersection code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("sphere radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    #[error("plane normal is too short to normalize")]
    DegenerateNormal,

    #[error("box corners must satisfy min < max on every axis")]
    InvertedBoxCorners,

    #[error("material parameter `{name}` is out of range: {value}")]
    InvalidMaterialParameter { name: &'static str, value: f32 },

    #[error("light intensity must be positive, got {0}")]
    NonPositiveIntensity(f32),
}

/// Scene-level configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// The acceleration structure was queried before `build_bvh` was called.
    #[error("acceleration structure not built; call Scene::build_bvh() before querying")]
    AccelerationNotBuilt,

    /// A BVH cannot be built over zero primitives.
    #[error("cannot build an acceleration structure over an empty scene")]
    EmptyScene,
}
