//! Prism Core - scene model and geometric core of the ray tracer.
//!
//! This crate provides:
//!
//! - **Primitives**: `Primitive`, a closed enum over spheres, planes and
//!   axis-aligned boxes, with exact ray intersection and surface normals
//! - **Appearance**: `Material`, `Texture` and `Light`
//! - **Acceleration**: `BvhNode`, a binary bounding-volume hierarchy
//! - **Scene**: owns primitives, lights and the BVH, and answers
//!   nearest-hit queries
//!
//! # Example
//!
//! ```
//! use prism_core::{Material, Primitive, Scene};
//! use prism_math::{Ray, Vec3};
//! use std::sync::Arc;
//!
//! let material = Arc::new(Material::diffuse(Vec3::new(1.0, 0.0, 0.0)));
//! let sphere = Primitive::sphere(Vec3::ZERO, 1.0, material).unwrap();
//!
//! let mut scene = Scene::new();
//! scene.add_primitive(sphere);
//! scene.build_bvh().unwrap();
//!
//! let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).unwrap();
//! let hit = scene.nearest_hit(&ray).unwrap().unwrap();
//! assert!((hit.t - 4.0).abs() < 1e-4);
//! ```

pub mod bvh;
pub mod error;
pub mod light;
pub mod material;
pub mod primitive;
pub mod scene;

// Re-export commonly used types
pub use bvh::BvhNode;
pub use error::{GeometryError, SceneError};
pub use light::Light;
pub use material::{checkerboard, vertical_gradient, Material, Texture};
pub use primitive::Primitive;
pub use scene::{Hit, Scene};
