//! Scene: primitives, lights, and the acceleration structure.

use prism_math::{Ray, Vec3};

use crate::bvh::BvhNode;
use crate::error::SceneError;
use crate::light::Light;
use crate::primitive::Primitive;

/// A confirmed ray-scene intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the hit primitive in the scene's primitive list.
    pub primitive: usize,
    /// Parametric distance along the ray, strictly positive.
    pub t: f32,
    /// World-space hit point, `ray.at(t)`.
    pub point: Vec3,
}

/// Owns all primitives and lights plus the BVH built over them.
///
/// Everything is constructed during setup and read-only while rendering;
/// render workers share the scene by reference with no locking.
#[derive(Debug, Default)]
pub struct Scene {
    primitives: Vec<Primitive>,
    lights: Vec<Light>,
    bvh: Option<BvhNode>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive. Invalidates a previously built BVH.
    pub fn add_primitive(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
        self.bvh = None;
    }

    /// Add a light source.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Build the acceleration structure. Must be called before any
    /// intersection query; fails on an empty scene.
    pub fn build_bvh(&mut self) -> Result<(), SceneError> {
        let bvh = BvhNode::build(&self.primitives)?;
        log::info!(
            "scene ready: {} primitives, {} lights",
            self.primitives.len(),
            self.lights.len()
        );
        self.bvh = Some(bvh);
        Ok(())
    }

    /// Whether `build_bvh` has been called since the last mutation.
    pub fn is_built(&self) -> bool {
        self.bvh.is_some()
    }

    /// Nearest forward intersection of the ray with the scene.
    ///
    /// Querying before `build_bvh` is a configuration error, surfaced
    /// immediately rather than treated as a miss.
    pub fn nearest_hit(&self, ray: &Ray) -> Result<Option<Hit>, SceneError> {
        let bvh = self.bvh.as_ref().ok_or(SceneError::AccelerationNotBuilt)?;
        Ok(bvh
            .intersect(&self.primitives, ray)
            .map(|(primitive, t)| Hit {
                primitive,
                t,
                point: ray.at(t),
            }))
    }

    /// Reference linear scan over every primitive, bypassing the BVH.
    ///
    /// Exists so tests can assert the BVH returns identical results.
    pub fn brute_force_hit(&self, ray: &Ray) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        for (primitive, p) in self.primitives.iter().enumerate() {
            if let Some(t) = p.intersect(ray) {
                if best.map_or(true, |hit| t < hit.t) {
                    best = Some(Hit {
                        primitive,
                        t,
                        point: ray.at(t),
                    });
                }
            }
        }
        best
    }

    /// All primitives in the scene.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// All lights in the scene.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}
