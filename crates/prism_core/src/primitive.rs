//! Geometric primitives and their ray intersection routines.
//!
//! The primitive set is a closed enum: intersection, normal computation
//! and bounding boxes all match exhaustively, so adding a new shape is a
//! compile-time-enforced, single-point change.

use std::sync::Arc;

use prism_math::{Aabb, Ray, Vec3};

use crate::error::GeometryError;
use crate::material::Material;

/// Rays parallel to a plane within this tolerance are treated as misses.
const PARALLEL_EPS: f32 = 1e-6;

/// Direction components below this magnitude use the degenerate-axis
/// branch of the slab test instead of a reciprocal.
const SLAB_EPS: f32 = 1e-8;

/// Tolerance for identifying which box face a hit point lies on.
const FACE_EPS: f32 = 1e-4;

/// Half-extent of the bounding box assigned to unbounded planes.
const PLANE_EXTENT: f32 = 1.0e6;

/// A geometric shape paired with its (shared, immutable) material.
#[derive(Debug, Clone)]
pub enum Primitive {
    Sphere {
        center: Vec3,
        radius: f32,
        material: Arc<Material>,
    },
    Plane {
        point: Vec3,
        /// Unit normal, normalized at construction.
        normal: Vec3,
        material: Arc<Material>,
    },
    Box {
        min: Vec3,
        max: Vec3,
        material: Arc<Material>,
    },
}

impl Primitive {
    /// Create a sphere. The radius must be positive.
    pub fn sphere(center: Vec3, radius: f32, material: Arc<Material>) -> Result<Self, GeometryError> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Primitive::Sphere {
            center,
            radius,
            material,
        })
    }

    /// Create a plane through `point` with the given normal.
    /// The normal is normalized here; a near-zero normal is rejected.
    pub fn plane(point: Vec3, normal: Vec3, material: Arc<Material>) -> Result<Self, GeometryError> {
        if normal.length_squared() < 1e-12 {
            return Err(GeometryError::DegenerateNormal);
        }
        Ok(Primitive::Plane {
            point,
            normal: normal.normalize(),
            material,
        })
    }

    /// Create an axis-aligned box. Corners must satisfy min < max on
    /// every axis.
    pub fn cuboid(min: Vec3, max: Vec3, material: Arc<Material>) -> Result<Self, GeometryError> {
        if !(min.x < max.x && min.y < max.y && min.z < max.z) {
            return Err(GeometryError::InvertedBoxCorners);
        }
        Ok(Primitive::Box { min, max, material })
    }

    /// The material of this primitive.
    pub fn material(&self) -> &Arc<Material> {
        match self {
            Primitive::Sphere { material, .. } => material,
            Primitive::Plane { material, .. } => material,
            Primitive::Box { material, .. } => material,
        }
    }

    /// Find the smallest strictly-positive `t` at which the ray crosses
    /// this surface, or `None` if the ray misses.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match self {
            Primitive::Sphere { center, radius, .. } => {
                intersect_sphere(ray, *center, *radius)
            }
            Primitive::Plane { point, normal, .. } => intersect_plane(ray, *point, *normal),
            Primitive::Box { min, max, .. } => intersect_box(ray, *min, *max),
        }
    }

    /// Outward surface normal at a point on the primitive.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        match self {
            Primitive::Sphere { center, .. } => (point - *center).normalize(),
            Primitive::Plane { normal, .. } => *normal,
            Primitive::Box { min, max, .. } => box_normal_at(point, *min, *max),
        }
    }

    /// Bounding box enclosing the primitive. Planes are unbounded and
    /// get a very large box.
    pub fn bounding_box(&self) -> Aabb {
        match self {
            Primitive::Sphere { center, radius, .. } => {
                let rvec = Vec3::splat(*radius);
                Aabb::from_points(*center - rvec, *center + rvec)
            }
            Primitive::Plane { .. } => Aabb::from_points(
                Vec3::splat(-PLANE_EXTENT),
                Vec3::splat(PLANE_EXTENT),
            ),
            Primitive::Box { min, max, .. } => Aabb::from_points(*min, *max),
        }
    }
}

/// Quadratic ray-sphere intersection.
///
/// Takes the smaller root when it is positive, otherwise the larger one,
/// so a ray starting inside the sphere still reports the forward exit.
fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();

    let near = (h - sqrtd) / a;
    if near > 0.0 {
        return Some(near);
    }
    let far = (h + sqrtd) / a;
    if far > 0.0 {
        return Some(far);
    }
    None
}

fn intersect_plane(ray: &Ray, point: Vec3, normal: Vec3) -> Option<f32> {
    let denom = ray.direction().dot(normal);
    if denom.abs() <= PARALLEL_EPS {
        return None;
    }
    let t = (point - ray.origin()).dot(normal) / denom;
    if t > 0.0 {
        Some(t)
    } else {
        None
    }
}

/// Slab-method ray-box intersection.
///
/// Near-zero direction components skip the reciprocal and instead reject
/// the ray outright when the origin lies outside that axis's slab.
fn intersect_box(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let origin = ray.origin();
    let direction = ray.direction();

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];

        if d.abs() < SLAB_EPS {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if inv < 0.0 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
    }

    if t_min > t_max || t_max < 0.0 {
        return None;
    }
    if t_min > 0.0 {
        Some(t_min)
    } else if t_max > 0.0 {
        Some(t_max)
    } else {
        None
    }
}

/// Identify which face of the box the hit point lies on and return the
/// corresponding axis-aligned unit normal.
fn box_normal_at(point: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    if (point.x - min.x).abs() < FACE_EPS {
        return Vec3::NEG_X;
    }
    if (point.x - max.x).abs() < FACE_EPS {
        return Vec3::X;
    }
    if (point.y - min.y).abs() < FACE_EPS {
        return Vec3::NEG_Y;
    }
    if (point.y - max.y).abs() < FACE_EPS {
        return Vec3::Y;
    }
    if (point.z - min.z).abs() < FACE_EPS {
        return Vec3::NEG_Z;
    }
    if (point.z - max.z).abs() < FACE_EPS {
        return Vec3::Z;
    }

    // Point drifted off every face tolerance (heavily glancing hit);
    // fall back to the dominant axis relative to the box center.
    let center = (min + max) * 0.5;
    let half = (max - min) * 0.5;
    let rel = (point - center) / half;
    let abs = rel.abs();
    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::new(rel.x.signum(), 0.0, 0.0)
    } else if abs.y >= abs.z {
        Vec3::new(0.0, rel.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, rel.z.signum())
    }
}
