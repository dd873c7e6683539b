//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of axis-aligned bounding boxes over primitive indices.
//! Built once before rendering, immutable afterwards. Traversal returns
//! exactly the same nearest hit as a brute-force scan of every primitive.

use prism_math::{Aabb, Interval, Ray};

use crate::error::SceneError;
use crate::primitive::Primitive;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
///
/// Leaves store indices into the scene's primitive list rather than the
/// primitives themselves, so the tree never outlives or copies the scene
/// data it was built from.
#[derive(Debug)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf { indices: Vec<usize>, bbox: Aabb },
}

impl BvhNode {
    /// Build a BVH over the given primitives.
    ///
    /// An empty primitive list is a configuration error, not an empty tree.
    pub fn build(primitives: &[Primitive]) -> Result<Self, SceneError> {
        if primitives.is_empty() {
            return Err(SceneError::EmptyScene);
        }

        let items: Vec<(usize, Aabb)> = primitives
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.bounding_box()))
            .collect();

        let node = Self::build_recursive(items);
        log::debug!("built BVH over {} primitives", primitives.len());
        Ok(node)
    }

    /// Recursive median-split construction.
    ///
    /// Split axis is the longest axis of the centroid bounds; primitives
    /// are ordered by their bounding-box min corner along that axis, which
    /// keeps the build deterministic for a given input order.
    fn build_recursive(mut items: Vec<(usize, Aabb)>) -> Self {
        let bounds = items
            .iter()
            .map(|(_, bbox)| *bbox)
            .fold(Aabb::EMPTY, |acc, b| Aabb::surrounding(&acc, &b));

        if items.len() <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                indices: items.into_iter().map(|(i, _)| i).collect(),
                bbox: bounds,
            };
        }

        let centroid_bounds = items.iter().fold(Aabb::EMPTY, |acc, (_, bbox)| {
            let c = bbox.centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        items.sort_unstable_by(|(_, a), (_, b)| {
            let a_val = a.axis_interval(axis).min;
            let b_val = b.axis_interval(axis).min;
            a_val
                .partial_cmp(&b_val)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = items.len() / 2;
        let right_items = items.split_off(mid);
        let left_items = items;

        BvhNode::Branch {
            left: Box::new(Self::build_recursive(left_items)),
            right: Box::new(Self::build_recursive(right_items)),
            bbox: bounds,
        }
    }

    /// Bounding box of this subtree.
    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Branch { bbox, .. } => *bbox,
            BvhNode::Leaf { bbox, .. } => *bbox,
        }
    }

    /// Find the nearest strictly-positive-t intersection along the ray.
    ///
    /// Returns the index of the hit primitive and its parametric distance.
    pub fn intersect(&self, primitives: &[Primitive], ray: &Ray) -> Option<(usize, f32)> {
        self.intersect_within(primitives, ray, f32::INFINITY)
    }

    fn intersect_within(
        &self,
        primitives: &[Primitive],
        ray: &Ray,
        closest: f32,
    ) -> Option<(usize, f32)> {
        if !self.bounding_box().hit(ray, Interval::new(0.0, closest)) {
            return None;
        }

        match self {
            BvhNode::Leaf { indices, .. } => {
                let mut best: Option<(usize, f32)> = None;
                let mut closest = closest;
                for &index in indices {
                    if let Some(t) = primitives[index].intersect(ray) {
                        if t < closest {
                            closest = t;
                            best = Some((index, t));
                        }
                    }
                }
                best
            }
            BvhNode::Branch { left, right, .. } => {
                let left_hit = left.intersect_within(primitives, ray, closest);
                let closest = left_hit.map_or(closest, |(_, t)| t);
                let right_hit = right.intersect_within(primitives, ray, closest);
                right_hit.or(left_hit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use prism_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    fn gray() -> Arc<Material> {
        Arc::new(Material::diffuse(Vec3::splat(0.5)))
    }

    /// Reference linear scan, the behavior the BVH must reproduce.
    fn brute_force(primitives: &[Primitive], ray: &Ray) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (i, p) in primitives.iter().enumerate() {
            if let Some(t) = p.intersect(ray) {
                if best.map_or(true, |(_, bt)| t < bt) {
                    best = Some((i, t));
                }
            }
        }
        best
    }

    #[test]
    fn test_bvh_empty_is_error() {
        assert_eq!(BvhNode::build(&[]).unwrap_err(), SceneError::EmptyScene);
    }

    #[test]
    fn test_bvh_single_sphere() {
        let primitives = vec![Primitive::sphere(Vec3::new(0.0, 0.0, -1.0), 0.5, gray()).unwrap()];
        let bvh = BvhNode::build(&primitives).unwrap();

        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z).unwrap();
        let (index, t) = bvh.intersect(&primitives, &ray).unwrap();
        assert_eq!(index, 0);
        assert!((t - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_nearest_of_many() {
        let primitives: Vec<Primitive> = (0..10)
            .map(|i| {
                Primitive::sphere(Vec3::new(0.0, 0.0, -2.0 * (i as f32 + 1.0)), 0.5, gray())
                    .unwrap()
            })
            .collect();
        let bvh = BvhNode::build(&primitives).unwrap();

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z).unwrap();
        let (index, t) = bvh.intersect(&primitives, &ray).unwrap();

        // Nearest sphere sits at z = -2 with radius 0.5
        assert_eq!(index, 0);
        assert!((t - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);

        let mut primitives = Vec::new();
        for _ in 0..60 {
            let center = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            primitives.push(Primitive::sphere(center, rng.gen_range(0.1..1.5), gray()).unwrap());
        }
        for _ in 0..20 {
            let min = Vec3::new(
                rng.gen_range(-10.0..9.0),
                rng.gen_range(-10.0..9.0),
                rng.gen_range(-10.0..9.0),
            );
            let size = Vec3::new(
                rng.gen_range(0.1..2.0),
                rng.gen_range(0.1..2.0),
                rng.gen_range(0.1..2.0),
            );
            primitives.push(Primitive::cuboid(min, min + size, gray()).unwrap());
        }

        let bvh = BvhNode::build(&primitives).unwrap();

        for _ in 0..500 {
            let origin = Vec3::new(
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
            );
            let direction = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            let Some(ray) = Ray::new(origin, direction) else {
                continue;
            };

            let expected = brute_force(&primitives, &ray);
            let actual = bvh.intersect(&primitives, &ray);

            match (expected, actual) {
                (None, None) => {}
                (Some((ei, et)), Some((ai, at))) => {
                    assert_eq!(ei, ai, "different primitive for ray {ray:?}");
                    assert!((et - at).abs() < 1e-4, "different t for ray {ray:?}");
                }
                _ => panic!("BVH and brute force disagree for ray {ray:?}: {expected:?} vs {actual:?}"),
            }
        }
    }

    #[test]
    fn test_bvh_branch_bbox_encloses_children() {
        let primitives: Vec<Primitive> = (0..16)
            .map(|i| Primitive::sphere(Vec3::new(i as f32 * 3.0, 0.0, 0.0), 1.0, gray()).unwrap())
            .collect();
        let bvh = BvhNode::build(&primitives).unwrap();

        fn check(node: &BvhNode) {
            if let BvhNode::Branch { left, right, bbox } = node {
                for child in [left.as_ref(), right.as_ref()] {
                    let cb = child.bounding_box();
                    for axis in 0..3 {
                        assert!(bbox.axis_interval(axis).min <= cb.axis_interval(axis).min);
                        assert!(bbox.axis_interval(axis).max >= cb.axis_interval(axis).max);
                    }
                    check(child);
                }
            }
        }
        check(&bvh);
    }
}
