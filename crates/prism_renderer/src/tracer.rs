//! Recursive ray tracing: local shading plus reflection and refraction.

use prism_core::{Scene, SceneError};
use prism_math::{Ray, Vec3};
use rand::RngCore;

use crate::renderer::RenderConfig;
use crate::shading::{shade, RAY_EPS};

/// Trace a ray through the scene and return its color.
///
/// Recursion is bounded by `config.max_depth`: any call with
/// `depth > max_depth` returns the background color immediately.
/// Reflection and refraction each blend with the accumulated color by
/// their material weight (`(1-w)·color + w·secondary`), so a hit can
/// never amplify energy past the clamp.
pub fn trace(
    scene: &Scene,
    ray: &Ray,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Result<Vec3, SceneError> {
    if depth > config.max_depth {
        return Ok(config.background);
    }

    let Some(hit) = scene.nearest_hit(ray)? else {
        return Ok(config.background);
    };

    let primitive = &scene.primitives()[hit.primitive];
    let material = primitive.material();

    let outward = primitive.normal_at(hit.point);
    let entering = ray.direction().dot(outward) < 0.0;
    // Shading normal always faces the incoming ray
    let normal = if entering { outward } else { -outward };
    let view_dir = -ray.direction();
    let base_color = material.color_at(hit.point);

    let mut color = shade(
        scene,
        hit.point,
        normal,
        view_dir,
        base_color,
        material.shininess,
        &config.shading,
        rng,
    )?;

    if material.reflectivity > 0.0 {
        let reflected_dir = reflect(ray.direction(), normal);
        if let Some(reflected) = Ray::new(hit.point + reflected_dir * RAY_EPS, reflected_dir) {
            let reflection = trace(scene, &reflected, depth + 1, config, rng)?;
            color = color * (1.0 - material.reflectivity) + reflection * material.reflectivity;
        }
    }

    if material.transparency > 0.0 {
        let (eta, refraction_normal) = if entering {
            (1.0 / material.refractive_index, outward)
        } else {
            (material.refractive_index, -outward)
        };
        // Total internal reflection leaves the refraction branch out
        if let Some(refracted_dir) = refract(ray.direction(), refraction_normal, eta) {
            if let Some(refracted) = Ray::new(hit.point + refracted_dir * RAY_EPS, refracted_dir)
            {
                let refraction = trace(scene, &refracted, depth + 1, config, rng)?;
                color = color * (1.0 - material.transparency) + refraction * material.transparency;
            }
        }
    }

    Ok(color.clamp(Vec3::ZERO, Vec3::ONE))
}

/// Mirror reflection of `v` about the unit normal `n`.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Snell's law refraction of the unit vector `dir` through a surface
/// with unit normal `n` (pointing towards the incoming side) and
/// refraction ratio `eta`. Returns `None` on total internal reflection.
#[inline]
fn refract(dir: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = (-dir).dot(n).min(1.0);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
    if sin2_t > 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some(eta * dir + (eta * cos_i - cos_t) * n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{Light, Material, Primitive};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn single_sphere_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_primitive(
            Primitive::sphere(
                Vec3::new(0.0, 0.0, -3.0),
                1.0,
                Arc::new(Material::diffuse(Vec3::new(1.0, 0.0, 0.0))),
            )
            .unwrap(),
        );
        scene.add_light(Light::white(Vec3::new(0.0, 5.0, 5.0), 2.0).unwrap());
        scene.build_bvh().unwrap();
        scene
    }

    #[test]
    fn test_depth_bound_returns_background() {
        let scene = single_sphere_scene();
        let config = RenderConfig {
            background: Vec3::new(0.25, 0.5, 0.75),
            max_depth: 3,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);

        // Ray aimed straight at the sphere, but past the recursion bound
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z).unwrap();
        let color = trace(&scene, &ray, config.max_depth + 1, &config, &mut rng).unwrap();
        assert_eq!(color, config.background);
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = single_sphere_scene();
        let config = RenderConfig {
            background: Vec3::new(0.1, 0.2, 0.3),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::Y).unwrap();
        let color = trace(&scene, &ray, 0, &config, &mut rng).unwrap();
        assert_eq!(color, config.background);
    }

    #[test]
    fn test_parallel_mirrors_stay_bounded() {
        // Two facing mirrors; a ray between them bounces until the depth
        // bound cuts the recursion off. The blend weights keep every
        // channel inside [0, 1].
        let mirror = Arc::new(Material::reflective(Vec3::splat(0.9), 0.9).unwrap());
        let mut scene = Scene::new();
        scene.add_primitive(
            Primitive::plane(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, mirror.clone()).unwrap(),
        );
        scene.add_primitive(
            Primitive::plane(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, mirror).unwrap(),
        );
        scene.add_light(Light::white(Vec3::new(0.0, 0.0, 0.0), 5.0).unwrap());
        scene.build_bvh().unwrap();

        let config = RenderConfig {
            max_depth: 8,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z).unwrap();
        let color = trace(&scene, &ray, 0, &config, &mut rng).unwrap();

        for channel in [color.x, color.y, color.z] {
            assert!((0.0..=1.0).contains(&channel), "unclamped channel {channel}");
        }
    }

    #[test]
    fn test_reflection_picks_up_neighbor_color() {
        // Mirror sphere next to a red wall: the reflected ray must carry
        // red back into the result.
        let mut scene = Scene::new();
        scene.add_primitive(
            Primitive::sphere(
                Vec3::new(0.0, 0.0, -3.0),
                1.0,
                Arc::new(Material::reflective(Vec3::splat(0.1), 1.0).unwrap()),
            )
            .unwrap(),
        );
        scene.add_primitive(
            Primitive::plane(
                Vec3::new(0.0, 0.0, 2.0),
                Vec3::NEG_Z,
                Arc::new(Material::diffuse(Vec3::new(1.0, 0.0, 0.0))),
            )
            .unwrap(),
        );
        scene.add_light(Light::white(Vec3::new(0.0, 0.0, -1.0), 4.0).unwrap());
        scene.build_bvh().unwrap();

        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(0);

        // Head-on hit reflects straight back to the red wall
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::NEG_Z).unwrap();
        let color = trace(&scene, &ray, 0, &config, &mut rng).unwrap();

        assert!(color.x > 0.1, "expected red reflection, got {color:?}");
        assert!(color.y < color.x && color.z < color.x);
    }

    #[test]
    fn test_refraction_through_glass() {
        // Transparent sphere in front of a red wall: the refracted ray
        // continues through and picks up the wall color.
        let mut scene = Scene::new();
        scene.add_primitive(
            Primitive::sphere(
                Vec3::new(0.0, 0.0, -3.0),
                1.0,
                Arc::new(Material::transparent(0.9, 1.1).unwrap()),
            )
            .unwrap(),
        );
        scene.add_primitive(
            Primitive::plane(
                Vec3::new(0.0, 0.0, -8.0),
                Vec3::Z,
                Arc::new(Material::diffuse(Vec3::new(1.0, 0.0, 0.0))),
            )
            .unwrap(),
        );
        // Off-axis light so the wall shows diffuse red rather than a
        // white specular highlight
        scene.add_light(Light::white(Vec3::new(0.0, 5.0, -6.0), 4.0).unwrap());
        scene.build_bvh().unwrap();

        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(0);

        // Straight through the sphere's center: refraction does not bend
        // a normal-incidence ray, so it reaches the wall behind.
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z).unwrap();
        let color = trace(&scene, &ray, 0, &config, &mut rng).unwrap();

        assert!(color.x > 0.1, "expected red through glass, got {color:?}");
        assert!(color.y < color.x && color.z < color.x);
    }

    #[test]
    fn test_refract_normal_incidence_passes_straight() {
        let dir = Vec3::NEG_Z;
        let refracted = refract(dir, Vec3::Z, 1.0 / 1.5).unwrap();
        assert!((refracted - dir).length() < 1e-5);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        // Grazing exit from a dense medium: sin^2 exceeds 1
        let dir = Vec3::new(0.9, -0.436, 0.0).normalize();
        assert!(refract(dir, Vec3::Y, 1.5).is_none());
    }

    #[test]
    fn test_reflect_mirrors_about_normal() {
        let v = Vec3::new(1.0, -1.0, 0.0).normalize();
        let reflected = reflect(v, Vec3::Y);
        assert!((reflected - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-5);
    }
}
