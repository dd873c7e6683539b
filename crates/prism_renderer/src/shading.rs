//! Local illumination: ambient, diffuse and Blinn-Phong specular terms
//! with shadow rays, optional soft shadows and ambient occlusion.

use prism_core::{Scene, SceneError};
use prism_math::{Ray, Vec3};
use rand::RngCore;

use crate::gen_f32;

/// Offset applied to secondary ray origins to avoid re-hitting the
/// surface they start on.
pub(crate) const RAY_EPS: f32 = 1e-3;

/// Knobs for the lighting evaluator.
#[derive(Debug, Clone)]
pub struct ShadingSettings {
    /// Fraction of the base color always added, regardless of visibility.
    pub ambient: f32,
    /// Shadow rays per light; 0 or 1 gives hard shadows, more samples
    /// jitter the target and average the visibility fraction.
    pub soft_shadow_samples: u32,
    /// Radius of the jitter sphere around the light for soft shadows.
    pub soft_shadow_radius: f32,
    /// Hemisphere samples for ambient occlusion; 0 disables it.
    pub ao_samples: u32,
    /// Occluders beyond this distance do not contribute to occlusion.
    pub ao_distance: f32,
}

impl Default for ShadingSettings {
    fn default() -> Self {
        Self {
            ambient: 0.15,
            soft_shadow_samples: 0,
            soft_shadow_radius: 0.2,
            ao_samples: 0,
            ao_distance: 1.0,
        }
    }
}

/// Evaluate local illumination at a hit point.
///
/// `normal` must already be oriented against the incoming ray and
/// `view_dir` is the negated (unit) ray direction. The result is summed
/// over all lights and clamped to [0, 1] per channel.
pub fn shade(
    scene: &Scene,
    point: Vec3,
    normal: Vec3,
    view_dir: Vec3,
    base_color: Vec3,
    shininess: f32,
    settings: &ShadingSettings,
    rng: &mut dyn RngCore,
) -> Result<Vec3, SceneError> {
    let mut color = base_color * settings.ambient;

    for light in scene.lights() {
        let to_light = light.position - point;
        let distance = to_light.length();
        if distance < 1e-6 {
            continue;
        }
        let light_dir = to_light / distance;

        let visibility = light_visibility(scene, point, normal, light.position, settings, rng)?;
        if visibility <= 0.0 {
            continue;
        }

        // Inverse-square falloff
        let attenuation = light.intensity / (distance * distance);

        let diffuse = normal.dot(light_dir).max(0.0);
        let half = (view_dir + light_dir).normalize_or_zero();
        let specular = normal.dot(half).max(0.0).powf(shininess);

        color += visibility
            * attenuation
            * (diffuse * light.color * base_color + specular * light.color);
    }

    if settings.ao_samples > 0 {
        color *= occlusion_factor(scene, point, normal, settings, rng)?;
    }

    Ok(color.clamp(Vec3::ZERO, Vec3::ONE))
}

/// Fraction of shadow rays that reach the light, in [0, 1].
///
/// The shadow ray starts at the hit point offset along the normal; an
/// occluder strictly closer than the light blocks the sample.
fn light_visibility(
    scene: &Scene,
    point: Vec3,
    normal: Vec3,
    light_position: Vec3,
    settings: &ShadingSettings,
    rng: &mut dyn RngCore,
) -> Result<f32, SceneError> {
    let samples = settings.soft_shadow_samples.max(1);
    let origin = point + normal * RAY_EPS;

    let mut visible = 0u32;
    for sample in 0..samples {
        let target = if sample == 0 {
            // First sample always aims at the light itself so a single
            // sample degenerates to a hard shadow test.
            light_position
        } else {
            light_position + random_unit_vector(rng) * settings.soft_shadow_radius
        };

        let to_target = target - origin;
        let distance = to_target.length();
        let Some(shadow_ray) = Ray::new(origin, to_target) else {
            continue;
        };

        let occluded = match scene.nearest_hit(&shadow_ray)? {
            Some(hit) => hit.t < distance,
            None => false,
        };
        if !occluded {
            visible += 1;
        }
    }

    Ok(visible as f32 / samples as f32)
}

/// Ambient occlusion scale: 1 when the hemisphere above the point is
/// clear, approaching 0 as nearby geometry closes in.
fn occlusion_factor(
    scene: &Scene,
    point: Vec3,
    normal: Vec3,
    settings: &ShadingSettings,
    rng: &mut dyn RngCore,
) -> Result<f32, SceneError> {
    let origin = point + normal * RAY_EPS;
    let mut occluded = 0u32;

    for _ in 0..settings.ao_samples {
        let mut direction = random_unit_vector(rng);
        if direction.dot(normal) < 0.0 {
            direction = -direction;
        }
        let Some(ray) = Ray::new(origin, direction) else {
            continue;
        };
        if let Some(hit) = scene.nearest_hit(&ray)? {
            if hit.t < settings.ao_distance {
                occluded += 1;
            }
        }
    }

    Ok(1.0 - occluded as f32 / settings.ao_samples as f32)
}

/// Uniform random unit vector via rejection sampling.
pub(crate) fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}
