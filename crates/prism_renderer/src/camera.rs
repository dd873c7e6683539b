//! Camera interface and the default pinhole implementation.

use prism_math::{Ray, Vec3};

/// Opaque ray source consumed by the renderer.
///
/// `u` and `v` are normalized screen coordinates in [0, 1]; (0, 0) maps
/// to the lower-left corner of the view and (1, 1) to the upper-right.
/// The renderer does not care how the implementation derives its basis
/// vectors.
pub trait Camera: Send + Sync {
    /// Generate the primary ray for normalized screen coordinates (u, v).
    fn generate_ray(&self, u: f32, v: f32) -> Ray;
}

/// A pinhole camera with a symmetric view frustum.
#[derive(Debug, Clone)]
pub struct PinholeCamera {
    origin: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl PinholeCamera {
    /// Create a camera at `look_from`, aimed at `look_at`.
    ///
    /// `vfov` is the vertical field of view in degrees; `aspect_ratio`
    /// is width over height. Returns `None` when the viewing basis is
    /// degenerate (`look_from == look_at`, or `vup` parallel to the view
    /// direction).
    pub fn new(
        look_from: Vec3,
        look_at: Vec3,
        vup: Vec3,
        vfov: f32,
        aspect_ratio: f32,
    ) -> Option<Self> {
        let forward = look_at - look_from;
        if forward.length_squared() < 1e-12 {
            return None;
        }

        let theta = vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * aspect_ratio;

        let w = -forward.normalize();
        let u = vup.cross(w);
        if u.length_squared() < 1e-12 {
            return None;
        }
        let u = u.normalize();
        let v = w.cross(u);

        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left = look_from - horizontal / 2.0 - vertical / 2.0 - w;

        Some(Self {
            origin: look_from,
            lower_left,
            horizontal,
            vertical,
        })
    }
}

impl Camera for PinholeCamera {
    fn generate_ray(&self, u: f32, v: f32) -> Ray {
        let target = self.lower_left + u * self.horizontal + v * self.vertical;
        // The target always sits on the focal plane one unit in front of
        // the origin, so the direction can never be zero.
        Ray::new(self.origin, target - self.origin)
            .expect("frustum ray direction is nonzero")
    }
}
