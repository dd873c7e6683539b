//! Prism Renderer - recursive CPU ray tracing.
//!
//! Drives per-pixel sampling over a read-only [`prism_core::Scene`]:
//! primary rays come from a [`Camera`], shading combines ambient, diffuse
//! and Blinn-Phong specular terms with shadow rays, and the tracer
//! recursively spawns reflection and refraction rays up to a fixed depth.
//! The image is split into buckets rendered in parallel with rayon; each
//! bucket carries its own seeded RNG so noise stays uncorrelated without
//! any cross-worker synchronization.

mod bucket;
mod camera;
mod renderer;
mod shading;
mod tracer;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, PinholeCamera};
pub use renderer::{render, render_pixel, ImageBuffer, RenderConfig, RenderError};
pub use shading::{shade, ShadingSettings};
pub use tracer::trace;

use rand::RngCore;

/// Uniform f32 in [0, 1) from a type-erased RNG.
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    use rand::Rng;
    rng.gen()
}
