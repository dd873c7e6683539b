//! The render entry point: per-pixel sampling, parallel bucket
//! scheduling, and final image assembly.

use prism_core::{Scene, SceneError};
use prism_math::Vec3;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::Camera;
use crate::gen_f32;
use crate::shading::ShadingSettings;
use crate::tracer::trace;

/// Errors from the render entry point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    InvalidConfig(&'static str),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum recursion depth for reflection/refraction rays
    pub max_depth: u32,
    /// Color returned when a ray escapes the scene
    pub background: Vec3,
    /// Gamma applied after averaging (`color^(1/gamma)`)
    pub gamma: f32,
    /// Base seed; each bucket derives its own RNG from this
    pub seed: u64,
    /// Lighting evaluator settings
    pub shading: ShadingSettings,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
            samples_per_pixel: 16,
            max_depth: 5,
            background: Vec3::ZERO,
            gamma: 2.2,
            seed: 0,
            shading: ShadingSettings::default(),
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig("image dimensions must be nonzero"));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig("samples_per_pixel must be nonzero"));
        }
        if !(self.gamma > 0.0) {
            return Err(RenderError::InvalidConfig("gamma must be positive"));
        }
        Ok(())
    }
}

/// Render a single pixel: jittered multi-sampling, averaging, clamping
/// and gamma correction.
pub fn render_pixel(
    scene: &Scene,
    camera: &dyn Camera,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Result<Vec3, SceneError> {
    let mut accumulated = Vec3::ZERO;

    for _ in 0..config.samples_per_pixel {
        // Uniform jitter inside the pixel footprint; v is flipped so
        // image row 0 is the top of the frame.
        let u = (x as f32 + gen_f32(rng)) / config.width as f32;
        let v = 1.0 - (y as f32 + gen_f32(rng)) / config.height as f32;

        let ray = camera.generate_ray(u, v);
        accumulated += trace(scene, &ray, 0, config, rng)?;
    }

    let averaged = accumulated / config.samples_per_pixel as f32;
    Ok(averaged.clamp(Vec3::ZERO, Vec3::ONE).powf(1.0 / config.gamma))
}

/// A 2D grid of RGB colors in [0, 1].
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Vec3>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Vec3) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to packed 8-bit RGB bytes (for encoding or display).
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.push((color.x.clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((color.y.clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((color.z.clamp(0.0, 1.0) * 255.0) as u8);
        }
        bytes
    }
}

/// Render the scene through the camera into an image buffer.
///
/// Buckets run on the rayon thread pool; every bucket reads the immutable
/// scene and writes only its own pixels, which are scattered into the
/// buffer once all buckets complete. A failed bucket fails the whole
/// render; no partial image is ever returned.
pub fn render(
    scene: &Scene,
    camera: &dyn Camera,
    config: &RenderConfig,
) -> Result<ImageBuffer, RenderError> {
    config.validate()?;
    if !scene.is_built() {
        return Err(SceneError::AccelerationNotBuilt.into());
    }

    let buckets = generate_buckets(config.width, config.height, DEFAULT_BUCKET_SIZE);
    log::info!(
        "rendering {}x{} at {} spp across {} buckets",
        config.width,
        config.height,
        config.samples_per_pixel,
        buckets.len()
    );
    let start = std::time::Instant::now();

    let results: Result<Vec<BucketResult>, SceneError> = buckets
        .par_iter()
        .map(|bucket| {
            // Independent stream per bucket keeps noise uncorrelated
            // across workers without sharing RNG state.
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(bucket.index as u64));
            let pixels = render_bucket(bucket, scene, camera, config, &mut rng)?;
            Ok(BucketResult::new(*bucket, pixels))
        })
        .collect();
    let results = results?;

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in results {
        let bucket = result.bucket;
        for (i, color) in result.pixels.into_iter().enumerate() {
            let x = bucket.x + i as u32 % bucket.width;
            let y = bucket.y + i as u32 / bucket.width;
            image.set(x, y, color);
        }
    }

    log::info!("render finished in {:?}", start.elapsed());
    Ok(image)
}
