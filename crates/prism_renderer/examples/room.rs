//! Room demo scene.
//!
//! A gray box room with a checkerboard floor and a reflective blue
//! sphere, lit by a single light behind the camera. Saves to PNG.

use std::sync::Arc;

use anyhow::{Context, Result};
use prism_core::{checkerboard, Light, Material, Primitive, Scene, Texture};
use prism_math::Vec3;
use prism_renderer::{render, PinholeCamera, RenderConfig};

fn main() -> Result<()> {
    env_logger::init();

    let start = std::time::Instant::now();
    let scene = build_scene()?;
    println!("Scene built in {:?}", start.elapsed());

    let camera = PinholeCamera::new(
        Vec3::new(0.0, 2.0, 4.0), // inside the room
        Vec3::new(0.0, 1.0, 0.0), // looking at the sphere
        Vec3::Y,
        60.0,
        16.0 / 9.0,
    )
    .context("degenerate camera setup")?;

    let config = RenderConfig {
        width: 800,
        height: 450,
        samples_per_pixel: 16,
        max_depth: 3,
        ..Default::default()
    };

    println!(
        "Rendering {}x{} @ {} spp...",
        config.width, config.height, config.samples_per_pixel
    );
    let start = std::time::Instant::now();
    let image = render(&scene, &camera, &config)?;
    println!("Rendered in {:?}", start.elapsed());

    let filename = "room.png";
    image::save_buffer(
        filename,
        &image.to_rgb8(),
        image.width,
        image.height,
        image::ColorType::Rgb8,
    )
    .context("failed to save image")?;
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> Result<Scene> {
    let mut scene = Scene::new();

    let wall = Arc::new(Material::diffuse(Vec3::splat(0.3)));
    let floor = Arc::new(Material::new(
        Texture::Procedural(checkerboard),
        0.0,
        0.0,
        1.0,
        50.0,
    )?);
    let sphere = Arc::new(Material::reflective(Vec3::new(0.1, 0.1, 0.8), 0.5)?);

    // Floor
    scene.add_primitive(Primitive::cuboid(
        Vec3::new(-5.0, -0.1, -5.0),
        Vec3::new(5.0, 0.0, 5.0),
        floor,
    )?);

    // Walls and ceiling
    scene.add_primitive(Primitive::cuboid(
        Vec3::new(-5.0, 0.0, -5.0),
        Vec3::new(-4.9, 5.0, 5.0),
        wall.clone(),
    )?);
    scene.add_primitive(Primitive::cuboid(
        Vec3::new(4.9, 0.0, -5.0),
        Vec3::new(5.0, 5.0, 5.0),
        wall.clone(),
    )?);
    scene.add_primitive(Primitive::cuboid(
        Vec3::new(-5.0, 0.0, -5.0),
        Vec3::new(5.0, 5.0, -4.9),
        wall.clone(),
    )?);
    scene.add_primitive(Primitive::cuboid(
        Vec3::new(-5.0, 4.9, -5.0),
        Vec3::new(5.0, 5.0, 5.0),
        wall,
    )?);

    // The shiny blue sphere
    scene.add_primitive(Primitive::sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, sphere)?);

    // Light behind the camera
    scene.add_light(Light::white(Vec3::new(0.0, 3.0, 5.0), 3.0)?);

    scene.build_bvh()?;
    Ok(scene)
}
