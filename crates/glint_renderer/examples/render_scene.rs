//! Demo scene for the Whitted tracer.
//!
//! Builds a small scene in code (spheres, a floor plane, a CSG solid, a
//! glass mesh, a soft area light), renders it in parallel and writes a PNG.
//!
//! Usage: cargo run --example render_scene --release [output.png]

use anyhow::{Context, Result};
use glint_renderer::mesh::box_faces;
use glint_renderer::{
    render, AreaLight, AxisBox, Bvh, Camera, Color, CsgNode, CsgSolid, Light, Material, Mesh,
    Plane, Primitive, RenderConfig, Sampling, Sphere, Tracer, Vec3,
};
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "render_scene.png".to_string());

    let config = RenderConfig {
        background: Color::new(0.05, 0.07, 0.12),
        antialias: true,
        image_width: 800,
        image_height: 450,
        field_of_view: 45.0,
        ..RenderConfig::default()
    };

    let start = Instant::now();
    let primitives = build_scene().context("building scene")?;
    let lights = build_lights().context("building lights")?;
    log::info!(
        "Scene built in {:?}: {} primitives, {} lights",
        start.elapsed(),
        primitives.len(),
        lights.len()
    );

    let tracer = Tracer::new(Bvh::new(primitives), lights, config.clone());

    let mut camera = Camera::new().with_config(&config).with_position(
        Vec3::new(0.0, 2.5, 9.0), // look_from
        Vec3::new(0.0, 0.8, 0.0), // look_at
        Vec3::Y,                  // vup
    );
    camera.initialize();

    let image = render(&tracer, &camera);
    image
        .to_image()
        .save(&output)
        .with_context(|| format!("writing {output}"))?;
    log::info!("Saved to {}", output);

    Ok(())
}

fn build_scene() -> Result<Vec<Primitive>> {
    let mut objects: Vec<Primitive> = Vec::new();

    // Floor
    objects.push(
        Plane::new(
            Vec3::ZERO,
            Vec3::Y,
            Material::matte(Color::new(0.6, 0.6, 0.55)).with_reflective(Color::splat(0.1)),
        )?
        .into(),
    );

    // Mirror and matte spheres
    objects.push(
        Sphere::new(
            Vec3::new(-2.2, 1.0, 0.0),
            1.0,
            Material::default()
                .with_ambient(Color::splat(0.02))
                .with_reflective(Color::splat(0.9))
                .with_specular(Color::ONE, 200.0),
        )?
        .into(),
    );
    objects.push(
        Sphere::new(
            Vec3::new(0.3, 0.5, 2.0),
            0.5,
            Material::matte(Color::new(0.8, 0.25, 0.2)).with_specular(Color::splat(0.4), 30.0),
        )?
        .into(),
    );

    // Cube with a spherical bite taken out of its corner
    let cube = CsgNode::leaf(AxisBox::new(
        Vec3::new(1.2, 0.0, -0.8),
        Vec3::new(2.8, 1.6, 0.8),
        Material::default(),
    )?)?;
    let bite = CsgNode::leaf(Sphere::new(
        Vec3::new(2.8, 1.6, 0.8),
        0.9,
        Material::default(),
    )?)?;
    objects.push(
        CsgSolid::new(
            CsgNode::difference(cube, bite),
            Material::matte(Color::new(0.2, 0.45, 0.8)).with_specular(Color::splat(0.3), 20.0),
        )
        .into(),
    );

    // Glass block as a triangle mesh
    objects.push(
        Mesh::new(
            box_faces(Vec3::new(-0.6, 0.0, -2.5), Vec3::new(0.6, 2.0, -1.3)),
            Material::default()
                .with_specular(Color::ONE, 120.0)
                .with_transmissive(Color::splat(0.85), 1.5),
        )?
        .into(),
    );

    Ok(objects)
}

fn build_lights() -> Result<Vec<Light>> {
    Ok(vec![
        Light::ambient(Color::splat(0.15)),
        AreaLight::rect(
            Color::splat(0.8),
            Vec3::new(1.0, 6.0, 3.0),
            -Vec3::Y,
            Vec3::Z,
            2.0,
            2.0,
            16,
            Sampling::Stratified,
        )?
        .into(),
        Light::spot(
            Color::new(0.4, 0.35, 0.3),
            Vec3::new(-4.0, 5.0, 4.0),
            Vec3::new(0.8, -1.0, -0.8),
            25.0,
        )?,
    ])
}
