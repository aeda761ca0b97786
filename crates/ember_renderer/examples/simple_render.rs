//! Simple ray tracer example.
//!
//! Renders a small scene with spheres, a torus, a mirror and an area light,
//! then saves it in PPM format.
//!
//! Usage: `cargo run --example simple_render [whitted|area|path] [settings.json]`

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use ember_renderer::{
    Color, Emissive, ImageBuffer, Light, Matte, NormalMap, NormalMapped, Phong, Plane, Primitive,
    Reflective, RenderSettings, Renderer, Scene, Sphere, Texture, Torus, TracerMode, Triangle,
    Vec3,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let tracer = match args.next().as_deref() {
        None | Some("whitted") => TracerMode::Whitted,
        Some("area") => TracerMode::AreaLighting,
        Some("path") => TracerMode::PathTracer,
        Some(other) => bail!("unknown tracer '{}', expected whitted, area or path", other),
    };

    let mut settings = match args.next() {
        Some(path) => RenderSettings::load(&path).with_context(|| format!("loading {}", path))?,
        None => default_settings(),
    };
    settings.tracer = tracer;

    let scene = build_scene(&settings)?;
    let mut renderer = Renderer::new(&settings)?;
    let stats = renderer.render(&scene);
    log::info!("{:.0} samples/s", stats.samples_per_second());

    let filename = "output.ppm";
    save_ppm(renderer.image(), filename)?;
    log::info!("Saved to {}", filename);
    Ok(())
}

fn default_settings() -> RenderSettings {
    let mut settings = RenderSettings {
        width: 320,
        height: 240,
        max_depth: 6,
        background: Color::new(0.05, 0.07, 0.1),
        ..Default::default()
    };
    settings.camera.eye = Vec3::new(0.0, 1.5, 6.0);
    settings.camera.look_at = Vec3::new(0.0, 0.5, 0.0);
    settings.camera.vfov_degrees = 45.0;
    settings.sampler.samples = 16;
    settings
}

fn build_scene(settings: &RenderSettings) -> Result<Scene> {
    let mut scene = Scene::from_settings(settings);

    // Ground
    scene.add_primitive(
        Primitive::new(Plane::new(Vec3::Y, 0.0))
            .with_texture(Texture::checker(Color::splat(0.8), Color::splat(0.2), 1.0))
            .with_material(Arc::new(Matte::new(0.2, 0.8))),
    );

    scene.add_primitive(
        Primitive::new(Sphere::new(Vec3::ZERO, 1.0))
            .translate(Vec3::new(-1.5, 1.0, 0.0))
            .with_color(Color::new(0.8, 0.3, 0.2))
            .with_material(Arc::new(Phong::new(0.2, 0.7, 0.3, 40.0))),
    );

    scene.add_primitive(
        Primitive::new(Sphere::new(Vec3::new(1.5, 1.0, 0.0), 1.0))
            .with_material(Arc::new(Reflective::new(0.1, 0.1, 0.2, 100.0, 0.8))),
    );

    scene.add_primitive(
        Primitive::new(Torus::new(0.7, 0.2))
            .rotate_x(std::f32::consts::FRAC_PI_2)
            .translate(Vec3::new(0.0, 0.9, -1.5))
            .with_color(Color::new(0.2, 0.6, 0.3))
            .with_material(Arc::new(NormalMapped::new(
                Matte::new(0.2, 0.8),
                NormalMap::Bumps {
                    frequency: 12.0,
                    amplitude: 0.3,
                },
            ))),
    );

    // Overhead emitter
    let emitter = scene.add_primitive(
        Primitive::new(Triangle::new(
            Vec3::new(-1.0, 4.0, -1.0),
            Vec3::new(1.0, 4.0, -1.0),
            Vec3::new(0.0, 4.0, 1.0),
        ))
        .with_material(Arc::new(Emissive::new(8.0, Color::ONE))),
    );

    scene.add_light(Light::ambient(Color::ONE, 0.3));
    scene.add_light(Light::point(Vec3::new(3.0, 5.0, 4.0), Color::ONE, 2.0));
    scene.add_light(Light::directional(Vec3::new(-1.0, 2.0, 1.0), Color::new(1.0, 0.95, 0.8), 0.5));
    scene.add_light(Light::area(emitter)?);

    Ok(scene)
}

/// Write the image as binary PPM (P6).
fn save_ppm(image: &ImageBuffer, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())
        .with_context(|| format!("creating {}", path.as_ref().display()))?;
    let mut writer = BufWriter::new(file);

    write!(writer, "P6\n{} {}\n255\n", image.width, image.height)?;
    writer.write_all(&image.to_rgb8())?;
    writer.flush()?;
    Ok(())
}
