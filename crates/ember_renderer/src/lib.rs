//! Ember Renderer - CPU ray tracing
//!
//! A single-threaded offline ray tracer with three shading paths:
//! Whitted-style direct lighting, Monte Carlo area lighting and a
//! random-walk path tracer.
//!
//! Scenes are built from [`Primitive`]s (an analytic [`Shape`] with an
//! optional transform, texture and [`Material`]) plus [`Light`]s, then
//! rendered through a [`Camera`] into a [`FrameSink`].
//!
//! # Example
//!
//! ```ignore
//! use ember_renderer::{Matte, Primitive, Renderer, RenderSettings, Scene, Sphere, Vec3};
//!
//! let settings = RenderSettings::default();
//! let mut scene = Scene::from_settings(&settings);
//! scene.add_primitive(
//!     Primitive::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0))
//!         .with_material(std::sync::Arc::new(Matte::new(0.2, 0.8))),
//! );
//! let mut renderer = Renderer::new(&settings)?;
//! renderer.render(&scene);
//! ```

mod bvh;
mod camera;
mod error;
mod hit;
mod light;
pub mod material;
mod primitive;
mod renderer;
pub mod sampler;
mod scene;
pub mod shapes;
mod texture;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hit::HitRecord;
pub use light::{AreaLight, Light, LightSample};
pub use material::{
    direct_illumination, reflect, Color, Continuation, Emissive, GlossySpecular, Lambertian,
    LightSelection, Material, Matte, NormalMap, NormalMapped, PerfectSpecular, Phong, Reflective,
    Shading, SHADOW_EPSILON,
};
pub use primitive::{Primitive, SurfaceSample};
pub use renderer::{
    clamp_01, color_to_rgb8, render_pixel, render_to, FrameSink, ImageBuffer, RenderStats, Renderer,
};
pub use sampler::Sampler;
pub use scene::{Scene, DEFAULT_MAX_DEPTH};
pub use shapes::{Plane, Shape, ShapeHit, Sphere, Torus, Triangle, TriangleMesh, HIT_EPSILON};
pub use texture::Texture;

/// Re-export math and settings types used throughout the public API
pub use ember_core::{CameraSettings, Projection, RenderSettings, SamplerKind, SamplerSettings, TracerMode};
pub use ember_math::{Aabb, Interval, Ray, Vec2, Vec3};
