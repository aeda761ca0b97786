//! Materials: how a surface turns incident light into outgoing radiance.
//!
//! Every material answers once per tracer mode. A shading call returns the
//! radiance leaving the surface toward the viewer plus, optionally, one
//! continuation ray whose traced radiance is scaled by a weight. The scene
//! follows continuations iteratively instead of recursing.

mod brdf;
mod emissive;
mod matte;
mod normal_map;
mod phong;
mod reflective;

pub use brdf::{GlossySpecular, Lambertian, PerfectSpecular};
pub use emissive::Emissive;
pub use matte::Matte;
pub use normal_map::{NormalMap, NormalMapped};
pub use phong::Phong;
pub use reflective::Reflective;

use std::fmt;

use crate::{HitRecord, Sampler, Scene};
use ember_math::{Ray, Vec3};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Offset keeping shadow rays from stopping on the light's own surface.
pub const SHADOW_EPSILON: f32 = 1e-3;

/// A ray to trace next and the factor its radiance is scaled by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Continuation {
    pub ray: Ray,
    pub weight: Color,
}

/// Outcome of shading one hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    /// Radiance leaving the surface toward the viewer
    pub radiance: Color,
    pub continuation: Option<Continuation>,
}

impl Shading {
    pub fn local(radiance: Color) -> Self {
        Self {
            radiance,
            continuation: None,
        }
    }

    /// Nothing leaves the surface and nothing continues.
    pub fn absorbed() -> Self {
        Self::local(Color::ZERO)
    }

    pub fn continue_with(mut self, ray: Ray, weight: Color) -> Self {
        self.continuation = Some(Continuation { ray, weight });
        self
    }
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Materials read the surface color from `hit.color`, so one material can be
/// shared by primitives of different colors.
pub trait Material: Send + Sync + fmt::Debug {
    /// Whitted shading: deterministic lights plus specular continuation.
    fn shade(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler) -> Shading;

    /// Direct lighting from every light, area lights by Monte Carlo estimate.
    fn area_light_shade(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler) -> Shading;

    /// One step of a random walk: emitted radiance and a sampled bounce.
    fn path_shade(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler) -> Shading;

    /// Radiance emitted from the front face.
    fn emission(&self) -> Color {
        Color::ZERO
    }
}

/// Which lights take part in direct illumination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightSelection {
    /// Ambient, directional and point lights
    Deterministic,
    /// Every light, area lights included
    All,
}

/// Sum of `f(wi) · Li · G · cos θi / pdf` over the selected lights, with
/// shadow rays for lights that cast shadows.
///
/// Ambient light is not included; materials add their own ambient term.
pub fn direct_illumination<F>(
    hit: &HitRecord,
    scene: &Scene,
    sampler: &mut Sampler,
    selection: LightSelection,
    f: F,
) -> Color
where
    F: Fn(Vec3) -> Color,
{
    let mut radiance = Color::ZERO;

    for light in scene.lights() {
        if selection == LightSelection::Deterministic && !light.is_deterministic() {
            continue;
        }

        let Some(sample) = light.sample(hit.point, sampler) else {
            continue;
        };

        let ndotwi = hit.normal.dot(sample.direction);
        if ndotwi <= 0.0 || sample.radiance == Color::ZERO || sample.pdf <= 0.0 {
            continue;
        }

        if light.casts_shadows() {
            let shadow_ray = Ray::new(hit.point, sample.direction);
            if scene.in_shadow(&shadow_ray, sample.distance - SHADOW_EPSILON) {
                continue;
            }
        }

        radiance += f(sample.direction) * sample.radiance * (sample.geometry * ndotwi / sample.pdf);
    }

    radiance
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
