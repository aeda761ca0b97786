//! Reflective material: Phong shading plus a mirror continuation.

use super::{LightSelection, Material, PerfectSpecular, Phong, Shading};
use crate::{Color, HitRecord, Sampler, Scene};
use ember_math::Ray;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflective {
    pub phong: Phong,
    pub reflection: PerfectSpecular,
}

impl Reflective {
    /// Phong coefficients plus `kr`, the fraction of the mirrored radiance kept.
    pub fn new(ka: f32, kd: f32, ks: f32, exp: f32, kr: f32) -> Self {
        Self {
            phong: Phong::new(ka, kd, ks, exp),
            reflection: PerfectSpecular::new(kr),
        }
    }

    /// A pure mirror with reflectivity `kr`.
    pub fn mirror(kr: f32) -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0, kr)
    }

    /// Tint the reflection (white by default).
    pub fn with_reflection_color(mut self, cr: Color) -> Self {
        self.reflection.cr = cr;
        self
    }

    fn mirrored(&self, hit: &HitRecord, local: Color) -> Shading {
        let (wi, weight) = self.reflection.sample_f(hit.ray.direction.normalize_or_zero(), hit.normal);
        Shading::local(local).continue_with(Ray::new(hit.point, wi), weight)
    }
}

impl Material for Reflective {
    fn shade(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler) -> Shading {
        let local = self.phong.direct(hit, scene, sampler, LightSelection::Deterministic);
        self.mirrored(hit, local)
    }

    fn area_light_shade(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler) -> Shading {
        let local = self.phong.direct(hit, scene, sampler, LightSelection::All);
        self.mirrored(hit, local)
    }

    /// Paths only follow the mirror direction.
    fn path_shade(&self, hit: &HitRecord, _scene: &Scene, _sampler: &mut Sampler) -> Shading {
        self.mirrored(hit, Color::ZERO)
    }
}
