//! Phong material: matte plus a glossy specular lobe.

use super::{direct_illumination, GlossySpecular, Lambertian, LightSelection, Material, Shading};
use crate::{Color, HitRecord, Sampler, Scene};
use ember_math::Ray;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phong {
    pub ambient: Lambertian,
    pub diffuse: Lambertian,
    pub specular: GlossySpecular,
}

impl Phong {
    /// - `ka`, `kd`: ambient and diffuse coefficients
    /// - `ks`: specular coefficient
    /// - `exp`: specular exponent (shininess)
    pub fn new(ka: f32, kd: f32, ks: f32, exp: f32) -> Self {
        Self {
            ambient: Lambertian::new(ka),
            diffuse: Lambertian::new(kd),
            specular: GlossySpecular::new(ks, exp),
        }
    }

    /// Tint the highlight (white by default).
    pub fn with_specular_color(mut self, cs: Color) -> Self {
        self.specular.cs = cs;
        self
    }

    /// Ambient plus direct light through the diffuse and specular lobes.
    pub(super) fn direct(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler, selection: LightSelection) -> Color {
        let cd = hit.color;
        let wo = hit.wo();
        let diffuse = self.diffuse.f(cd);
        let ambient = self.ambient.rho(cd) * scene.ambient_radiance();

        ambient
            + direct_illumination(hit, scene, sampler, selection, |wi| {
                diffuse + self.specular.f(wi, wo, hit.normal)
            })
    }
}

impl Material for Phong {
    fn shade(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler) -> Shading {
        Shading::local(self.direct(hit, scene, sampler, LightSelection::Deterministic))
    }

    fn area_light_shade(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler) -> Shading {
        Shading::local(self.direct(hit, scene, sampler, LightSelection::All))
    }

    /// Picks the diffuse or the glossy lobe in proportion to `kd` and `ks`.
    fn path_shade(&self, hit: &HitRecord, _scene: &Scene, sampler: &mut Sampler) -> Shading {
        let total = self.diffuse.k + self.specular.ks;
        if total <= 0.0 {
            return Shading::absorbed();
        }

        let p_diffuse = self.diffuse.k / total;
        let bounce = if sampler.random_f32() < p_diffuse {
            self.diffuse
                .sample_f(hit.color, hit.normal, sampler)
                .map(|(wi, w)| (wi, w / p_diffuse))
        } else {
            self.specular
                .sample_f(hit.wo(), hit.normal, sampler)
                .map(|(wi, w)| (wi, w / (1.0 - p_diffuse)))
        };

        match bounce {
            Some((wi, weight)) => Shading::absorbed().continue_with(Ray::new(hit.point, wi), weight),
            None => Shading::absorbed(),
        }
    }
}
