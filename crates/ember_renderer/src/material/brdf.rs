//! Reflectance functions shared by the materials.

use std::f32::consts::{FRAC_1_PI, PI};

use super::{reflect, Color};
use crate::sampler::cosine_power_hemisphere;
use crate::Sampler;
use ember_math::{orthonormal_basis, Vec3};

/// Direction `local` expressed in the frame whose `w` axis is `axis`.
fn from_local(axis: Vec3, local: Vec3) -> Vec3 {
    let (u, v, w) = orthonormal_basis(axis);
    u * local.x + v * local.y + w * local.z
}

/// Perfectly diffuse reflection scaled by `k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambertian {
    pub k: f32,
}

impl Lambertian {
    pub fn new(k: f32) -> Self {
        Self { k }
    }

    pub fn f(&self, cd: Color) -> Color {
        cd * (self.k * FRAC_1_PI)
    }

    /// Bihemispherical reflectance, used for the ambient term.
    pub fn rho(&self, cd: Color) -> Color {
        cd * self.k
    }

    /// Bounce direction from the sampler's hemisphere pool and the weight
    /// `f · cos θ / pdf` it carries.
    pub fn sample_f(&self, cd: Color, normal: Vec3, sampler: &mut Sampler) -> Option<(Vec3, Color)> {
        let sp = sampler.sample_hemisphere();
        let e = sampler.hemisphere_exponent();
        let ndotwi = sp.z;
        let pdf = (e + 1.0) / (2.0 * PI) * ndotwi.powf(e);
        if ndotwi <= 0.0 || pdf <= 0.0 {
            return None;
        }

        let wi = from_local(normal, sp);
        Some((wi, self.f(cd) * (ndotwi / pdf)))
    }
}

/// Phong specular lobe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlossySpecular {
    pub ks: f32,
    pub cs: Color,
    pub exp: f32,
}

impl GlossySpecular {
    pub fn new(ks: f32, exp: f32) -> Self {
        Self {
            ks,
            cs: Color::ONE,
            exp,
        }
    }

    /// `ks · cs · max(0, r·wo)^exp` with `r` the mirror of `wi`.
    pub fn f(&self, wi: Vec3, wo: Vec3, normal: Vec3) -> Color {
        let r = -wi + 2.0 * normal.dot(wi) * normal;
        let rdotwo = r.dot(wo);
        if rdotwo > 0.0 {
            self.cs * (self.ks * rdotwo.powf(self.exp))
        } else {
            Color::ZERO
        }
    }

    /// Direction drawn around the mirror direction with a cosine-power lobe.
    /// The lobe's density cancels against `f · cos θ`, leaving `ks · cs`.
    pub fn sample_f(&self, wo: Vec3, normal: Vec3, sampler: &mut Sampler) -> Option<(Vec3, Color)> {
        let mirror = reflect(-wo, normal);
        let sp = cosine_power_hemisphere(sampler.sample_unit_square(), self.exp);

        let mut wi = from_local(mirror, sp);
        if normal.dot(wi) < 0.0 {
            // reflect the sample back above the surface
            wi = from_local(mirror, Vec3::new(-sp.x, -sp.y, sp.z));
        }
        if normal.dot(wi) <= 0.0 {
            return None;
        }

        Some((wi, self.cs * self.ks))
    }
}

/// Mirror reflection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfectSpecular {
    pub kr: f32,
    pub cr: Color,
}

impl PerfectSpecular {
    pub fn new(kr: f32) -> Self {
        Self { kr, cr: Color::ONE }
    }

    /// Mirrored direction for incoming direction `d` and its weight `kr · cr`.
    pub fn sample_f(&self, d: Vec3, normal: Vec3) -> (Vec3, Color) {
        (reflect(d, normal), self.cr * self.kr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::SamplerKind;

    #[test]
    fn test_lambertian_values() {
        let brdf = Lambertian::new(0.5);
        let cd = Color::new(1.0, 0.5, 0.0);
        assert!((brdf.f(cd) - cd * 0.5 / PI).length() < 1e-6);
        assert_eq!(brdf.rho(cd), cd * 0.5);
    }

    #[test]
    fn test_lambertian_cosine_weight_is_albedo() {
        let brdf = Lambertian::new(0.8);
        let cd = Color::new(0.5, 0.5, 1.0);
        let mut sampler = Sampler::new(SamplerKind::MultiJittered, 16, 4, 3);
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();

        for _ in 0..32 {
            if let Some((wi, weight)) = brdf.sample_f(cd, normal, &mut sampler) {
                assert!(wi.dot(normal) > 0.0);
                assert!((weight - cd * 0.8).length() < 1e-4);
            }
        }
    }

    #[test]
    fn test_glossy_peak_at_mirror() {
        let brdf = GlossySpecular::new(0.5, 10.0);
        let wi = Vec3::new(-1.0, 1.0, 0.0).normalize();
        let wo = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((brdf.f(wi, wo, Vec3::Y) - Color::splat(0.5)).length() < 1e-5);

        let off = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert!(brdf.f(wi, off, Vec3::Y).x < 0.5);
    }

    #[test]
    fn test_glossy_samples_above_surface() {
        let brdf = GlossySpecular::new(0.3, 5.0);
        let mut sampler = Sampler::new(SamplerKind::PureRandom, 16, 2, 8);
        let wo = Vec3::new(1.0, 0.2, 0.0).normalize();

        for _ in 0..64 {
            if let Some((wi, weight)) = brdf.sample_f(wo, Vec3::Y, &mut sampler) {
                assert!(wi.y > 0.0);
                assert_eq!(weight, Color::splat(0.3));
            }
        }
    }

    #[test]
    fn test_perfect_specular() {
        let brdf = PerfectSpecular::new(0.75);
        let (wi, weight) = brdf.sample_f(Vec3::new(0.0, -1.0, 1.0), Vec3::Y);
        assert_eq!(wi, Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(weight, Color::splat(0.75));
    }
}
