//! Matte (Lambertian + ambient) material.

use super::{direct_illumination, Lambertian, LightSelection, Material, Shading};
use crate::{HitRecord, Sampler, Scene};
use ember_math::Ray;

/// Diffuse surface with an ambient term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matte {
    pub ambient: Lambertian,
    pub diffuse: Lambertian,
}

impl Matte {
    /// - `ka`: ambient reflection coefficient
    /// - `kd`: diffuse reflection coefficient
    pub fn new(ka: f32, kd: f32) -> Self {
        Self {
            ambient: Lambertian::new(ka),
            diffuse: Lambertian::new(kd),
        }
    }

    fn direct(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler, selection: LightSelection) -> Shading {
        let cd = hit.color;
        let ambient = self.ambient.rho(cd) * scene.ambient_radiance();
        let f = self.diffuse.f(cd);
        let direct = direct_illumination(hit, scene, sampler, selection, |_| f);
        Shading::local(ambient + direct)
    }
}

impl Material for Matte {
    fn shade(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler) -> Shading {
        self.direct(hit, scene, sampler, LightSelection::Deterministic)
    }

    fn area_light_shade(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler) -> Shading {
        self.direct(hit, scene, sampler, LightSelection::All)
    }

    fn path_shade(&self, hit: &HitRecord, _scene: &Scene, sampler: &mut Sampler) -> Shading {
        match self.diffuse.sample_f(hit.color, hit.normal, sampler) {
            Some((wi, weight)) => Shading::absorbed().continue_with(Ray::new(hit.point, wi), weight),
            None => Shading::absorbed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::Light;
    use crate::shapes::Sphere;
    use crate::{Color, Primitive};
    use ember_core::SamplerKind;
    use ember_math::Vec3;
    use std::f32::consts::PI;
    use std::sync::Arc;

    fn lit_sphere_scene(light: Light) -> Scene {
        let mut scene = Scene::new();
        scene.add_primitive(
            Primitive::new(Sphere::new(Vec3::ZERO, 1.0))
                .with_color(Color::ONE)
                .with_material(Arc::new(Matte::new(0.25, 1.0))),
        );
        scene.add_light(light);
        scene.add_light(Light::ambient(Color::ONE, 1.0));
        scene
    }

    #[test]
    fn test_matte_lambert_cosine() {
        let scene = lit_sphere_scene(Light::point(Vec3::new(0.0, 10.0, 0.0), Color::ONE, PI));
        let mut sampler = Sampler::new(SamplerKind::Regular, 1, 1, 0);

        // Straight down onto the top: N·L = 1
        let top = scene.hit_objects(&Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y));
        let shaded = Matte::new(0.25, 1.0).shade(&top, &scene, &mut sampler);
        assert!((shaded.radiance - Color::splat(1.25)).length() < 1e-4);
        assert!(shaded.continuation.is_none());
    }

    #[test]
    fn test_matte_unlit_side_is_ambient_only() {
        let scene = lit_sphere_scene(Light::point(Vec3::new(0.0, 10.0, 0.0), Color::ONE, PI));
        let mut sampler = Sampler::new(SamplerKind::Regular, 1, 1, 0);

        let bottom = scene.hit_objects(&Ray::new(Vec3::new(0.0, -5.0, 0.0), Vec3::Y));
        let shaded = Matte::new(0.25, 1.0).shade(&bottom, &scene, &mut sampler);
        assert!((shaded.radiance - Color::splat(0.25)).length() < 1e-5);
    }

    #[test]
    fn test_matte_path_bounce() {
        let scene = lit_sphere_scene(Light::point(Vec3::new(0.0, 10.0, 0.0), Color::ONE, PI));
        let mut sampler = Sampler::new(SamplerKind::MultiJittered, 16, 4, 7);

        let top = scene.hit_objects(&Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y));
        let shaded = Matte::new(0.25, 0.5).path_shade(&top, &scene, &mut sampler);
        assert_eq!(shaded.radiance, Color::ZERO);

        let next = shaded.continuation.unwrap();
        assert!(next.ray.direction.y > 0.0);
        assert!((next.weight - Color::splat(0.5)).length() < 1e-4);
    }
}
