//! Scene: primitives, lights, closest-hit search and the trace loop.

use std::sync::Arc;

use crate::light::Light;
use crate::material::Shading;
use crate::shapes::HIT_EPSILON;
use crate::{Color, HitRecord, Primitive, Sampler};
use ember_core::{RenderSettings, TracerMode};
use ember_math::{Interval, Ray};

/// Default recursion limit for scenes built without settings.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Everything a render reads: geometry, lights and tracing parameters.
///
/// Built up before rendering and only read while tracing.
#[derive(Debug, Clone)]
pub struct Scene {
    primitives: Vec<Arc<Primitive>>,
    lights: Vec<Light>,
    background: Color,
    max_depth: u32,
    tracer: TracerMode,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            primitives: Vec::new(),
            lights: Vec::new(),
            background: Color::ZERO,
            max_depth: DEFAULT_MAX_DEPTH,
            tracer: TracerMode::default(),
        }
    }

    /// Empty scene with tracer mode, depth and background from `settings`.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        let mut scene = Self::new();
        scene.set_tracer(settings.tracer);
        scene.set_max_depth(settings.max_depth);
        scene.set_background(settings.background);
        scene
    }

    /// Add a primitive, returning a shared handle (for use as an area-light emitter).
    pub fn add_primitive(&mut self, primitive: Primitive) -> Arc<Primitive> {
        let shared = Arc::new(primitive);
        self.primitives.push(Arc::clone(&shared));
        shared
    }

    pub fn add_shared_primitive(&mut self, primitive: Arc<Primitive>) {
        self.primitives.push(primitive);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn set_max_depth(&mut self, max_depth: u32) {
        self.max_depth = max_depth;
    }

    pub fn set_tracer(&mut self, tracer: TracerMode) {
        self.tracer = tracer;
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    pub fn primitives(&self) -> &[Arc<Primitive>] {
        &self.primitives
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn tracer(&self) -> TracerMode {
        self.tracer
    }

    /// Summed radiance of all ambient lights.
    pub fn ambient_radiance(&self) -> Color {
        self.lights.iter().map(Light::ambient_radiance).sum()
    }

    /// Closest hit over all primitives.
    ///
    /// On a miss the record carries the background color. On a hit it holds
    /// the winning primitive's resolved surface data and intrinsic color;
    /// material shading happens in [`Scene::shade`].
    pub fn hit_objects(&self, ray: &Ray) -> HitRecord<'_> {
        let mut closest: Option<(&Primitive, crate::shapes::ShapeHit)> = None;
        let mut tmin = f32::INFINITY;

        for primitive in &self.primitives {
            if let Some(hit) = primitive.intersect(ray, Interval::new(HIT_EPSILON, tmin)) {
                tmin = hit.t;
                closest = Some((primitive.as_ref(), hit));
            }
        }

        match closest {
            Some((primitive, hit)) => primitive.resolve_hit(ray, &hit),
            None => HitRecord::miss(*ray, self.background),
        }
    }

    /// True if anything blocks `ray` before `max_distance`.
    pub fn in_shadow(&self, ray: &Ray, max_distance: f32) -> bool {
        let ray_t = Interval::new(HIT_EPSILON, max_distance);
        if ray_t.size() <= 0.0 {
            return false;
        }
        self.primitives
            .iter()
            .any(|p| p.intersect(ray, ray_t).is_some())
    }

    /// Shade a hit with the active tracer mode.
    ///
    /// Primitives without a material show their intrinsic color.
    pub fn shade(&self, hit: &HitRecord, sampler: &mut Sampler) -> Shading {
        if !hit.hit {
            return Shading::local(self.background);
        }

        match hit.primitive.and_then(|p| p.material()) {
            None => Shading::local(hit.color),
            Some(material) => match self.tracer {
                TracerMode::Whitted => material.shade(hit, self, sampler),
                TracerMode::AreaLighting => material.area_light_shade(hit, self, sampler),
                TracerMode::PathTracer => material.path_shade(hit, self, sampler),
            },
        }
    }

    /// Radiance arriving along `ray`.
    ///
    /// Every step increments the ray's depth; a ray whose depth exceeds the
    /// scene's maximum returns the background. Continuations inherit the
    /// depth, so the loop runs at most `max_depth` hit evaluations.
    pub fn trace_ray(&self, ray: &Ray, sampler: &mut Sampler) -> Color {
        let mut ray = *ray;
        let mut weight = Color::ONE;
        let mut radiance = Color::ZERO;

        loop {
            ray.depth += 1;
            if ray.depth > self.max_depth {
                return radiance + weight * self.background;
            }

            let hit = self.hit_objects(&ray);
            let shading = self.shade(&hit, sampler);
            radiance += weight * shading.radiance;

            match shading.continuation {
                Some(next) => {
                    weight *= next.weight;
                    if weight == Color::ZERO {
                        return radiance;
                    }
                    ray = Ray::with_depth(next.ray.origin, next.ray.direction, ray.depth);
                }
                None => return radiance,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Emissive, Matte, Reflective};
    use crate::shapes::{Plane, Sphere, Triangle};
    use ember_core::SamplerKind;
    use ember_math::Vec3;

    fn sampler() -> Sampler {
        Sampler::new(SamplerKind::Regular, 1, 1, 0)
    }

    /// Two facing mirrors with a ray bouncing between them forever.
    fn hall_of_mirrors(max_depth: u32) -> Scene {
        let mirror: Arc<dyn crate::material::Material> = Arc::new(Reflective::mirror(0.5));
        let mut scene = Scene::new();
        scene.add_primitive(Primitive::new(Plane::new(Vec3::Z, -1.0)).with_material(mirror.clone()));
        scene.add_primitive(Primitive::new(Plane::new(Vec3::Z, 1.0)).with_material(mirror));
        scene.set_background(Color::new(0.8, 0.4, 0.2));
        scene.set_max_depth(max_depth);
        scene
    }

    #[test]
    fn test_hit_objects_keeps_closest() {
        let mut scene = Scene::new();
        scene.add_primitive(Primitive::new(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0)).with_color(Color::X));
        scene.add_primitive(Primitive::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0)).with_color(Color::Y));
        scene.add_primitive(Primitive::new(Sphere::new(Vec3::new(0.0, 0.0, -20.0), 1.0)).with_color(Color::Z));

        let hit = scene.hit_objects(&Ray::new(Vec3::ZERO, Vec3::NEG_Z));
        assert!(hit.hit);
        assert!((hit.t - 4.0).abs() < 1e-5);
        assert_eq!(hit.color, Color::Y);
    }

    #[test]
    fn test_miss_returns_background() {
        let mut scene = Scene::new();
        scene.set_background(Color::new(0.1, 0.2, 0.3));
        scene.add_primitive(Primitive::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0)));

        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let hit = scene.hit_objects(&ray);
        assert!(!hit.hit);
        assert_eq!(hit.color, Color::new(0.1, 0.2, 0.3));
        assert_eq!(scene.trace_ray(&ray, &mut sampler()), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_material_less_primitive_shows_color() {
        let mut scene = Scene::new();
        scene.add_primitive(Primitive::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0)).with_color(Color::X));
        let c = scene.trace_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &mut sampler());
        assert_eq!(c, Color::X);
    }

    #[test]
    fn test_hall_of_mirrors_attenuates_to_depth() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        for n in 0..8 {
            let scene = hall_of_mirrors(n);
            let c = scene.trace_ray(&ray, &mut sampler());
            let expected = scene.background() * 0.5f32.powi(n as i32);
            assert!((c - expected).length() < 1e-6, "depth {}: {:?} vs {:?}", n, c, expected);
        }
    }

    #[test]
    fn test_zero_depth_is_background() {
        let scene = hall_of_mirrors(0);
        let c = scene.trace_ray(&Ray::new(Vec3::ZERO, Vec3::Z), &mut sampler());
        assert_eq!(c, scene.background());
    }

    #[test]
    fn test_shadow_blocks_point_light() {
        let mut scene = Scene::new();
        let matte: Arc<dyn crate::material::Material> = Arc::new(Matte::new(0.0, 1.0));
        scene.add_primitive(Primitive::new(Plane::new(Vec3::Y, 0.0)).with_material(matte.clone()));
        scene.add_primitive(Primitive::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.5)).with_material(matte));
        scene.add_light(Light::point(Vec3::new(0.0, 5.0, 0.0), Color::ONE, 1.0));

        let under = Ray::new(Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, -1.0, -1.0));
        assert_eq!(scene.trace_ray(&under, &mut sampler()), Color::ZERO);

        let open = Ray::new(Vec3::new(3.0, 1.0, 1.0), Vec3::new(0.0, -1.0, -1.0));
        assert!(scene.trace_ray(&open, &mut sampler()).x > 0.0);
    }

    #[test]
    fn test_shadow_toggle() {
        let mut scene = Scene::new();
        let matte: Arc<dyn crate::material::Material> = Arc::new(Matte::new(0.0, 1.0));
        scene.add_primitive(Primitive::new(Plane::new(Vec3::Y, 0.0)).with_material(matte.clone()));
        scene.add_primitive(Primitive::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.5)).with_material(matte));
        scene.add_light(Light::point(Vec3::new(0.0, 5.0, 0.0), Color::ONE, 1.0).with_shadows(false));

        let under = Ray::new(Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, -1.0, -1.0));
        assert!(scene.trace_ray(&under, &mut sampler()).x > 0.0);
    }

    #[test]
    fn test_path_tracer_sees_emitter_directly() {
        let mut scene = Scene::new();
        scene.set_tracer(TracerMode::PathTracer);
        scene.add_primitive(
            Primitive::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0))
                .with_material(Arc::new(Emissive::new(2.0, Color::ONE))),
        );
        let c = scene.trace_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &mut sampler());
        assert_eq!(c, Color::splat(2.0));
    }

    #[test]
    fn test_path_tracer_under_white_sky() {
        // A diffuse floor under a uniform sky of radiance 1 converges to its albedo
        let mut scene = Scene::new();
        scene.set_tracer(TracerMode::PathTracer);
        scene.set_background(Color::ONE);
        scene.set_max_depth(2);
        scene.add_primitive(
            Primitive::new(Plane::new(Vec3::Y, 0.0))
                .with_color(Color::ONE)
                .with_material(Arc::new(Matte::new(0.0, 0.5))),
        );

        let mut sampler = Sampler::new(SamplerKind::MultiJittered, 16, 4, 1);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, -1.0, 0.1));
        let n = 64;
        let sum: Color = (0..n).map(|_| scene.trace_ray(&ray, &mut sampler)).sum();
        let mean = sum / n as f32;
        assert!((mean - Color::splat(0.5)).length() < 1e-4, "{:?}", mean);
    }

    #[test]
    fn test_area_lighting_emitter_lights_floor() {
        let mut scene = Scene::new();
        scene.set_tracer(TracerMode::AreaLighting);
        scene.add_primitive(
            Primitive::new(Plane::new(Vec3::Y, 0.0))
                .with_color(Color::ONE)
                .with_material(Arc::new(Matte::new(0.0, 1.0))),
        );
        let emitter = scene.add_primitive(
            Primitive::new(Sphere::new(Vec3::new(0.0, 3.0, 0.0), 0.5))
                .with_material(Arc::new(Emissive::new(4.0, Color::ONE))),
        );
        scene.add_light(Light::area(emitter).unwrap());

        let mut sampler = Sampler::new(SamplerKind::MultiJittered, 16, 4, 3);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, -1.0, -1.0));
        let lit: Color = (0..32).map(|_| scene.trace_ray(&ray, &mut sampler)).sum();
        assert!(lit.x > 0.0);

        // Whitted mode ignores area lights
        scene.set_tracer(TracerMode::Whitted);
        assert_eq!(scene.trace_ray(&ray, &mut sampler), Color::ZERO);
    }

    /// White Lambertian floor at y = 0 lit only by `emitter`.
    fn floor_under(emitter: Primitive) -> Scene {
        let mut scene = Scene::new();
        scene.set_tracer(TracerMode::AreaLighting);
        scene.add_primitive(
            Primitive::new(Plane::new(Vec3::Y, 0.0))
                .with_color(Color::ONE)
                .with_material(Arc::new(Matte::new(0.0, 1.0))),
        );
        let emitter = scene.add_primitive(emitter);
        scene.add_light(Light::area(emitter).unwrap());
        scene
    }

    fn mean_radiance(scene: &Scene, ray: &Ray, sampler: &mut Sampler, n: usize) -> f32 {
        let sum: f64 = (0..n).map(|_| scene.trace_ray(ray, sampler).x as f64).sum();
        (sum / n as f64) as f32
    }

    #[test]
    fn test_sphere_emitter_matches_analytic_irradiance() {
        // A sphere of radius R and radiance Le at distance D gives a white
        // Lambertian floor directly below it radiance Le (R / D)^2.
        let (radius, distance, le) = (0.5, 3.0, 4.0);
        let scene = floor_under(
            Primitive::new(Sphere::new(Vec3::new(0.0, distance, 0.0), radius))
                .with_material(Arc::new(Emissive::new(le, Color::ONE))),
        );

        let mut sampler = Sampler::new(SamplerKind::MultiJittered, 64, 64, 11);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let mean = mean_radiance(&scene, &ray, &mut sampler, 64 * 1000);

        let expected = le * (radius / distance) * (radius / distance);
        assert!(
            (mean - expected).abs() < 0.02 * expected,
            "mean {} expected {}",
            mean,
            expected
        );
    }

    #[test]
    fn test_triangle_emitter_matches_small_source_limit() {
        // Downward-facing triangle of area 0.005 one unit above the floor:
        // radiance is close to Le A / (pi D^2).
        let le = 60.0;
        let triangle = Triangle::new(
            Vec3::new(-0.05, 1.0, -0.05),
            Vec3::new(0.05, 1.0, -0.05),
            Vec3::new(0.0, 1.0, 0.05),
        );
        assert!((triangle.area() - 0.005).abs() < 1e-6);
        let scene = floor_under(Primitive::new(triangle).with_material(Arc::new(Emissive::new(le, Color::ONE))));

        let mut sampler = Sampler::new(SamplerKind::MultiJittered, 64, 16, 12);
        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Y);
        let mean = mean_radiance(&scene, &ray, &mut sampler, 64 * 100);

        let expected = le * 0.005 / std::f32::consts::PI;
        assert!(
            (mean - expected).abs() < 0.02 * expected,
            "mean {} expected {}",
            mean,
            expected
        );
    }
}
