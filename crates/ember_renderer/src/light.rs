//! Light sources.
//!
//! Ambient, directional and point lights are deterministic. Area lights draw
//! a fresh point on their emitter for every [`Light::sample`] call, and the
//! returned [`LightSample`] carries everything the estimator needs.

use std::sync::Arc;

use crate::error::{RenderError, RenderResult};
use crate::{Color, Primitive, Sampler};
use ember_math::Vec3;

/// One draw of incident light at a shading point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit direction from the shading point toward the light
    pub direction: Vec3,
    /// Point on the light (at infinity for directional lights)
    pub point: Vec3,
    /// Light surface normal at `point` (zero for non-area lights)
    pub normal: Vec3,
    /// Radiance arriving along `direction`
    pub radiance: Color,
    /// Distance to `point`; infinite for directional lights
    pub distance: f32,
    /// Geometry factor `cos θ_light / d²` (1 for non-area lights)
    pub geometry: f32,
    /// Density of the draw (1 for non-area lights)
    pub pdf: f32,
}

/// Light emitted by a primitive's surface.
#[derive(Debug, Clone)]
pub struct AreaLight {
    emitter: Arc<Primitive>,
    radiance: Color,
    casts_shadows: bool,
}

impl AreaLight {
    /// Wrap an emitter; its material's emission becomes the light's radiance.
    ///
    /// Fails for shapes without surface sampling (planes, tori).
    pub fn new(emitter: Arc<Primitive>) -> RenderResult<Self> {
        if emitter.area().is_none() {
            return Err(RenderError::UnsupportedEmitter(emitter.shape().name()));
        }

        let radiance = emitter
            .material()
            .map_or(Color::ZERO, |m| m.emission());
        if radiance == Color::ZERO {
            log::warn!("Area light emitter ({}) emits no radiance", emitter.shape().name());
        }

        Ok(Self {
            emitter,
            radiance,
            casts_shadows: true,
        })
    }

    pub fn emitter(&self) -> &Arc<Primitive> {
        &self.emitter
    }

    fn sample(&self, point: Vec3, sampler: &mut Sampler) -> Option<LightSample> {
        let s = self.emitter.sample_surface(sampler)?;
        let to_light = s.point - point;
        let d2 = to_light.length_squared();
        if d2 <= 0.0 {
            return None;
        }

        let distance = d2.sqrt();
        let direction = to_light / distance;
        let cos_light = -s.normal.dot(direction);
        let (radiance, geometry) = if cos_light > 0.0 {
            (self.radiance, cos_light / d2)
        } else {
            (Color::ZERO, 0.0)
        };

        Some(LightSample {
            direction,
            point: s.point,
            normal: s.normal,
            radiance,
            distance,
            geometry,
            pdf: s.pdf,
        })
    }
}

#[derive(Debug, Clone)]
pub enum Light {
    Ambient {
        color: Color,
        ls: f32,
    },
    Directional {
        /// Unit direction toward the light
        direction: Vec3,
        color: Color,
        ls: f32,
        casts_shadows: bool,
    },
    Point {
        position: Vec3,
        color: Color,
        ls: f32,
        casts_shadows: bool,
    },
    Area(AreaLight),
}

impl Light {
    pub fn ambient(color: Color, ls: f32) -> Self {
        Light::Ambient { color, ls }
    }

    /// Light arriving from `direction` (pointing toward the light).
    pub fn directional(direction: Vec3, color: Color, ls: f32) -> Self {
        Light::Directional {
            direction: direction.normalize_or_zero(),
            color,
            ls,
            casts_shadows: true,
        }
    }

    pub fn point(position: Vec3, color: Color, ls: f32) -> Self {
        Light::Point {
            position,
            color,
            ls,
            casts_shadows: true,
        }
    }

    pub fn area(emitter: Arc<Primitive>) -> RenderResult<Self> {
        AreaLight::new(emitter).map(Light::Area)
    }

    /// Enable or disable shadow rays for this light. Ambient light never casts shadows.
    pub fn with_shadows(mut self, enabled: bool) -> Self {
        match &mut self {
            Light::Ambient { .. } => {}
            Light::Directional { casts_shadows, .. } | Light::Point { casts_shadows, .. } => {
                *casts_shadows = enabled
            }
            Light::Area(area) => area.casts_shadows = enabled,
        }
        self
    }

    pub fn casts_shadows(&self) -> bool {
        match self {
            Light::Ambient { .. } => false,
            Light::Directional { casts_shadows, .. } | Light::Point { casts_shadows, .. } => *casts_shadows,
            Light::Area(area) => area.casts_shadows,
        }
    }

    /// False for lights whose samples are random.
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, Light::Area(_))
    }

    /// Uniform radiance contributed everywhere (ambient lights only).
    pub fn ambient_radiance(&self) -> Color {
        match self {
            Light::Ambient { color, ls } => *color * *ls,
            _ => Color::ZERO,
        }
    }

    /// Incident light at `point`, or `None` for ambient lights and for
    /// emitters that cannot be sampled from here.
    pub fn sample(&self, point: Vec3, sampler: &mut Sampler) -> Option<LightSample> {
        match self {
            Light::Ambient { .. } => None,
            Light::Directional {
                direction,
                color,
                ls,
                ..
            } => Some(LightSample {
                direction: *direction,
                point: point + *direction * f32::MAX.sqrt(),
                normal: Vec3::ZERO,
                radiance: *color * *ls,
                distance: f32::INFINITY,
                geometry: 1.0,
                pdf: 1.0,
            }),
            Light::Point {
                position,
                color,
                ls,
                ..
            } => {
                let to_light = *position - point;
                let distance = to_light.length();
                if distance <= 0.0 {
                    return None;
                }
                Some(LightSample {
                    direction: to_light / distance,
                    point: *position,
                    normal: Vec3::ZERO,
                    radiance: *color * *ls,
                    distance,
                    geometry: 1.0,
                    pdf: 1.0,
                })
            }
            Light::Area(area) => area.sample(point, sampler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Emissive;
    use crate::shapes::{Plane, Sphere, Triangle};
    use ember_core::SamplerKind;
    use std::f32::consts::PI;

    fn sampler() -> Sampler {
        Sampler::new(SamplerKind::MultiJittered, 16, 8, 5)
    }

    #[test]
    fn test_point_light_sample() {
        let light = Light::point(Vec3::new(0.0, 4.0, 0.0), Color::new(1.0, 0.5, 0.5), 2.0);
        let s = light.sample(Vec3::ZERO, &mut sampler()).unwrap();

        assert_eq!(s.direction, Vec3::Y);
        assert_eq!(s.distance, 4.0);
        assert_eq!(s.radiance, Color::new(2.0, 1.0, 1.0));
        assert_eq!(s.pdf, 1.0);
        assert!(light.is_deterministic());
        assert!(light.casts_shadows());
    }

    #[test]
    fn test_directional_light_sample() {
        let light = Light::directional(Vec3::new(0.0, 2.0, 0.0), Color::ONE, 1.0).with_shadows(false);
        let s = light.sample(Vec3::new(3.0, 0.0, 1.0), &mut sampler()).unwrap();
        assert_eq!(s.direction, Vec3::Y);
        assert!(s.distance.is_infinite());
        assert!(!light.casts_shadows());
    }

    #[test]
    fn test_ambient_has_no_direction() {
        let light = Light::ambient(Color::ONE, 0.5);
        assert!(light.sample(Vec3::ZERO, &mut sampler()).is_none());
        assert_eq!(light.ambient_radiance(), Color::splat(0.5));
        assert!(!light.casts_shadows());
    }

    #[test]
    fn test_area_light_rejects_plane_and_torus() {
        let plane = Arc::new(Primitive::new(Plane::new(Vec3::Y, 0.0)));
        assert!(matches!(
            Light::area(plane),
            Err(RenderError::UnsupportedEmitter("plane"))
        ));

        let torus = Arc::new(Primitive::new(crate::shapes::Torus::new(1.0, 0.2)));
        assert!(matches!(
            Light::area(torus),
            Err(RenderError::UnsupportedEmitter("torus"))
        ));
    }

    #[test]
    fn test_area_light_sphere_samples() {
        let emitter = Arc::new(
            Primitive::new(Sphere::new(Vec3::new(0.0, 5.0, 0.0), 1.0))
                .with_material(Arc::new(Emissive::new(3.0, Color::ONE))),
        );
        let light = Light::area(emitter).unwrap();
        assert!(!light.is_deterministic());

        let mut sampler = sampler();
        let mut facing = 0;
        for _ in 0..64 {
            let s = light.sample(Vec3::ZERO, &mut sampler).unwrap();
            assert!((s.pdf - 1.0 / (4.0 * PI)).abs() < 1e-6);
            assert!((s.direction.length() - 1.0).abs() < 1e-5);
            if s.radiance != Color::ZERO {
                facing += 1;
                assert_eq!(s.radiance, Color::splat(3.0));
                assert!(s.geometry > 0.0);
                // points facing the origin lie on the lower half
                assert!(s.point.y < 5.0 + 1e-4);
            }
        }
        assert!(facing > 0 && facing < 64);
    }

    #[test]
    fn test_area_light_one_sided_triangle() {
        // Facing down toward the origin
        let tri = Triangle::new(
            Vec3::new(-1.0, 2.0, -1.0),
            Vec3::new(1.0, 2.0, -1.0),
            Vec3::new(0.0, 2.0, 1.0),
        );
        assert_eq!(tri.normal(), Vec3::NEG_Y);
        let emitter = Arc::new(Primitive::new(tri).with_material(Arc::new(Emissive::new(1.0, Color::ONE))));
        let light = Light::area(emitter).unwrap();

        let mut sampler = sampler();
        let below = light.sample(Vec3::ZERO, &mut sampler).unwrap();
        assert_eq!(below.radiance, Color::ONE);
        assert!((below.pdf - 0.5).abs() < 1e-6);

        let above = light.sample(Vec3::new(0.0, 4.0, 0.0), &mut sampler).unwrap();
        assert_eq!(above.radiance, Color::ZERO);
    }
}
