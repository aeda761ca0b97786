//! Scene primitives: a shape with surface color, material and placement.

use std::sync::Arc;

use crate::material::Material;
use crate::shapes::{Shape, ShapeHit};
use crate::{Color, HitRecord, Sampler, Texture};
use ember_math::{Aabb, Interval, Mat4, Mat4Ext, Ray, Vec3};

/// Object-to-world placement with its inverse kept in step.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    forward: Mat4,
    inverse: Mat4,
}

impl Placement {
    const IDENTITY: Placement = Placement {
        forward: Mat4::IDENTITY,
        inverse: Mat4::IDENTITY,
    };

    /// Apply `m` (with inverse `m_inv`) after the current placement.
    fn then(self, m: Mat4, m_inv: Mat4) -> Self {
        Self {
            forward: m * self.forward,
            inverse: self.inverse * m_inv,
        }
    }
}

/// A point drawn on a primitive's world-space surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub point: Vec3,
    /// Outward unit normal at `point`
    pub normal: Vec3,
    /// Area density of the draw (1 / area)
    pub pdf: f32,
}

/// A shape placed in the scene.
///
/// Primitives start non-orientable; the first `rotate_*`, `translate` or
/// `scale` call attaches a placement and every later call composes onto it
/// in world space.
#[derive(Debug, Clone)]
pub struct Primitive {
    shape: Shape,
    texture: Texture,
    material: Option<Arc<dyn Material>>,
    placement: Option<Placement>,
}

impl Primitive {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            texture: Texture::default(),
            material: None,
            placement: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.texture = Texture::Constant(color);
        self
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = texture;
        self
    }

    pub fn with_material(mut self, material: Arc<dyn Material>) -> Self {
        self.material = Some(material);
        self
    }

    pub fn rotate_x(self, radians: f32) -> Self {
        self.transformed(Mat4::from_rotation_x(radians), Mat4::from_rotation_x(-radians))
    }

    pub fn rotate_y(self, radians: f32) -> Self {
        self.transformed(Mat4::from_rotation_y(radians), Mat4::from_rotation_y(-radians))
    }

    pub fn rotate_z(self, radians: f32) -> Self {
        self.transformed(Mat4::from_rotation_z(radians), Mat4::from_rotation_z(-radians))
    }

    pub fn translate(self, offset: Vec3) -> Self {
        self.transformed(Mat4::from_translation(offset), Mat4::from_translation(-offset))
    }

    /// Scale per axis. Zero components are ignored with a warning.
    pub fn scale(self, factors: Vec3) -> Self {
        if factors.cmpeq(Vec3::ZERO).any() {
            log::warn!("Ignoring degenerate scale {:?} on {}", factors, self.shape.name());
            return self;
        }
        self.transformed(Mat4::from_scale(factors), Mat4::from_scale(factors.recip()))
    }

    pub fn scale_uniform(self, factor: f32) -> Self {
        self.scale(Vec3::splat(factor))
    }

    fn transformed(mut self, m: Mat4, m_inv: Mat4) -> Self {
        let current = self.placement.unwrap_or(Placement::IDENTITY);
        self.placement = Some(current.then(m, m_inv));
        self
    }

    /// True once a transform has been applied.
    pub fn is_orientable(&self) -> bool {
        self.placement.is_some()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn material(&self) -> Option<&Arc<dyn Material>> {
        self.material.as_ref()
    }

    /// Object-to-world matrix (identity when not orientable).
    pub fn transform(&self) -> Mat4 {
        self.placement.map_or(Mat4::IDENTITY, |p| p.forward)
    }

    /// World-to-object matrix (identity when not orientable).
    pub fn inverse_transform(&self) -> Mat4 {
        self.placement.map_or(Mat4::IDENTITY, |p| p.inverse)
    }

    /// The ray in object space. Parameters along it match the world ray.
    pub fn local_ray(&self, ray: &Ray) -> Ray {
        match &self.placement {
            Some(p) => p.inverse.transform_ray(ray),
            None => *ray,
        }
    }

    /// Closest hit within `ray_t` for a world-space ray.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        self.shape.intersect(&self.local_ray(ray), ray_t)
    }

    /// Resolve the full hit record for a hit found by [`Primitive::intersect`].
    pub fn resolve_hit(&self, ray: &Ray, hit: &ShapeHit) -> HitRecord<'_> {
        let local_ray = self.local_ray(ray);
        let local_point = local_ray.at(hit.t);
        let frame = self.shape.surface(local_point, hit);

        let (normal, tangent) = match &self.placement {
            Some(p) => {
                let n = p.inverse.transform_normal(frame.normal).normalize_or_zero();
                let t = p.forward.transform_direction(frame.tangent);
                // shear from non-uniform scale can tilt the tangent off the surface
                let t = (t - n * t.dot(n)).normalize_or_zero();
                (n, t)
            }
            None => (frame.normal, frame.tangent),
        };

        let mut rec = HitRecord {
            hit: true,
            t: hit.t,
            point: ray.at(hit.t),
            local_point,
            normal,
            tangent,
            bitangent: normal.cross(tangent),
            u: frame.uv.x,
            v: frame.uv.y,
            color: self.texture.value(local_point),
            front_face: true,
            ray: *ray,
            local_ray,
            primitive: Some(self),
        };
        rec.set_face_normal(ray, normal);
        rec
    }

    /// World-space bounds; unbounded for planes.
    pub fn bounding_box(&self) -> Aabb {
        let bbox = self.shape.bounding_box();
        match &self.placement {
            Some(p) if bbox != Aabb::UNIVERSE => p.forward.transform_aabb(&bbox),
            _ => bbox,
        }
    }

    /// World-space surface area for shapes that support surface sampling.
    ///
    /// Placements are assumed to be similarity transforms (rotation,
    /// translation, uniform scale); area scales with the square of the scale.
    pub fn area(&self) -> Option<f32> {
        let area = self.shape.area()?;
        let scale = match &self.placement {
            Some(p) => p.forward.determinant().abs().cbrt(),
            None => 1.0,
        };
        Some(area * scale * scale)
    }

    /// Draw a uniform point on the world-space surface.
    pub fn sample_surface(&self, sampler: &mut Sampler) -> Option<SurfaceSample> {
        let area = self.area()?;
        if area <= 0.0 {
            return None;
        }

        let local = self.shape.sample_surface(sampler)?;
        let (point, normal) = match &self.placement {
            Some(p) => (
                p.forward.transform_point3(local.point),
                p.inverse.transform_normal(local.normal).normalize_or_zero(),
            ),
            None => (local.point, local.normal),
        };

        Some(SurfaceSample {
            point,
            normal,
            pdf: 1.0 / area,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Plane, Sphere, Torus, HIT_EPSILON};
    use std::f32::consts::FRAC_PI_2;

    fn forward() -> Interval {
        Interval::new(HIT_EPSILON, f32::INFINITY)
    }

    #[test]
    fn test_plain_primitive_is_not_orientable() {
        let prim = Primitive::new(Sphere::new(Vec3::ZERO, 1.0));
        assert!(!prim.is_orientable());
        assert_eq!(prim.transform(), Mat4::IDENTITY);
    }

    #[test]
    fn test_translated_sphere() {
        let prim = Primitive::new(Sphere::new(Vec3::ZERO, 1.0)).translate(Vec3::new(0.0, 0.0, -5.0));
        assert!(prim.is_orientable());

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = prim.intersect(&ray, forward()).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-5);

        let rec = prim.resolve_hit(&ray, &hit);
        assert!((rec.point - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-5);
        assert!((rec.local_point - Vec3::Z).length() < 1e-5);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
        assert!(rec.front_face);
    }

    #[test]
    fn test_transforms_compose_in_world_space() {
        // Translate then rotate: the offset itself swings around Y
        let prim = Primitive::new(Sphere::new(Vec3::ZERO, 1.0))
            .translate(Vec3::new(0.0, 0.0, -5.0))
            .rotate_y(FRAC_PI_2);
        let center = prim.transform().transform_point3(Vec3::ZERO);
        assert!((center - Vec3::new(-5.0, 0.0, 0.0)).length() < 1e-5);

        let product = prim.transform() * prim.inverse_transform();
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn test_scaled_sphere_normals() {
        // An ellipsoid stretched along X; its normal at the +X tip is still +X
        let prim = Primitive::new(Sphere::new(Vec3::ZERO, 1.0)).scale(Vec3::new(3.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::NEG_X);

        let hit = prim.intersect(&ray, forward()).unwrap();
        assert!((hit.t - 7.0).abs() < 1e-4);

        let rec = prim.resolve_hit(&ray, &hit);
        assert!((rec.normal - Vec3::X).length() < 1e-4);
        assert!(rec.tangent.dot(rec.normal).abs() < 1e-4);
    }

    #[test]
    fn test_rotated_torus_stands_up() {
        let prim = Primitive::new(Torus::new(1.0, 0.25)).rotate_x(FRAC_PI_2);
        // After rotation the ring lies in the XY plane; the hole faces Z
        let through_hole = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(prim.intersect(&through_hole, forward()).is_none());

        let onto_rim = Ray::new(Vec3::new(0.0, 1.0, 5.0), Vec3::NEG_Z);
        let hit = prim.intersect(&onto_rim, forward()).unwrap();
        assert!((hit.t - 4.75).abs() < 1e-3);
    }

    #[test]
    fn test_texture_follows_local_point() {
        let prim = Primitive::new(Sphere::new(Vec3::ZERO, 1.0))
            .with_texture(Texture::procedural(|p| Color::splat(p.z)))
            .translate(Vec3::new(0.0, 0.0, -5.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = prim.intersect(&ray, forward()).unwrap();
        let rec = prim.resolve_hit(&ray, &hit);
        assert!((rec.color - Color::ONE).length() < 1e-4);
    }

    #[test]
    fn test_back_face_from_inside() {
        let prim = Primitive::new(Sphere::new(Vec3::ZERO, 2.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let hit = prim.intersect(&ray, forward()).unwrap();
        let rec = prim.resolve_hit(&ray, &hit);
        assert!(!rec.front_face);
        assert!((rec.normal - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_plane_bounds_stay_unbounded() {
        let prim = Primitive::new(Plane::new(Vec3::Y, 0.0)).rotate_z(0.3);
        assert_eq!(prim.bounding_box(), Aabb::UNIVERSE);
        assert!(prim.area().is_none());
    }

    #[test]
    fn test_scaled_area_and_samples() {
        let prim = Primitive::new(Sphere::new(Vec3::ZERO, 1.0))
            .scale_uniform(2.0)
            .translate(Vec3::new(0.0, 3.0, 0.0));
        let area = prim.area().unwrap();
        assert!((area - 16.0 * std::f32::consts::PI).abs() < 1e-3);

        let mut sampler = Sampler::new(ember_core::SamplerKind::MultiJittered, 16, 4, 11);
        for _ in 0..32 {
            let s = prim.sample_surface(&mut sampler).unwrap();
            let offset = s.point - Vec3::new(0.0, 3.0, 0.0);
            assert!((offset.length() - 2.0).abs() < 1e-4);
            assert!((s.normal - offset / 2.0).length() < 1e-4);
            assert!((s.pdf - 1.0 / area).abs() < 1e-6);
        }
    }
}
