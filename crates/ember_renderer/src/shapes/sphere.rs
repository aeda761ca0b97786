//! Sphere shape.

use super::{ShapeHit, SurfaceFrame, SurfacePoint};
use ember_math::{Aabb, Interval, Ray, Vec2, Vec3};
use std::f32::consts::PI;

/// A sphere given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// UV for a point on the unit sphere: u around Y from +X, v down from +Y.
    fn sphere_uv(p: Vec3) -> Vec2 {
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;
        Vec2::new(phi / (2.0 * PI), theta / PI)
    }

    /// Nearer root first, then the farther one; only roots inside `ray_t` count.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        let l = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let b = 2.0 * l.dot(ray.direction);
        let c = l.length_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let e = discriminant.sqrt();
        let denom = 2.0 * a;

        let t = (-b - e) / denom;
        if ray_t.surrounds(t) {
            return Some(ShapeHit::at(t));
        }

        let t = (-b + e) / denom;
        if ray_t.surrounds(t) {
            return Some(ShapeHit::at(t));
        }

        None
    }

    pub fn surface(&self, p: Vec3) -> SurfaceFrame {
        let normal = ((p - self.center) / self.radius).normalize_or_zero();
        // tangent follows increasing longitude
        let hint = Vec3::new(-normal.z, 0.0, normal.x);
        SurfaceFrame::from_normal(normal, hint, Self::sphere_uv(normal))
    }

    pub fn bounding_box(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        Aabb::from_points(self.center - r, self.center + r)
    }

    pub fn area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }

    /// Surface point for a direction drawn uniformly on the unit sphere.
    pub fn sample_surface(&self, direction: Vec3) -> SurfacePoint {
        let normal = direction.normalize_or_zero();
        SurfacePoint {
            point: self.center + normal * self.radius,
            normal,
        }
    }
}
