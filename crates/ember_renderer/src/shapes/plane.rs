//! Infinite plane shape.

use super::{ShapeHit, SurfaceFrame};
use ember_math::{Interval, Ray, Vec2, Vec3};

/// Rays this close to parallel with the plane never hit it.
const PARALLEL_EPSILON: f32 = 1e-8;

/// The plane `dot(normal, p) = distance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vec3,
    distance: f32,
}

impl Plane {
    /// Plane with the given normal (normalized here) at signed `distance` from the origin.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        let len = normal.length();
        if len > 0.0 {
            Self {
                normal: normal / len,
                distance: distance / len,
            }
        } else {
            log::warn!("plane with zero normal; defaulting to +Y");
            Self {
                normal: Vec3::Y,
                distance,
            }
        }
    }

    /// Plane through `point` with the given normal.
    pub fn from_point(point: Vec3, normal: Vec3) -> Self {
        let n = normal.normalize_or_zero();
        Self::new(n, n.dot(point))
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.distance - self.normal.dot(ray.origin)) / denom;
        ray_t.surrounds(t).then(|| ShapeHit::at(t))
    }

    pub fn surface(&self, p: Vec3) -> SurfaceFrame {
        let (u, v, _) = ember_math::orthonormal_basis(self.normal);
        SurfaceFrame {
            normal: self.normal,
            tangent: u,
            bitangent: v,
            uv: Vec2::new(p.dot(u), p.dot(v)),
        }
    }
}
