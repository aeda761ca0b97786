//! Triangle shape.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use super::{ShapeHit, SurfaceFrame, SurfacePoint};
use ember_math::{Aabb, Interval, Ray, Vec2, Vec3};

/// Determinants below this mean the ray is parallel to the triangle.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A single triangle with a precomputed unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    normal: Vec3,
}

impl Triangle {
    /// Triangle with the geometric normal of its counter-clockwise winding.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self { v0, v1, v2, normal }
    }

    /// Triangle with an explicit shading normal.
    pub fn with_normal(v0: Vec3, v1: Vec3, v2: Vec3, normal: Vec3) -> Self {
        Self {
            v0,
            v1,
            v2,
            normal: normal.normalize_or_zero(),
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// True when the vertices span no area.
    pub fn is_degenerate(&self) -> bool {
        self.area() <= f32::EPSILON
    }

    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / det;
        let s = ray.origin - self.v0;
        let b1 = f * s.dot(h);
        if !(0.0..=1.0).contains(&b1) {
            return None;
        }

        let q = s.cross(edge1);
        let b2 = f * ray.direction.dot(q);
        if b2 < 0.0 || b1 + b2 > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(ShapeHit { t, face: 0, b1, b2 })
    }

    /// Flat frame; UV are the barycentrics of the hit.
    pub fn surface(&self, b1: f32, b2: f32) -> SurfaceFrame {
        SurfaceFrame::from_normal(self.normal, self.v1 - self.v0, Vec2::new(b1, b2))
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.v0, self.v1).include_point(self.v2)
    }

    pub fn area(&self) -> f32 {
        0.5 * (self.v1 - self.v0).cross(self.v2 - self.v0).length()
    }

    /// Uniform point for a unit-square sample.
    pub fn sample_surface(&self, sample: Vec2) -> SurfacePoint {
        let su = sample.x.sqrt();
        let b0 = 1.0 - su;
        let b1 = sample.y * su;
        SurfacePoint {
            point: self.v0 * b0 + self.v1 * b1 + self.v2 * (1.0 - b0 - b1),
            normal: self.normal,
        }
    }
}
