//! Torus shape centered at the origin, symmetric about the Y axis.

use super::{ShapeHit, SurfaceFrame};
use ember_math::roots::solve_quartic;
use ember_math::{Aabb, Interval, Ray, Vec2, Vec3};
use std::f32::consts::PI;

/// A torus with swept radius `a` (center of the tube to the axis) and tube radius `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    a: f32,
    b: f32,
    bbox: Aabb,
}

impl Torus {
    pub fn new(swept_radius: f32, tube_radius: f32) -> Self {
        let a = swept_radius.abs();
        let b = tube_radius.abs();
        let reach = a + b;
        let bbox = Aabb::from_points(Vec3::new(-reach, -b, -reach), Vec3::new(reach, b, reach));
        Self { a, b, bbox }
    }

    pub fn swept_radius(&self) -> f32 {
        self.a
    }

    pub fn tube_radius(&self) -> f32 {
        self.b
    }

    /// Quartic coefficients in `t`, lowest order first.
    fn coefficients(&self, ray: &Ray) -> [f64; 5] {
        let o = ray.origin.as_dvec3();
        let d = ray.direction.as_dvec3();
        let a2 = (self.a as f64) * (self.a as f64);
        let b2 = (self.b as f64) * (self.b as f64);

        let sum_d_sqrd = d.length_squared();
        let e = o.length_squared() - a2 - b2;
        let f = o.dot(d);
        let four_a_sqrd = 4.0 * a2;

        [
            e * e - four_a_sqrd * (b2 - o.y * o.y),
            4.0 * f * e + 2.0 * four_a_sqrd * o.y * d.y,
            2.0 * sum_d_sqrd * e + 4.0 * f * f + four_a_sqrd * d.y * d.y,
            4.0 * sum_d_sqrd * f,
            sum_d_sqrd * sum_d_sqrd,
        ]
    }

    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let c = self.coefficients(ray);
        let t = solve_quartic(c).smallest_above(ray_t.min as f64)?;
        let t = polish_root(&c, t) as f32;

        ray_t.surrounds(t).then(|| ShapeHit::at(t))
    }

    /// Normal from the gradient of the implicit surface.
    pub fn surface(&self, p: Vec3) -> SurfaceFrame {
        let param_squared = self.a * self.a + self.b * self.b;
        let k = p.length_squared() - param_squared;
        let normal = Vec3::new(
            4.0 * p.x * k,
            4.0 * p.y * (k + 2.0 * self.a * self.a),
            4.0 * p.z * k,
        )
        .normalize_or_zero();

        let around = p.z.atan2(p.x);
        let radial = (p.x * p.x + p.z * p.z).sqrt() - self.a;
        let across = p.y.atan2(radial);
        let uv = Vec2::new(
            (around + PI) / (2.0 * PI),
            (across + PI) / (2.0 * PI),
        );

        // tangent runs around the main axis
        SurfaceFrame::from_normal(normal, Vec3::new(-p.z, 0.0, p.x), uv)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// One Newton step on the quartic, kept only if it stays finite.
fn polish_root(c: &[f64; 5], t: f64) -> f64 {
    let value = (((c[4] * t + c[3]) * t + c[2]) * t + c[1]) * t + c[0];
    let slope = ((4.0 * c[4] * t + 3.0 * c[3]) * t + 2.0 * c[2]) * t + c[1];
    if slope.abs() < 1e-12 {
        return t;
    }
    let refined = t - value / slope;
    if refined.is_finite() {
        refined
    } else {
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::HIT_EPSILON;

    fn forward() -> Interval {
        Interval::new(HIT_EPSILON, f32::INFINITY)
    }

    #[test]
    fn test_torus_hit_outer_rim() {
        let torus = Torus::new(1.0, 0.25);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        let hit = torus.intersect(&ray, forward()).unwrap();
        assert!((hit.t - 3.75).abs() < 1e-3, "t = {}", hit.t);

        let frame = torus.surface(ray.at(hit.t));
        assert!((frame.normal - Vec3::Z).length() < 1e-3);
    }

    #[test]
    fn test_torus_hit_top() {
        let torus = Torus::new(1.0, 0.25);
        let ray = Ray::new(Vec3::new(1.0, 5.0, 0.0), Vec3::NEG_Y);

        let hit = torus.intersect(&ray, forward()).unwrap();
        assert!((hit.t - 4.75).abs() < 1e-3, "t = {}", hit.t);

        let frame = torus.surface(ray.at(hit.t));
        assert!((frame.normal - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_torus_hole_misses() {
        let torus = Torus::new(1.0, 0.25);
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(torus.intersect(&ray, forward()).is_none());
    }

    #[test]
    fn test_torus_bbox_culls() {
        let torus = Torus::new(1.0, 0.25);
        let ray = Ray::new(Vec3::new(0.0, 2.0, 5.0), Vec3::NEG_Z);
        assert!(torus.intersect(&ray, forward()).is_none());
    }

    #[test]
    fn test_torus_from_inside_tube() {
        let torus = Torus::new(1.0, 0.25);
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::X);

        let hit = torus.intersect(&ray, forward()).unwrap();
        assert!((hit.t - 0.25).abs() < 1e-3, "t = {}", hit.t);
    }
}
