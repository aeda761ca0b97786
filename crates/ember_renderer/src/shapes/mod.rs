//! Intersectable shapes in object space.
//!
//! [`Shape`] is a closed set of variants dispatched through one
//! `intersect`/`surface` pair. Intersection only finds the ray parameter;
//! the surface frame is resolved afterwards, for the winning hit only.

mod mesh;
mod plane;
mod sphere;
mod torus;
mod triangle;

pub use mesh::TriangleMesh;
pub use plane::Plane;
pub use sphere::Sphere;
pub use torus::Torus;
pub use triangle::Triangle;

use crate::Sampler;
use ember_math::{Aabb, Interval, Ray, Vec2, Vec3};

/// Smallest ray parameter accepted as a hit.
pub const HIT_EPSILON: f32 = 1e-4;

/// Outcome of a shape-space intersection test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeHit {
    /// Ray parameter of the hit
    pub t: f32,
    /// Triangle index within a mesh (0 for other shapes)
    pub face: usize,
    /// Barycentric coordinates for triangles
    pub b1: f32,
    pub b2: f32,
}

impl ShapeHit {
    pub fn at(t: f32) -> Self {
        Self {
            t,
            face: 0,
            b1: 0.0,
            b2: 0.0,
        }
    }
}

/// Local differential geometry at a hit, in shape space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceFrame {
    /// Outward unit normal
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub uv: Vec2,
}

impl SurfaceFrame {
    /// Frame with a tangent derived from `hint` and completed by cross products.
    pub fn from_normal(normal: Vec3, hint: Vec3, uv: Vec2) -> Self {
        let mut tangent = (hint - normal * hint.dot(normal)).normalize_or_zero();
        if tangent == Vec3::ZERO {
            tangent = ember_math::orthonormal_basis(normal).0;
        }
        Self {
            normal,
            tangent,
            bitangent: normal.cross(tangent),
            uv,
        }
    }
}

/// A point drawn on a shape's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub point: Vec3,
    pub normal: Vec3,
}

#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    Torus(Torus),
    Mesh(TriangleMesh),
}

impl Shape {
    /// Closest hit within `ray_t`, or `None`.
    ///
    /// Degenerate configurations (parallel rays, zero-area triangles, rays
    /// that only graze a torus numerically) are misses, not errors.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        match self {
            Shape::Sphere(s) => s.intersect(ray, ray_t),
            Shape::Plane(p) => p.intersect(ray, ray_t),
            Shape::Triangle(t) => t.intersect(ray, ray_t),
            Shape::Torus(t) => t.intersect(ray, ray_t),
            Shape::Mesh(m) => m.intersect(ray, ray_t),
        }
    }

    /// Surface frame at shape-space point `p` for a hit returned by `intersect`.
    pub fn surface(&self, p: Vec3, hit: &ShapeHit) -> SurfaceFrame {
        match self {
            Shape::Sphere(s) => s.surface(p),
            Shape::Plane(pl) => pl.surface(p),
            Shape::Triangle(t) => t.surface(hit.b1, hit.b2),
            Shape::Torus(t) => t.surface(p),
            Shape::Mesh(m) => m.surface(hit),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            Shape::Sphere(s) => s.bounding_box(),
            Shape::Plane(_) => Aabb::UNIVERSE,
            Shape::Triangle(t) => t.bounding_box(),
            Shape::Torus(t) => t.bounding_box(),
            Shape::Mesh(m) => m.bounding_box(),
        }
    }

    /// Surface area for shapes that can act as area-light emitters.
    pub fn area(&self) -> Option<f32> {
        match self {
            Shape::Sphere(s) => Some(s.area()),
            Shape::Triangle(t) => Some(t.area()),
            Shape::Mesh(m) => Some(m.area()),
            Shape::Plane(_) | Shape::Torus(_) => None,
        }
    }

    /// Draw a point uniformly (by area) on the surface.
    pub fn sample_surface(&self, sampler: &mut Sampler) -> Option<SurfacePoint> {
        match self {
            Shape::Sphere(s) => Some(s.sample_surface(sampler.sample_sphere())),
            Shape::Triangle(t) => Some(t.sample_surface(sampler.sample_unit_square())),
            Shape::Mesh(m) => {
                let pick = sampler.random_f32();
                Some(m.sample_surface(pick, sampler.sample_unit_square()))
            }
            Shape::Plane(_) | Shape::Torus(_) => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Sphere(_) => "sphere",
            Shape::Plane(_) => "plane",
            Shape::Triangle(_) => "triangle",
            Shape::Torus(_) => "torus",
            Shape::Mesh(_) => "mesh",
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<Plane> for Shape {
    fn from(p: Plane) -> Self {
        Shape::Plane(p)
    }
}

impl From<Triangle> for Shape {
    fn from(t: Triangle) -> Self {
        Shape::Triangle(t)
    }
}

impl From<Torus> for Shape {
    fn from(t: Torus) -> Self {
        Shape::Torus(t)
    }
}

impl From<TriangleMesh> for Shape {
    fn from(m: TriangleMesh) -> Self {
        Shape::Mesh(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_is_orthonormal() {
        let frame = SurfaceFrame::from_normal(Vec3::Y, Vec3::new(1.0, 0.5, 0.0), Vec2::ZERO);
        assert!((frame.tangent - Vec3::X).length() < 1e-6);
        assert!(frame.tangent.dot(frame.normal).abs() < 1e-6);
        assert!((frame.bitangent.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_frame_hint_parallel_to_normal() {
        let frame = SurfaceFrame::from_normal(Vec3::Y, Vec3::Y, Vec2::ZERO);
        assert!((frame.tangent.length() - 1.0).abs() < 1e-5);
        assert!(frame.tangent.dot(Vec3::Y).abs() < 1e-5);
    }

    #[test]
    fn test_emitter_support() {
        let sphere = Shape::from(Sphere::new(Vec3::ZERO, 1.0));
        let plane = Shape::from(Plane::new(Vec3::Y, 0.0));
        assert!(sphere.area().is_some());
        assert!(plane.area().is_none());

        let mut sampler = Sampler::new(ember_core::SamplerKind::PureRandom, 4, 1, 0);
        assert!(plane.sample_surface(&mut sampler).is_none());
        let p = sphere.sample_surface(&mut sampler).unwrap();
        assert!((p.point.length() - 1.0).abs() < 1e-5);
    }
}
