//! Triangle mesh shape backed by a BVH.

use super::{ShapeHit, SurfaceFrame, SurfacePoint, Triangle};
use crate::bvh::BvhNode;
use ember_core::Mesh;
use ember_math::{Aabb, Interval, Ray, Vec2};

/// A flat-shaded triangle soup with its own acceleration structure.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
    bvh: BvhNode,
    /// Running triangle area totals for area-weighted sampling
    cumulative_area: Vec<f32>,
}

impl TriangleMesh {
    /// Build from loaded mesh data. Zero-area faces are dropped.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let mut triangles = Vec::with_capacity(mesh.triangle_count());
        for face in 0..mesh.triangle_count() {
            let [v0, v1, v2] = mesh.triangle(face);
            let tri = Triangle::with_normal(v0, v1, v2, mesh.face_normal(face));
            if tri.is_degenerate() {
                continue;
            }
            triangles.push(tri);
        }

        let dropped = mesh.triangle_count() - triangles.len();
        if dropped > 0 {
            log::warn!("Dropped {} degenerate triangles from mesh", dropped);
        }

        Self::new(triangles)
    }

    pub fn new(triangles: Vec<Triangle>) -> Self {
        let bounds: Vec<Aabb> = triangles.iter().map(|t| t.bounding_box()).collect();
        let bvh = BvhNode::new(&bounds);

        let mut total = 0.0;
        let cumulative_area = triangles
            .iter()
            .map(|t| {
                total += t.area();
                total
            })
            .collect();

        Self {
            triangles,
            bvh,
            cumulative_area,
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Closest hit through the BVH.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        self.bvh.closest_hit(ray, ray_t, &mut |face, interval| {
            self.triangles[face]
                .intersect(ray, interval)
                .map(|hit| ShapeHit { face, ..hit })
        })
    }

    /// Closest hit by testing every triangle.
    pub fn intersect_linear(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        let mut closest: Option<ShapeHit> = None;
        for (face, tri) in self.triangles.iter().enumerate() {
            let max = closest.map_or(ray_t.max, |h| h.t);
            if let Some(hit) = tri.intersect(ray, ray_t.with_max(max)) {
                closest = Some(ShapeHit { face, ..hit });
            }
        }
        closest
    }

    pub fn surface(&self, hit: &ShapeHit) -> SurfaceFrame {
        match self.triangles.get(hit.face) {
            Some(tri) => tri.surface(hit.b1, hit.b2),
            None => SurfaceFrame::from_normal(ember_math::Vec3::Y, ember_math::Vec3::X, Vec2::ZERO),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bvh.bounding_box()
    }

    pub fn area(&self) -> f32 {
        self.cumulative_area.last().copied().unwrap_or(0.0)
    }

    /// Pick a triangle with probability proportional to its area using `pick`
    /// in `[0, 1)`, then a uniform point on it.
    pub fn sample_surface(&self, pick: f32, sample: Vec2) -> SurfacePoint {
        let target = pick * self.area();
        let face = self
            .cumulative_area
            .partition_point(|&acc| acc <= target)
            .min(self.triangles.len().saturating_sub(1));

        match self.triangles.get(face) {
            Some(tri) => tri.sample_surface(sample),
            None => SurfacePoint {
                point: ember_math::Vec3::ZERO,
                normal: ember_math::Vec3::Y,
            },
        }
    }
}
