// Transform utilities for Mat4
//
// Extends glam::Mat4 with the operations primitives need to move rays into
// object space and surface data back out.
// Note: glam::Mat4 already provides transform_point3() and inverse()

use crate::{Aabb, Ray};
use glam::{Mat4, Vec3, Vec4};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a vector in 3D space (applies rotation and scale, but NOT translation).
    /// Vectors have an implicit w=0 component.
    fn transform_direction(&self, vector: Vec3) -> Vec3;

    /// Transform a surface normal by the inverse-transpose of this matrix.
    ///
    /// `self` must be the *inverse* of the object-to-world matrix.
    fn transform_normal(&self, normal: Vec3) -> Vec3;

    /// Transform a ray, keeping its depth. The direction is not renormalized,
    /// so ray parameters stay comparable across spaces.
    fn transform_ray(&self, ray: &Ray) -> Ray;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_direction(&self, vector: Vec3) -> Vec3 {
        // Transform as direction (w=0) - translation should not affect vectors
        let transformed = *self * Vec4::new(vector.x, vector.y, vector.z, 0.0);
        transformed.truncate()
    }

    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.transpose().transform_direction(normal)
    }

    fn transform_ray(&self, ray: &Ray) -> Ray {
        Ray::with_depth(
            self.transform_point3(ray.origin),
            self.transform_direction(ray.direction),
            ray.depth,
        )
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return *aabb;
        }

        let (lo, hi) = (aabb.min(), aabb.max());
        (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 == 0 { lo.x } else { hi.x },
                    if i & 2 == 0 { lo.y } else { hi.y },
                    if i & 4 == 0 { lo.z } else { hi.z },
                )
            })
            .map(|corner| self.transform_point3(corner))
            .fold(Aabb::EMPTY, |acc, p| acc.include_point(p))
    }
}
