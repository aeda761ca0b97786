//! HitRecord for ray-scene intersection.

use crate::{Color, Primitive};
use ember_math::{Ray, Vec2, Vec3};

/// Record of the closest ray-scene intersection.
///
/// Geometry is in world space except `local_point` and `local_ray`, which are
/// in the winning primitive's object space. Fields other than `hit`, `ray`
/// and `color` are only meaningful when `hit` is true.
#[derive(Clone, Debug)]
pub struct HitRecord<'a> {
    pub hit: bool,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    pub local_point: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Surface color, or the background on a miss
    pub color: Color,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    pub ray: Ray,
    pub local_ray: Ray,
    pub primitive: Option<&'a Primitive>,
}

impl<'a> HitRecord<'a> {
    /// A miss carrying the background color.
    pub fn miss(ray: Ray, background: Color) -> Self {
        Self {
            hit: false,
            t: f32::INFINITY,
            point: Vec3::ZERO,
            local_point: Vec3::ZERO,
            normal: Vec3::ZERO,
            tangent: Vec3::ZERO,
            bitangent: Vec3::ZERO,
            u: 0.0,
            v: 0.0,
            color: background,
            front_face: false,
            ray,
            local_ray: ray,
            primitive: None,
        }
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::new(self.u, self.v)
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is stored pointing against the ray; the bitangent flips
    /// with it so the frame keeps its handedness.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction.dot(outward_normal) < 0.0;

        if self.front_face {
            self.normal = outward_normal;
        } else {
            self.normal = -outward_normal;
            self.bitangent = -self.bitangent;
        }
    }

    /// Direction toward the viewer, unit length.
    pub fn wo(&self) -> Vec3 {
        -self.ray.direction.normalize_or_zero()
    }
}
