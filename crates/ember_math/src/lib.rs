// Re-export glam for convenience
pub use glam::*;

// Ember math types
mod aabb;
mod interval;
mod ray;
pub mod roots;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// Build an orthonormal basis `(u, v, w)` with `w` along `n`.
///
/// The helper "up" vector is jittered slightly so that `n` parallel to Y
/// still produces a valid cross product.
pub fn orthonormal_basis(n: Vec3) -> (Vec3, Vec3, Vec3) {
    let w = n.normalize();
    let v = Vec3::new(0.0034, 1.0, 0.0071).cross(w).normalize();
    let u = v.cross(w);
    (u, v, w)
}
