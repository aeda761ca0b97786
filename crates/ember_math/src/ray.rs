use crate::Vec3;

/// A ray in 3D space with origin, direction, and recursion depth.
///
/// The direction is not normalized on construction; call [`Ray::normalized`]
/// when a unit direction is needed. `depth` counts how many times the ray's
/// path has been traced and is carried by continuation rays so the tracer can
/// bound recursion without relying on the call stack.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub depth: u32,
}

impl Ray {
    /// Create a new ray at depth 0.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            depth: 0,
        }
    }

    /// Create a ray that continues a path already at `depth`.
    pub fn with_depth(origin: Vec3, direction: Vec3, depth: u32) -> Self {
        Self {
            origin,
            direction,
            depth,
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray with a unit-length direction.
    pub fn normalized(&self) -> Self {
        Self {
            direction: self.direction.normalize(),
            ..*self
        }
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
        assert_eq!(ray.depth, 0);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_normalized_keeps_depth() {
        let ray = Ray::with_depth(Vec3::ONE, Vec3::new(0.0, 3.0, 4.0), 7);
        let unit = ray.normalized();

        assert!((unit.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(unit.origin, ray.origin);
        assert_eq!(unit.depth, 7);
        // The source ray is untouched
        assert_eq!(ray.direction, Vec3::new(0.0, 3.0, 4.0));
    }
}
