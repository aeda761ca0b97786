//! Surface colors as functions of the object-space hit point.

use std::fmt;
use std::sync::Arc;

use crate::Color;
use ember_math::Vec3;

/// A color source evaluated at the local-space hit point, so patterns move
/// with their primitive's transform.
#[derive(Clone)]
pub enum Texture {
    Constant(Color),
    /// 3D checkerboard of cubes with edge length `size`.
    Checker { size: f32, even: Color, odd: Color },
    Procedural(Arc<dyn Fn(Vec3) -> Color + Send + Sync>),
}

impl Texture {
    pub fn procedural<F>(f: F) -> Self
    where
        F: Fn(Vec3) -> Color + Send + Sync + 'static,
    {
        Texture::Procedural(Arc::new(f))
    }

    pub fn checker(even: Color, odd: Color, size: f32) -> Self {
        Texture::Checker { size, even, odd }
    }

    /// Color at the local-space point `p`.
    pub fn value(&self, p: Vec3) -> Color {
        match self {
            Texture::Constant(c) => *c,
            Texture::Checker { size, even, odd } => {
                // small offset keeps axis-aligned surfaces off cell boundaries
                let cell = ((p + Vec3::splat(1e-4)) / *size).floor();
                let parity = (cell.x + cell.y + cell.z) as i64;
                if parity.rem_euclid(2) == 0 {
                    *even
                } else {
                    *odd
                }
            }
            Texture::Procedural(f) => f(p),
        }
    }
}

impl Default for Texture {
    fn default() -> Self {
        Texture::Constant(Color::ONE)
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Constant(color)
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Texture::Constant(c) => f.debug_tuple("Constant").field(c).finish(),
            Texture::Checker { size, even, odd } => f
                .debug_struct("Checker")
                .field("size", size)
                .field("even", even)
                .field("odd", odd)
                .finish(),
            Texture::Procedural(_) => f.write_str("Procedural(..)"),
        }
    }
}
