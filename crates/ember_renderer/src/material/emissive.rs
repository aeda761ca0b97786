//! Emissive material for light-emitting geometry.

use super::{Material, Shading};
use crate::{Color, HitRecord, Sampler, Scene};

/// Constant radiance `ls · ce` leaving the front face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emissive {
    /// Radiance scaling factor
    pub ls: f32,
    pub ce: Color,
}

impl Emissive {
    pub fn new(ls: f32, ce: Color) -> Self {
        Self { ls, ce }
    }

    fn radiance(&self, hit: &HitRecord) -> Shading {
        if hit.front_face {
            Shading::local(self.emission())
        } else {
            Shading::absorbed()
        }
    }
}

impl Material for Emissive {
    fn shade(&self, hit: &HitRecord, _scene: &Scene, _sampler: &mut Sampler) -> Shading {
        self.radiance(hit)
    }

    fn area_light_shade(&self, hit: &HitRecord, _scene: &Scene, _sampler: &mut Sampler) -> Shading {
        self.radiance(hit)
    }

    fn path_shade(&self, hit: &HitRecord, _scene: &Scene, _sampler: &mut Sampler) -> Shading {
        self.radiance(hit)
    }

    fn emission(&self) -> Color {
        self.ce * self.ls
    }
}
