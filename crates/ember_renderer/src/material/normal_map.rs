//! Shading-normal perturbation in the surface's tangent frame.

use std::f32::consts::TAU;
use std::fmt;
use std::sync::Arc;

use super::{Material, Shading};
use crate::{Color, HitRecord, Sampler, Scene};
use ember_math::{Vec2, Vec3};

/// Tangent-space normal as a function of the surface (u, v).
///
/// Tangent-space normals have x along the tangent, y along the bitangent
/// and z along the geometric normal.
#[derive(Clone)]
pub enum NormalMap {
    /// No perturbation
    Flat,
    /// Height field `amplitude · sin(2π·f·u) · sin(2π·f·v)`
    Bumps { frequency: f32, amplitude: f32 },
    Procedural(Arc<dyn Fn(Vec2) -> Vec3 + Send + Sync>),
}

impl NormalMap {
    pub fn procedural<F>(f: F) -> Self
    where
        F: Fn(Vec2) -> Vec3 + Send + Sync + 'static,
    {
        NormalMap::Procedural(Arc::new(f))
    }

    /// Unit tangent-space normal at `uv`.
    pub fn tangent_normal(&self, uv: Vec2) -> Vec3 {
        let n = match self {
            NormalMap::Flat => Vec3::Z,
            NormalMap::Bumps {
                frequency,
                amplitude,
            } => {
                let (su, cu) = (TAU * frequency * uv.x).sin_cos();
                let (sv, cv) = (TAU * frequency * uv.y).sin_cos();
                let dh_du = amplitude * TAU * frequency * cu * sv;
                let dh_dv = amplitude * TAU * frequency * su * cv;
                Vec3::new(-dh_du, -dh_dv, 1.0)
            }
            NormalMap::Procedural(f) => f(uv),
        };

        let n = n.normalize_or_zero();
        if n.z > 0.0 {
            n
        } else {
            Vec3::Z
        }
    }

    /// Perturbed world-space shading normal for a hit.
    pub fn perturb(&self, hit: &HitRecord) -> Vec3 {
        let t = self.tangent_normal(hit.uv());
        let n = hit.tangent * t.x + hit.bitangent * t.y + hit.normal * t.z;
        n.try_normalize().unwrap_or(hit.normal)
    }
}

impl fmt::Debug for NormalMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalMap::Flat => f.write_str("Flat"),
            NormalMap::Bumps {
                frequency,
                amplitude,
            } => f
                .debug_struct("Bumps")
                .field("frequency", frequency)
                .field("amplitude", amplitude)
                .finish(),
            NormalMap::Procedural(_) => f.write_str("Procedural(..)"),
        }
    }
}

/// Wraps a material and shades it with a normal-mapped normal.
#[derive(Debug, Clone)]
pub struct NormalMapped<M: Material> {
    inner: M,
    map: NormalMap,
}

impl<M: Material> NormalMapped<M> {
    pub fn new(inner: M, map: NormalMap) -> Self {
        Self { inner, map }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    fn perturbed<'a>(&self, hit: &HitRecord<'a>) -> HitRecord<'a> {
        let mut shading_hit = hit.clone();
        shading_hit.normal = self.map.perturb(hit);
        shading_hit
    }
}

impl<M: Material> Material for NormalMapped<M> {
    fn shade(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler) -> Shading {
        self.inner.shade(&self.perturbed(hit), scene, sampler)
    }

    fn area_light_shade(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler) -> Shading {
        self.inner.area_light_shade(&self.perturbed(hit), scene, sampler)
    }

    fn path_shade(&self, hit: &HitRecord, scene: &Scene, sampler: &mut Sampler) -> Shading {
        self.inner.path_shade(&self.perturbed(hit), scene, sampler)
    }

    fn emission(&self) -> Color {
        self.inner.emission()
    }
}
