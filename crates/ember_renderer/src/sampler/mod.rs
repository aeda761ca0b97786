//! Pre-generated sample pools for antialiasing and illumination sampling.
//!
//! A [`Sampler`] generates `num_samples × num_sets` points on the unit square
//! once, at construction, with one of the [`SamplerKind`] strategies. Disk,
//! hemisphere and sphere pools are derived from the square pool by the
//! `map_samples_to_*` calls.
//!
//! Draws walk a randomly chosen set in a per-set shuffled order and jump to a
//! new set every `num_samples` draws. Every `sample_*` call advances a cursor,
//! so each logical sample must be drawn exactly once.
//!
//! Grid-based strategies (`Regular`, `Jittered`, `MultiJittered`) expect
//! `num_samples` to be a perfect square. Other counts are a caller
//! precondition violation: the pool is still filled, by repeating the
//! largest square grid that fits, but it loses its stratification.

mod mapping;
mod patterns;

pub use mapping::{concentric_disk, cosine_power_hemisphere, uniform_sphere};

use ember_core::settings::is_perfect_square;
use ember_core::{SamplerKind, SamplerSettings};
use ember_math::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// One pool of mapped samples with its own draw cursor.
#[derive(Clone, Debug)]
struct SamplePool<T> {
    samples: Vec<T>,
    count: usize,
    jump: usize,
}

impl<T> Default for SamplePool<T> {
    fn default() -> Self {
        Self {
            samples: Vec::new(),
            count: 0,
            jump: 0,
        }
    }
}

impl<T: Copy> SamplePool<T> {
    fn new(samples: Vec<T>) -> Self {
        Self {
            samples,
            ..Default::default()
        }
    }

    fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn draw(&mut self, shuffled_indices: &[usize], num_samples: usize, num_sets: usize, rng: &mut StdRng) -> T {
        // start a new pixel: pick a random set
        if self.count % num_samples == 0 {
            self.jump = rng.gen_range(0..num_sets) * num_samples;
        }
        let idx = shuffled_indices[self.jump + self.count % num_samples];
        self.count = self.count.wrapping_add(1);
        self.samples[self.jump + idx]
    }
}

/// Seeded sample generator and pools.
///
/// Not shareable between concurrent users: every draw mutates the cursor.
/// Give each worker its own instance (see [`Sampler::fork`]).
#[derive(Clone, Debug)]
pub struct Sampler {
    kind: SamplerKind,
    num_samples: usize,
    num_sets: usize,
    rng: StdRng,
    /// Per-set permutation of `0..num_samples`
    shuffled_indices: Vec<usize>,
    square: SamplePool<Vec2>,
    disk: SamplePool<Vec2>,
    hemisphere: SamplePool<Vec3>,
    hemisphere_exponent: f32,
    sphere: SamplePool<Vec3>,
}

impl Sampler {
    /// Generate the square pool for `num_samples` samples in `num_sets` sets.
    pub fn new(kind: SamplerKind, num_samples: usize, num_sets: usize, seed: u64) -> Self {
        let num_samples = num_samples.max(1);
        let num_sets = num_sets.max(1);

        if kind.is_grid_based() && !is_perfect_square(num_samples as u32) {
            log::warn!(
                "{:?} sampler with non-square sample count {}; samples will repeat",
                kind,
                num_samples
            );
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let samples = patterns::generate(kind, num_samples, num_sets, &mut rng);

        let mut shuffled_indices = Vec::with_capacity(num_samples * num_sets);
        let mut indices: Vec<usize> = (0..num_samples).collect();
        for _ in 0..num_sets {
            indices.shuffle(&mut rng);
            shuffled_indices.extend_from_slice(&indices);
        }

        Self {
            kind,
            num_samples,
            num_sets,
            rng,
            shuffled_indices,
            square: SamplePool::new(samples),
            disk: SamplePool::default(),
            hemisphere: SamplePool::default(),
            hemisphere_exponent: 1.0,
            sphere: SamplePool::default(),
        }
    }

    /// Build a sampler with every pool mapped, ready for any tracer mode.
    pub fn from_settings(settings: &SamplerSettings) -> Self {
        let mut sampler = Self::new(
            settings.kind,
            settings.samples as usize,
            settings.sets as usize,
            settings.seed,
        );
        sampler.map_samples_to_unit_disk();
        sampler.map_samples_to_hemisphere(settings.hemisphere_exponent);
        sampler.map_samples_to_sphere();
        sampler
    }

    /// A sampler with the same pattern parameters and an independent stream.
    pub fn fork(&self, seed: u64) -> Self {
        let mut sampler = Self::new(self.kind, self.num_samples, self.num_sets, seed);
        if !self.disk.is_empty() {
            sampler.map_samples_to_unit_disk();
        }
        if !self.hemisphere.is_empty() {
            sampler.map_samples_to_hemisphere(self.hemisphere_exponent);
        }
        if !self.sphere.is_empty() {
            sampler.map_samples_to_sphere();
        }
        sampler
    }

    pub fn kind(&self) -> SamplerKind {
        self.kind
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// The raw square pool, set after set.
    pub fn square_samples(&self) -> &[Vec2] {
        &self.square.samples
    }

    /// The mapped disk pool (empty until mapped).
    pub fn disk_samples(&self) -> &[Vec2] {
        &self.disk.samples
    }

    /// Rebuild the disk pool from the square pool.
    pub fn map_samples_to_unit_disk(&mut self) {
        let samples = self.square.samples.iter().map(|&s| concentric_disk(s)).collect();
        self.disk = SamplePool::new(samples);
    }

    /// Rebuild the hemisphere pool with a cosine-power distribution.
    pub fn map_samples_to_hemisphere(&mut self, exponent: f32) {
        let samples = self
            .square
            .samples
            .iter()
            .map(|&s| cosine_power_hemisphere(s, exponent))
            .collect();
        self.hemisphere = SamplePool::new(samples);
        self.hemisphere_exponent = exponent;
    }

    /// Rebuild the sphere pool with a uniform distribution.
    pub fn map_samples_to_sphere(&mut self) {
        let samples = self.square.samples.iter().map(|&s| uniform_sphere(s)).collect();
        self.sphere = SamplePool::new(samples);
    }

    /// The exponent the hemisphere pool was mapped with.
    pub fn hemisphere_exponent(&self) -> f32 {
        self.hemisphere_exponent
    }

    /// Next point in `[0, 1)²`.
    pub fn sample_unit_square(&mut self) -> Vec2 {
        self.square
            .draw(&self.shuffled_indices, self.num_samples, self.num_sets, &mut self.rng)
    }

    /// Next point in the unit disk. Maps the pool on first use.
    pub fn sample_unit_disk(&mut self) -> Vec2 {
        if self.disk.is_empty() {
            self.map_samples_to_unit_disk();
        }
        self.disk
            .draw(&self.shuffled_indices, self.num_samples, self.num_sets, &mut self.rng)
    }

    /// Next direction on the +Z hemisphere. Maps the pool (exponent 1) on first use.
    pub fn sample_hemisphere(&mut self) -> Vec3 {
        if self.hemisphere.is_empty() {
            self.map_samples_to_hemisphere(1.0);
        }
        self.hemisphere
            .draw(&self.shuffled_indices, self.num_samples, self.num_sets, &mut self.rng)
    }

    /// Next direction on the unit sphere. Maps the pool on first use.
    pub fn sample_sphere(&mut self) -> Vec3 {
        if self.sphere.is_empty() {
            self.map_samples_to_sphere();
        }
        self.sphere
            .draw(&self.shuffled_indices, self.num_samples, self.num_sets, &mut self.rng)
    }

    /// An unstratified value in `[0, 1)` from the sampler's stream.
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }
}
