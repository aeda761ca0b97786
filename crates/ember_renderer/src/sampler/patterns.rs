//! Sample pattern generators on the unit square.
//!
//! Each generator returns `num_sets` consecutive blocks of `num_samples`
//! points in `[0, 1)²`.

use ember_core::SamplerKind;
use ember_math::Vec2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

pub(super) fn generate(kind: SamplerKind, num_samples: usize, num_sets: usize, rng: &mut StdRng) -> Vec<Vec2> {
    let mut samples = Vec::with_capacity(num_samples * num_sets);
    for _ in 0..num_sets {
        let set = match kind {
            SamplerKind::Regular => regular(num_samples),
            SamplerKind::PureRandom => pure_random(num_samples, rng),
            SamplerKind::Jittered => jittered(num_samples, rng),
            SamplerKind::NRooks => n_rooks(num_samples, rng),
            SamplerKind::MultiJittered => multi_jittered(num_samples, rng),
            SamplerKind::Hammersley => hammersley(num_samples),
        };
        samples.extend(fit_to_count(set, num_samples));
    }
    samples
}

/// Grid strategies produce `floor(sqrt(n))²` points; repeat them cyclically
/// when the caller asked for a non-square count.
fn fit_to_count(set: Vec<Vec2>, num_samples: usize) -> Vec<Vec2> {
    if set.len() == num_samples || set.is_empty() {
        return set;
    }
    set.iter().copied().cycle().take(num_samples).collect()
}

fn grid_size(num_samples: usize) -> usize {
    ((num_samples as f64).sqrt() as usize).max(1)
}

fn regular(num_samples: usize) -> Vec<Vec2> {
    let n = grid_size(num_samples);
    let mut set = Vec::with_capacity(n * n);
    for p in 0..n {
        for q in 0..n {
            set.push(Vec2::new(
                (q as f32 + 0.5) / n as f32,
                (p as f32 + 0.5) / n as f32,
            ));
        }
    }
    set
}

fn pure_random(num_samples: usize, rng: &mut StdRng) -> Vec<Vec2> {
    (0..num_samples)
        .map(|_| Vec2::new(rng.gen(), rng.gen()))
        .collect()
}

fn jittered(num_samples: usize, rng: &mut StdRng) -> Vec<Vec2> {
    let n = grid_size(num_samples);
    let mut set = Vec::with_capacity(n * n);
    for p in 0..n {
        for q in 0..n {
            set.push(Vec2::new(
                (q as f32 + rng.gen::<f32>()) / n as f32,
                (p as f32 + rng.gen::<f32>()) / n as f32,
            ));
        }
    }
    set
}

/// Latin hypercube: one sample per row and per column of an n×n grid.
fn n_rooks(num_samples: usize, rng: &mut StdRng) -> Vec<Vec2> {
    let n = num_samples as f32;
    let mut xs: Vec<f32> = (0..num_samples).map(|j| (j as f32 + rng.gen::<f32>()) / n).collect();
    let mut ys: Vec<f32> = (0..num_samples).map(|j| (j as f32 + rng.gen::<f32>()) / n).collect();
    xs.shuffle(rng);
    ys.shuffle(rng);
    xs.into_iter().zip(ys).map(|(x, y)| Vec2::new(x, y)).collect()
}

/// Jittered within the n×n cells and n-rooks within the n²×n² subcells.
fn multi_jittered(num_samples: usize, rng: &mut StdRng) -> Vec<Vec2> {
    let n = grid_size(num_samples);
    let count = n * n;
    let subcell_width = 1.0 / count as f32;

    // canonical arrangement
    let mut set = vec![Vec2::ZERO; count];
    for i in 0..n {
        for j in 0..n {
            set[i * n + j] = Vec2::new(
                (i * n + j) as f32 * subcell_width + rng.gen_range(0.0..subcell_width),
                (j * n + i) as f32 * subcell_width + rng.gen_range(0.0..subcell_width),
            );
        }
    }

    // shuffle x coordinates within each column of cells
    for i in 0..n {
        for j in 0..n {
            let k = rng.gen_range(j..n);
            let tmp = set[i * n + j].x;
            set[i * n + j].x = set[i * n + k].x;
            set[i * n + k].x = tmp;
        }
    }

    // shuffle y coordinates within each row of cells
    for i in 0..n {
        for j in 0..n {
            let k = rng.gen_range(j..n);
            let tmp = set[j * n + i].y;
            set[j * n + i].y = set[k * n + i].y;
            set[k * n + i].y = tmp;
        }
    }

    set
}

/// Van der Corput sequence in base 2.
pub(super) fn radical_inverse(mut j: u32) -> f32 {
    let mut x = 0.0f64;
    let mut f = 0.5f64;
    while j != 0 {
        x += f * (j & 1) as f64;
        j >>= 1;
        f *= 0.5;
    }
    x as f32
}

fn hammersley(num_samples: usize) -> Vec<Vec2> {
    (0..num_samples)
        .map(|j| Vec2::new(j as f32 / num_samples as f32, radical_inverse(j as u32)))
        .collect()
}
