//! Warps from the unit square onto the disk, hemisphere and sphere.

use ember_math::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_4, PI};

/// Concentric map of `[0, 1)²` onto the unit disk.
///
/// Square rings map to circles through four angular sectors, so strata in the
/// square stay compact on the disk and nothing clusters at the center.
pub fn concentric_disk(sample: Vec2) -> Vec2 {
    // map from [0, 1]^2 to [-1, 1]^2
    let sp = sample * 2.0 - Vec2::ONE;

    let (r, phi) = if sp.x > -sp.y {
        if sp.x > sp.y {
            // sector 1
            (sp.x, sp.y / sp.x)
        } else {
            // sector 2
            (sp.y, 2.0 - sp.x / sp.y)
        }
    } else if sp.x < sp.y {
        // sector 3
        (-sp.x, 4.0 + sp.y / sp.x)
    } else {
        // sector 4
        let phi = if sp.y != 0.0 { 6.0 - sp.x / sp.y } else { 0.0 };
        (-sp.y, phi)
    };

    let phi = phi * FRAC_PI_4;
    Vec2::new(r * phi.cos(), r * phi.sin())
}

/// Cosine-power distributed direction about +Z.
///
/// The density is `(e + 1) / 2π · cos^e θ`; `e = 1` gives the cosine
/// distribution used for diffuse bounces.
pub fn cosine_power_hemisphere(sample: Vec2, exponent: f32) -> Vec3 {
    let phi = 2.0 * PI * sample.x;
    let cos_theta = (1.0 - sample.y).powf(1.0 / (exponent + 1.0));
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Uniform (equal-area) direction on the unit sphere.
pub fn uniform_sphere(sample: Vec2) -> Vec3 {
    let z = 1.0 - 2.0 * sample.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * sample.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}
