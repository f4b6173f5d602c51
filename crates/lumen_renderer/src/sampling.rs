//! Random sampling helpers.
//!
//! Every function takes the generator explicitly. There is no global or
//! thread-local state: the renderer hands each pixel its own seeded
//! generator (see [`pixel_seed`]).

use lumen_math::Vec3;
use rand::{Rng, RngCore};
use std::f64::consts::TAU;

/// Uniform f64 in `[0, 1)`.
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform point on the unit sphere.
///
/// Closed form: `z ~ U(-1, 1)`, `theta ~ U(0, 2pi)`, no rejection loop.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    let z = 2.0 * gen_f64(rng) - 1.0;
    let theta = TAU * gen_f64(rng);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Pixel jitter offset, each component in `[-0.5, 0.5)`.
pub fn sample_square(rng: &mut dyn RngCore) -> (f64, f64) {
    (gen_f64(rng) - 0.5, gen_f64(rng) - 0.5)
}

/// Seed for the generator of one pixel in one render.
///
/// Mixing the pixel index into the run seed makes every pixel's samples
/// independent of which thread renders it.
pub fn pixel_seed(run_seed: u64, pixel_index: usize) -> u64 {
    splitmix64(run_seed ^ splitmix64(pixel_index as u64))
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
