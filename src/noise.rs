use rand::prelude::*;
use std::f64::consts::PI;

/// Bounded, zero-centered jitter. Injectable so deterministic tests can stub
/// it out; everything organic-looking in the figure flows through here.
pub trait NoiseSource {
    /// Sample one jitter value. A larger `divisor` shrinks the magnitude:
    /// the result always lies in `(-1/divisor, 1/divisor)`.
    fn sample(&mut self, divisor: f64) -> f64;
}

/// The production source: a uniform draw in [0,1) mapped to [-0.5,0.5),
/// scaled by pi and run through sine. Never drifts unbounded.
pub struct JitterNoise {
    rng: StdRng,
}

impl JitterNoise {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for JitterNoise {
    fn sample(&mut self, divisor: f64) -> f64 {
        let u: f64 = self.rng.gen();
        ((u - 0.5) * PI).sin() / divisor
    }
}
