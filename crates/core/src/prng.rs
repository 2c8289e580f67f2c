//! Deterministic random sources for generation.
//!
//! [`Xorshift64`] is the raw integer generator. [`SketchRng`] layers the
//! sketch-level draws on top of it: uniform reals, Gaussian deviates and a
//! coherent-noise channel, all derived from one integer seed. A fresh
//! `SketchRng` is built for every generation call, so nothing leaks between
//! compositions.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses the standard shift parameters (13, 7, 17). Seed of 0 is replaced with
/// a non-zero fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns a uniformly distributed f64 in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns a uniformly distributed f64 in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// SplitMix64 finalizer. Spreads small or sequential user seeds across the
/// whole 64-bit state so the first xorshift outputs are not near zero.
fn scramble(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Folds a 64-bit seed into the 32-bit seed the noise generator takes.
fn noise_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

/// Random source for one generation call.
///
/// Every draw the compositor makes goes through this type, in a fixed order,
/// which is what makes a composition a pure function of its seed.
#[derive(Debug, Clone)]
pub struct SketchRng {
    prng: Xorshift64,
    /// Second deviate produced by the last polar-method round.
    spare_gaussian: Option<f64>,
    noise: Perlin,
}

impl SketchRng {
    /// Seeds both the uniform stream and the noise channel from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            prng: Xorshift64::new(scramble(seed)),
            spare_gaussian: None,
            noise: Perlin::new(noise_seed(seed)),
        }
    }

    /// Uniform real in [0, 1). Used for every probability draw.
    pub fn uniform01(&mut self) -> f64 {
        self.prng.next_f64()
    }

    /// Uniform real in [min, max).
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        self.prng.next_range(min, max)
    }

    /// Uniform integer in [0, n), as `floor(uniform01() * n)`.
    ///
    /// Returns 0 when `n` is 0 or 1.
    pub fn below(&mut self, n: usize) -> usize {
        if n <= 1 {
            // Still consume a draw so stream position does not depend on n.
            self.uniform01();
            return 0;
        }
        ((self.uniform01() * n as f64).floor() as usize).min(n - 1)
    }

    /// Normally distributed sample with the given mean and standard deviation.
    ///
    /// Marsaglia polar method; each round yields two deviates and the second
    /// is cached for the next call.
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z = match self.spare_gaussian.take() {
            Some(spare) => spare,
            None => {
                let (x1, x2, w) = loop {
                    let x1 = self.uniform(-1.0, 1.0);
                    let x2 = self.uniform(-1.0, 1.0);
                    let w = x1 * x1 + x2 * x2;
                    if w > 0.0 && w < 1.0 {
                        break (x1, x2, w);
                    }
                };
                let factor = (-2.0 * w.ln() / w).sqrt();
                self.spare_gaussian = Some(x2 * factor);
                x1 * factor
            }
        };
        mean + z * std_dev
    }

    /// Coherent 2D noise in [-1, 1].
    ///
    /// Does not advance the uniform stream.
    pub fn noise(&self, x: f64, y: f64) -> f64 {
        self.noise.get([x, y]).clamp(-1.0, 1.0)
    }
}
