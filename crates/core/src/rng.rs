//! Injectable random source so generation and spawning can be replayed from a seed.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_float(&mut self) -> f64;

    /// Uniform integer in `[min, max]`. Collapses to `min` when the range is empty.
    fn next_int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = f64::from(max) - f64::from(min) + 1.0;
        let offset = (self.next_float() * span).floor() as i64;
        (i64::from(min) + offset).min(i64::from(max)) as i32
    }

    /// Uniform float in `[min, max)`.
    fn float_between(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_float()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        ((self.next_float() * len as f64).floor() as usize).min(len - 1)
    }

    fn coin_flip(&mut self) -> bool {
        self.next_float() < 0.5
    }
}

/// ChaCha8-backed source used by sessions and the tools binaries.
#[derive(Clone, Debug)]
pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl RandomSource for SeededRng {
    fn next_float(&mut self) -> f64 {
        // 53 high bits fill the f64 mantissa exactly.
        (self.inner.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_float(&mut self) -> f64 {
        (**self).next_float()
    }
}
