use std::f64::consts::TAU;

use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;

use crate::config::Span;

/// Explicit, seedable random source threaded through every generator.
///
/// Two sessions seeded with the same value draw identical sequences, which makes
/// whole compositions reproducible.
#[derive(Clone, Debug)]
pub struct SessionRng {
    inner: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed derived from the wall clock, for interactive sessions.
    pub fn from_time() -> Self {
        Self::seeded(time_seed())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.inner.r#gen::<f64>()
    }

    /// Uniform draw between `lo` and `hi`. Reversed or empty bounds are allowed.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    pub fn span(&mut self, span: Span) -> f64 {
        self.range(span.lo, span.hi)
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Uniform index in `0..n`; `0` when `n` is 0 or 1.
    pub fn index(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        self.inner.gen_range(0..n)
    }

    /// Integer in `lo..hi`, the floor of a uniform draw.
    pub fn int(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..hi)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.index(items.len());
        items.get(i)
    }

    pub fn angle(&mut self) -> f64 {
        self.range(0.0, TAU)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.r#gen::<u64>()
    }

    /// Normal deviate with the given mean and standard deviation.
    pub fn gaussian(&mut self, mean: f64, std: f64) -> f64 {
        mean + std * self.inner.sample::<f64, _>(StandardNormal)
    }
}

pub fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

#[cfg(test)]
#[path = "../tests/unit/rng.rs"]
mod tests;
