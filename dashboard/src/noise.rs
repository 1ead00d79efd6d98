//! # noise — randomness behind a trait
//!
//! Every random decision in the dashboard (fetch sampling, price jitter,
//! mempool drift, simulated block arrivals) draws from a [`Noise`].  Swap in
//! [`Quiet`] and the simulation goes flat; swap in a seeded generator and
//! tests become reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait Noise: Send {
    /// Uniform sample in `[0, 1)`.
    fn uniform(&mut self) -> f64;
}

/// Live randomness.
pub struct RandomNoise(StdRng);

impl RandomNoise {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Noise for RandomNoise {
    fn uniform(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Always the midpoint: every centred jitter is zero and no rare event fires.
pub struct Quiet;

impl Noise for Quiet {
    fn uniform(&mut self) -> f64 {
        0.5
    }
}

/// Replays a fixed script of samples, cycling.
#[cfg(test)]
pub struct Scripted {
    samples: Vec<f64>,
    next: usize,
}

#[cfg(test)]
impl Scripted {
    pub fn new(samples: &[f64]) -> Self {
        assert!(!samples.is_empty());
        Self { samples: samples.to_vec(), next: 0 }
    }
}

#[cfg(test)]
impl Noise for Scripted {
    fn uniform(&mut self) -> f64 {
        let sample = self.samples[self.next % self.samples.len()];
        self.next += 1;
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_noise_stays_in_unit_interval() {
        let mut noise = RandomNoise::seeded(7);
        for _ in 0..10_000 {
            let u = noise.uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let mut a = RandomNoise::seeded(42);
        let mut b = RandomNoise::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.uniform(), b.uniform());
        }
    }

    #[test]
    fn test_scripted_cycles() {
        let mut noise = Scripted::new(&[0.1, 0.9]);
        assert_eq!(noise.uniform(), 0.1);
        assert_eq!(noise.uniform(), 0.9);
        assert_eq!(noise.uniform(), 0.1);
    }
}
