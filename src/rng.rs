//! Random number source used by the resolver, the trajectory generator and
//! the local catalog.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform random draws in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }

    /// `(r - 0.5) * span`, i.e. uniform in `[-span/2, span/2)`.
    fn centered(&mut self, span: f64) -> f64 {
        (self.next_f64() - 0.5) * span
    }
}

/// Production source: ChaCha8 seeded from browser / OS entropy.
pub struct ChaChaSource {
    rng: ChaCha8Rng,
}

impl ChaChaSource {
    pub fn from_entropy() -> Self {
        let mut seed = [0u8; 32];
        if let Err(e) = getrandom::getrandom(&mut seed) {
            log::warn!("entropy unavailable ({e}); falling back to clock seed");
            let fallback = clock_seed();
            seed[..8].copy_from_slice(&fallback.to_le_bytes());
        }
        Self {
            rng: ChaCha8Rng::from_seed(seed),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for ChaChaSource {
    fn next_f64(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

fn clock_seed() -> u64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now().to_bits())
        .unwrap_or(0x5EED_C0DE)
}

/// Replays a fixed list of draws, cycling when exhausted. An empty list
/// always draws `0.0`. For tests and scripted demos.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    values: Vec<f64>,
    index: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, index: 0 }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far.
    pub fn drawn(&self) -> usize {
        self.index
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&mut self) -> f64 {
        let v = match self.values.len() {
            0 => 0.0,
            len => self.values[self.index % len],
        };
        self.index += 1;
        v
    }
}
