//! Seeded RNG shared by food placement, serves and AI aim error

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Deterministic PCG stream; the same seed replays the same game
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: Pcg32,
    seed: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_entropy() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform in `[0, 1)`
    pub fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform in `[0, 1)`, double precision (used for weighted rolls)
    pub fn roll(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform integer in `[0, upper)`; `upper` must be positive
    pub fn below(&mut self, upper: i32) -> i32 {
        self.rng.random_range(0..upper)
    }

    pub fn coin(&mut self) -> bool {
        self.rng.random::<bool>()
    }
}
