use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Uniform draw from `0..=max`.
    pub fn roll(&mut self, max: u32) -> u32 {
        self.rng.gen_range(0..=max)
    }

    /// True with probability one in `n`.
    pub fn one_in(&mut self, n: u32) -> bool {
        n <= 1 || self.rng.gen_range(0..n) == 0
    }

    pub fn percent(&mut self) -> u32 {
        self.rng.gen_range(0..100)
    }
}
