#![allow(dead_code)]
use rand::distributions::Uniform;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Column major features drawn from a few discrete levels, so grids have repeats.
pub(crate) fn create_data(n_samples: usize, n_features: usize, levels: usize) -> Vec<f64> {
    // reproducible seed
    let mut rng = StdRng::seed_from_u64(1903);
    let level_distribution = Uniform::new(0, levels.max(1));
    (0..n_samples * n_features)
        .map(|_| rng.sample(level_distribution) as f64 / levels as f64)
        .collect()
}
