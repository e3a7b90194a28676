//! Synthetic driver data generation

use crate::types::{FeatureRow, TimeOfDay};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

pub const DEFAULT_SAMPLES: usize = 3000;
pub const DEFAULT_SEED: u64 = 42;

/// Generate `num_samples` random feature rows, reproducible per `seed`
///
/// Ranges: sleep 3-12h, driving 0-16h, caffeine 0-5 cups, rest 0-120 min,
/// age 18-69, stress 1-10, time of day uniform over the three buckets.
pub fn generate_synthetic_data(num_samples: usize, seed: u64) -> Vec<FeatureRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_samples).map(|_| random_row(&mut rng)).collect()
}

fn random_row<R: Rng>(rng: &mut R) -> FeatureRow {
    FeatureRow {
        sleep_hours: rng.random_range(3.0..12.0),
        driving_hours: rng.random_range(0.0..16.0),
        caffeine_cups: rng.random_range(0.0..5.0),
        rest_breaks: rng.random_range(0.0..120.0),
        age: rng.random_range(18..70),
        stress_level: rng.random_range(1.0..10.0),
        time_of_day: *TimeOfDay::ALL
            .choose(rng)
            .unwrap_or(&TimeOfDay::Morning),
    }
}
