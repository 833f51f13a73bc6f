use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Seeded noise that nudges overlapping lines apart on a chart. It only ever
/// sees copies of already aggregated points, so nothing it does can leak back
/// into computed statistics.
pub struct Jitter {
    rng: StdRng,
}

impl Jitter {
    /// Creates a new `Jitter`; the same seed gives the same picture.
    pub fn new(seed: u64) -> Self {
        Jitter { rng: StdRng::seed_from_u64(seed) }
    }

    /// Multiplies each y by a factor drawn uniformly from
    /// `[1 - percent, 1 + percent]`.
    pub fn scale(&mut self, points: &[(f64, f64)], percent: f64) -> Vec<(f64, f64)> {
        if percent <= 0.0 {
            return points.to_vec();
        }
        points
            .iter()
            .map(|&(x, y)| (x, y * self.rng.gen_range(1.0 - percent..=1.0 + percent)))
            .collect()
    }

    /// Adds to each y an offset drawn from a normal distribution with mean 0
    /// and standard deviation `std_dev`.
    pub fn shift(&mut self, points: &[(f64, f64)], std_dev: f64) -> Vec<(f64, f64)> {
        let normal = match Normal::new(0.0, std_dev) {
            Ok(n) if std_dev > 0.0 => n,
            _ => return points.to_vec(),
        };
        points
            .iter()
            .map(|&(x, y)| (x, y + normal.sample(&mut self.rng)))
            .collect()
    }
}
