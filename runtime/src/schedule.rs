//! The escalating measurement schedule.
//!
//! Higher packet loss makes handshake times noisier, so later loss values
//! collect more samples per timing invocation.

/// Loss values sharing one per-invocation measurement count.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LossBatch {
    /// Packet loss values in percent, measured in this order.
    pub losses: Vec<f64>,

    /// Handshakes measured by each timing invocation.
    pub measurements: usize,
}

impl LossBatch {
    /// Creates a new `LossBatch`.
    pub fn new(losses: &[f64], measurements: usize) -> Self {
        LossBatch {
            losses: losses.to_vec(),
            measurements: measurements,
        }
    }
}

/// `{0, 0.1, 1, 2} x 50`, `{4, 6, 8, 10} x 200`, `{12, 14} x 300`,
/// `{16, 18} x 400`.
pub fn default_schedule() -> Vec<LossBatch> {
    vec![
        LossBatch::new(&[0.0, 0.1, 1.0, 2.0], 50),
        LossBatch::new(&[4.0, 6.0, 8.0, 10.0], 200),
        LossBatch::new(&[12.0, 14.0], 300),
        LossBatch::new(&[16.0, 18.0], 400),
    ]
}

/// Flattens a schedule into `(loss, measurements)` steps in run order.
pub fn steps(schedule: &[LossBatch]) -> Vec<(f64, usize)> {
    schedule
        .iter()
        .flat_map(|batch| batch.losses.iter().map(move |&loss| (loss, batch.measurements)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_steps() {
        let steps = steps(&default_schedule());
        assert_eq!(steps.len(), 12);
        assert_eq!(steps[0], (0.0, 50));
        assert_eq!(steps[1], (0.1, 50));
        assert_eq!(steps[4], (4.0, 200));
        assert_eq!(steps[9], (14.0, 300));
        assert_eq!(steps[11], (18.0, 400));

        let losses = steps.iter().map(|s| s.0).collect::<Vec<_>>();
        let mut sorted = losses.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(losses, sorted);
    }
}
