//! Summary statistics over raw handshake times.

use super::{AxisValue, MeasurementRow};
use average::{Estimate, MeanWithError};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Which statistic of a `Summary` to plot.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Metric {
    /// The 50th percentile.
    Median,

    /// The 90th percentile.
    P90,
}

impl Metric {
    /// Both metrics, in plotting order.
    pub fn all() -> [Metric; 2] {
        [Metric::Median, Metric::P90]
    }

    /// Tag used in output file names.
    pub fn tag(&self) -> &'static str {
        match *self {
            Metric::Median => "median",
            Metric::P90 => "90th",
        }
    }

    /// Human readable name used in chart titles.
    pub fn title(&self) -> &'static str {
        match *self {
            Metric::Median => "Median",
            Metric::P90 => "90th Percentile",
        }
    }

    /// Picks this metric out of a summary.
    pub fn of(&self, summary: &Summary) -> f64 {
        match *self {
            Metric::Median => summary.median,
            Metric::P90 => summary.p90,
        }
    }
}

/// Reduced statistics for one list of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Number of samples reduced.
    pub count: usize,

    /// Median handshake time.
    pub median: f64,

    /// 90th percentile handshake time.
    pub p90: f64,
}

impl Summary {
    /// Summarizes `samples`. Returns `None` when there is nothing to
    /// summarize, which callers must treat as "no data" rather than zero.
    pub fn of(samples: &[f64]) -> Option<Summary> {
        let sorted = sorted_samples(samples);
        Some(Summary {
            count: sorted.len(),
            median: interpolate(&sorted, 0.5)?,
            p90: interpolate(&sorted, 0.9)?,
        })
    }
}

/// Mean and standard error of the mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    /// Arithmetic mean.
    pub mean: f64,

    /// Standard error of the mean.
    pub stderr: f64,
}

impl Spread {
    /// Returns `None` on an empty sample list.
    pub fn of(samples: &[f64]) -> Option<Spread> {
        let sorted = sorted_samples(samples);
        if sorted.is_empty() {
            return None;
        }
        let mut m = MeanWithError::new();
        sorted.iter().for_each(|&s| m.add(s));
        Some(Spread {
            mean: m.mean(),
            stderr: m.error(),
        })
    }
}

/// The `q`-quantile of `samples` using linear interpolation between the two
/// closest ranks, `pos = q * (n - 1)`. NaN samples are ignored.
pub fn quantile(samples: &[f64], q: f64) -> Option<f64> {
    interpolate(&sorted_samples(samples), q)
}

/// The middle value of the sorted samples, or the average of the two middle
/// values.
pub fn median(samples: &[f64]) -> Option<f64> {
    quantile(samples, 0.5)
}

/// Pools the samples of every row sharing the same independent value.
pub fn group_by_value(rows: &[MeasurementRow]) -> BTreeMap<AxisValue, Vec<f64>> {
    let sorted = rows.iter().sorted_by_key(|r| AxisValue(r.value));
    let groups = sorted.group_by(|r| AxisValue(r.value));
    let pooled = groups
        .into_iter()
        .map(|(value, group)| {
            let samples = group
                .flat_map(|r| r.samples.iter().cloned())
                .collect::<Vec<f64>>();
            (value, samples)
        })
        .collect::<BTreeMap<AxisValue, Vec<f64>>>();
    pooled
}

fn sorted_samples(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples
        .iter()
        .cloned()
        .filter(|s| !s.is_nan())
        .collect::<Vec<f64>>();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

fn interpolate(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.max(0.0).min(1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_three_samples() {
        let s = Summary::of(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(s.count, 3);
        assert!(close(s.median, 20.0));
        assert!(close(s.p90, 28.0));
    }

    #[test]
    fn test_median_even_and_unsorted() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[7.0]), Some(7.0));
        assert_eq!(median(&[9.0, 1.0, 5.0]), Some(5.0));
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        // pos = 0.9 * 9 = 8.1 -> 9 + 0.1 * (10 - 9)
        let samples = (1..11).map(|i| i as f64).collect::<Vec<_>>();
        assert!(close(quantile(&samples, 0.9).unwrap(), 9.1));
        assert_eq!(quantile(&samples, 0.0), Some(1.0));
        assert_eq!(quantile(&samples, 1.0), Some(10.0));
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(Summary::of(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(quantile(&[::std::f64::NAN], 0.9), None);
        assert_eq!(Spread::of(&[]), None);
    }

    #[test]
    fn test_spread() {
        let s = Spread::of(&[2.0, 4.0, 6.0]).unwrap();
        assert!(close(s.mean, 4.0));
        // sample std dev 2, n = 3
        assert!(close(s.stderr, 2.0 / 3f64.sqrt()));
    }

    #[test]
    fn test_group_by_value_pools_rows() {
        let rows = vec![
            MeasurementRow { value: 1.0, samples: vec![3.0, 4.0] },
            MeasurementRow { value: 0.0, samples: vec![1.0] },
            MeasurementRow { value: 1.0, samples: vec![5.0] },
            MeasurementRow { value: 2.0, samples: vec![] },
        ];
        let grouped = group_by_value(&rows);
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[&AxisValue(0.0)], vec![1.0]);
        let mut pooled = grouped[&AxisValue(1.0)].clone();
        pooled.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(pooled, vec![3.0, 4.0, 5.0]);
        assert!(grouped[&AxisValue(2.0)].is_empty());
    }
}
