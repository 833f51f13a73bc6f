//! The in-memory result index: (algorithm, swept value, latency) -> packet
//! loss -> summary statistics.

use super::{group_by_value, load_rows, AxisValue, Metric, ResultFile, Summary};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Identifies one plotted series.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResultKey {
    /// Signature algorithm name.
    pub algorithm: String,

    /// Value of the swept parameter (initcwnd or MTU).
    pub value: AxisValue,

    /// One-way delay of the inner directory level, in ms.
    pub latency: AxisValue,
}

impl ResultKey {
    /// Creates a new `ResultKey`.
    pub fn new(algorithm: &str, value: f64, latency: f64) -> Self {
        ResultKey {
            algorithm: algorithm.to_string(),
            value: AxisValue(value),
            latency: AxisValue(latency),
        }
    }
}

impl ::std::fmt::Display for ResultKey {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "({}, {}, {}ms)", self.algorithm, self.value, self.latency)
    }
}

/// Packet loss -> summary. `None` marks a loss value that had no samples.
pub type ResultSeries = BTreeMap<AxisValue, Option<Summary>>;

/// All series found under one data directory. Recomputed on every run.
#[derive(Debug, Clone, Default)]
pub struct ResultIndex {
    series: BTreeMap<ResultKey, ResultSeries>,
}

impl ResultIndex {
    /// Loads every file (in parallel) and reduces the rows of each
    /// (algorithm, swept value, latency) triple per packet loss value. Rows
    /// sharing a loss value are pooled before reduction. Unreadable files are
    /// skipped.
    pub fn build(files: &[ResultFile]) -> ResultIndex {
        let series = pool(files)
            .into_iter()
            .map(|(key, by_loss)| {
                let series = by_loss
                    .into_iter()
                    .map(|(loss, samples)| (loss, Summary::of(&samples)))
                    .collect::<ResultSeries>();
                (key, series)
            })
            .collect::<BTreeMap<_, _>>();

        ResultIndex { series: series }
    }

    /// Adds (or replaces) one series.
    pub fn insert(&mut self, key: ResultKey, series: ResultSeries) {
        self.series.insert(key, series);
    }

    /// Finds one series.
    pub fn get(&self, key: &ResultKey) -> Option<&ResultSeries> {
        self.series.get(key)
    }

    /// Every latency present, ascending.
    pub fn latencies(&self) -> Vec<AxisValue> {
        self.series
            .keys()
            .map(|k| k.latency)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The series recorded under one latency.
    pub fn at_latency(&self, latency: AxisValue) -> ResultIndex {
        let series = self
            .series
            .iter()
            .filter(|&(k, _)| k.latency == latency)
            .map(|(k, s)| (k.clone(), s.clone()))
            .collect();
        ResultIndex { series: series }
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Is the index empty?
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Iterates over all series in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ResultKey, &ResultSeries)> {
        self.series.iter()
    }

    /// All algorithms in the index, sorted and deduplicated.
    pub fn algorithms(&self) -> Vec<&str> {
        let mut algs = self
            .series
            .keys()
            .map(|k| k.algorithm.as_str())
            .collect::<Vec<_>>();
        algs.dedup();
        algs
    }

    /// The series of one algorithm, keyed by swept value. Meant for an index
    /// holding a single latency (see `at_latency`).
    pub fn by_algorithm(&self, algorithm: &str) -> BTreeMap<AxisValue, &ResultSeries> {
        self.series
            .iter()
            .filter(|&(k, _)| k.algorithm == algorithm)
            .map(|(k, s)| (k.value, s))
            .collect()
    }

    /// Slices the index at one packet loss value: per algorithm, swept value
    /// -> statistic. Points without data are dropped. Meant for an index
    /// holding a single latency.
    pub fn at_loss(&self, loss: f64, metric: Metric) -> BTreeMap<String, BTreeMap<AxisValue, f64>> {
        let loss = AxisValue(loss);
        let mut sliced: BTreeMap<String, BTreeMap<AxisValue, f64>> = BTreeMap::new();
        for (key, series) in &self.series {
            if let Some(&Some(ref summary)) = series.get(&loss) {
                sliced
                    .entry(key.algorithm.clone())
                    .or_insert_with(BTreeMap::new)
                    .insert(key.value, metric.of(summary));
            }
        }
        sliced
    }
}

/// Raw samples of every (algorithm, swept value, latency) triple, pooled per
/// packet loss value.
pub(crate) fn pool(files: &[ResultFile]) -> BTreeMap<ResultKey, BTreeMap<AxisValue, Vec<f64>>> {
    let loaded = files
        .par_iter()
        .filter_map(|file| match load_rows(&file.path) {
            Ok(rows) => Some((file, rows)),
            Err(e) => {
                warn!("skipping {}: {}", file.path.display(), e);
                None
            }
        })
        .collect::<Vec<_>>();

    let mut pooled: BTreeMap<ResultKey, BTreeMap<AxisValue, Vec<f64>>> = BTreeMap::new();
    for (file, rows) in loaded {
        let key = ResultKey {
            algorithm: file.algorithm.clone(),
            value: file.sweep,
            latency: file.latency,
        };
        let by_loss = pooled.entry(key).or_insert_with(BTreeMap::new);
        for (loss, samples) in group_by_value(&rows) {
            by_loss.entry(loss).or_insert_with(Vec::new).extend(samples);
        }
    }
    pooled
}

/// Turns a series into (packet loss, statistic) points, skipping loss values
/// without data.
pub fn points(series: &ResultSeries, metric: Metric) -> Vec<(f64, f64)> {
    series
        .iter()
        .filter_map(|(loss, summary)| summary.map(|s| (loss.value(), metric.of(&s))))
        .collect()
}
