//! Library of functions and structs to help with handshake benchmark
//! evaluation.
//!
//! Measurements live in a directory tree that encodes the experiment
//! parameters positionally:
//!
//! ```text
//! data/<axis>=<value>/latency=<value>/<algorithm>.csv
//! ```
//!
//! Each CSV row is `packet_loss,sample1,sample2,...` (no header). This crate
//! loads those rows, reduces them to summary statistics, indexes them by
//! algorithm and swept value, and renders comparison charts.

#![warn(missing_docs)]

extern crate average;
extern crate chrono;
extern crate csv;
extern crate env_logger;
#[macro_use]
extern crate error_chain;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate plotters;
extern crate rand;
extern crate rand_distr;
extern crate rayon;
extern crate serde;
#[macro_use]
extern crate serde_derive;

#[allow(missing_docs)]
pub mod errors;

mod loader;
pub use loader::{load_rows, read_rows, MeasurementRow};

mod stats;
pub use stats::{group_by_value, median, quantile, Metric, Spread, Summary};

mod scan;
pub use scan::{extract_number, scan, ResultFile, ScanFilter, EXCLUDED_ALGORITHM};

mod index;
pub use index::{points, ResultIndex, ResultKey, ResultSeries};

mod jitter;
pub use jitter::Jitter;

mod family;
pub use family::Family;

pub mod chart;
pub mod figures;

mod report;
pub use report::{summarize, write_report, SummaryRecord};

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Prefix of the inner directory level, e.g. `latency=20.000ms`.
pub const LATENCY_PREFIX: &str = "latency=";

/// The parameter swept by the outer directory level.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum SweepAxis {
    /// Initial TCP congestion window, in MSS.
    Initcwnd,

    /// Maximum transmission unit, in bytes.
    Mtu,
}

impl SweepAxis {
    /// Name used in directory names and on the command line.
    pub fn name(&self) -> &'static str {
        match *self {
            SweepAxis::Initcwnd => "initcwnd",
            SweepAxis::Mtu => "mtu",
        }
    }

    /// Prefix of the outer directory level, e.g. `initcwnd=`.
    pub fn prefix(&self) -> String {
        format!("{}=", self.name())
    }

    /// Gets the name of the directory holding results for `value`.
    pub fn derive_dir_name(&self, value: &str) -> String {
        format!("{}{}", self.prefix(), value)
    }

    /// Parses a swept value exactly the way `scan` reads it back from a
    /// directory name: digits and dots only, all of it a decimal. Values such
    /// as `1e3`, `+10` or `inf` are rejected.
    pub fn parse_value(&self, value: &str) -> Option<AxisValue> {
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return None;
        }
        extract_number(&self.derive_dir_name(value), &self.prefix())
    }

    /// Gets the directory that holds per-algorithm CSV files for one
    /// (swept value, latency) pair.
    pub fn derive_result_dir<P: AsRef<Path>>(&self, root: P, value: &str, latency: &str) -> PathBuf {
        root.as_ref()
            .join(self.derive_dir_name(value))
            .join(format!("{}{}", LATENCY_PREFIX, latency))
    }
}

/// Gets the filename of the result file for `algorithm` inside `dir`.
pub fn derive_result_file<P: AsRef<Path>>(dir: P, algorithm: &str) -> PathBuf {
    dir.as_ref().join(format!("{}.csv", algorithm))
}

impl FromStr for SweepAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<SweepAxis, String> {
        match s.to_lowercase().as_str() {
            "initcwnd" => Ok(SweepAxis::Initcwnd),
            "mtu" => Ok(SweepAxis::Mtu),
            other => Err(format!("mode must be either 'initcwnd' or 'mtu', got '{}'", other)),
        }
    }
}

impl ::std::fmt::Display for SweepAxis {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A decimal experiment parameter (packet loss, initcwnd, MTU, latency) that
/// can key ordered maps. Equality and ordering are structural over the bits
/// of the float (`f64::total_cmp`).
#[derive(Debug, Clone, Copy)]
pub struct AxisValue(pub f64);

impl AxisValue {
    /// The raw value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for AxisValue {
    fn from(v: f64) -> Self {
        AxisValue(v)
    }
}

impl PartialEq for AxisValue {
    fn eq(&self, other: &AxisValue) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AxisValue {}

impl PartialOrd for AxisValue {
    fn partial_cmp(&self, other: &AxisValue) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AxisValue {
    fn cmp(&self, other: &AxisValue) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for AxisValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state)
    }
}

impl ::std::fmt::Display for AxisValue {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Initializes `env_logger` with a timestamped format. Honours `RUST_LOG`,
/// defaulting to `info`.
pub fn init_logger() {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    builder.format(|buf, record| {
        let t = chrono::Utc::now();
        writeln!(
            buf,
            "{} {}:{}: {}",
            t.format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.module_path().unwrap_or("-"),
            record.args()
        )
    });
    // a second call from the same process keeps the first logger
    let _ = builder.try_init();
}
