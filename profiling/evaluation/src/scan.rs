//! Walks the result directory tree.

use super::errors::*;
use super::{AxisValue, SweepAxis, LATENCY_PREFIX};
use std::fs;
use std::path::{Path, PathBuf};

/// A data series with known issues, left out of the MTU and category charts.
pub const EXCLUDED_ALGORITHM: &str = "sphincssha2128ssimple";

/// Restricts which result files a scan reports.
#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    excluded: Vec<String>,
    latency: Option<AxisValue>,
}

impl ScanFilter {
    /// Creates a filter that admits everything.
    pub fn new() -> Self {
        ScanFilter::default()
    }

    /// Drops an algorithm (compared case-insensitively).
    pub fn exclude(mut self, algorithm: &str) -> Self {
        self.excluded.push(algorithm.to_lowercase());
        self
    }

    /// Keeps only one latency directory when set.
    pub fn latency(mut self, latency: Option<f64>) -> Self {
        self.latency = latency.map(AxisValue);
        self
    }

    fn admits_algorithm(&self, algorithm: &str) -> bool {
        let lower = algorithm.to_lowercase();
        !self.excluded.iter().any(|e| *e == lower)
    }

    fn admits_latency(&self, latency: AxisValue) -> bool {
        self.latency.map_or(true, |l| l == latency)
    }
}

/// A per-algorithm CSV file and the parameters its location encodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultFile {
    /// Signature algorithm, taken from the file stem.
    pub algorithm: String,

    /// Value of the outer (swept) directory level.
    pub sweep: AxisValue,

    /// Value of the inner (latency) directory level.
    pub latency: AxisValue,

    /// Location of the CSV file.
    pub path: PathBuf,
}

/// Extracts the number that follows `prefix` at the start of `name`, e.g.
/// `extract_number("latency=20.000ms", "latency=")` is `20.0`. Only digits and
/// dots after the prefix are considered.
pub fn extract_number(name: &str, prefix: &str) -> Option<AxisValue> {
    if !name.starts_with(prefix) {
        return None;
    }
    let rest = &name[prefix.len()..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or_else(|| rest.len());
    rest[..end].parse::<f64>().ok().map(AxisValue)
}

/// Finds every `<root>/<axis>=<v>/latency=<v>/<algorithm>.csv`. Entries that
/// do not follow the naming convention are skipped silently. Only an
/// unreadable `root` is an error.
pub fn scan<P: AsRef<Path>>(root: P, axis: SweepAxis, filter: &ScanFilter) -> Result<Vec<ResultFile>> {
    let root = root.as_ref();
    let outer = sorted_entries(root)
        .chain_err(|| format!("failed to read data directory {}", root.display()))?;

    let prefix = axis.prefix();
    let mut files = Vec::new();
    for sweep_dir in outer.iter().filter(|p| p.is_dir()) {
        let sweep = match file_name(sweep_dir).and_then(|n| extract_number(n, &prefix)) {
            Some(v) => v,
            None => {
                debug!("skipping {}", sweep_dir.display());
                continue;
            }
        };

        for latency_dir in entries_or_skip(sweep_dir).iter().filter(|p| p.is_dir()) {
            let latency = match file_name(latency_dir).and_then(|n| extract_number(n, LATENCY_PREFIX)) {
                Some(v) => v,
                None => {
                    debug!("skipping {}", latency_dir.display());
                    continue;
                }
            };
            if !filter.admits_latency(latency) {
                continue;
            }

            for path in entries_or_skip(latency_dir) {
                if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("csv") {
                    continue;
                }
                let algorithm = match path.file_stem().and_then(|s| s.to_str()) {
                    Some(stem) if !stem.is_empty() => stem.to_string(),
                    _ => continue,
                };
                if !filter.admits_algorithm(&algorithm) {
                    debug!("excluding {}", path.display());
                    continue;
                }
                files.push(ResultFile {
                    algorithm: algorithm,
                    sweep: sweep,
                    latency: latency,
                    path: path,
                });
            }
        }
    }

    info!("found {} result files for {} under {}", files.len(), axis, root.display());
    Ok(files)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

fn sorted_entries(dir: &Path) -> ::std::io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect::<Vec<PathBuf>>();
    entries.sort();
    Ok(entries)
}

fn entries_or_skip(dir: &Path) -> Vec<PathBuf> {
    sorted_entries(dir).unwrap_or_else(|e| {
        warn!("skipping unreadable directory {}: {}", dir.display(), e);
        Vec::new()
    })
}

#[cfg(test)]
pub mod fixture {
    //! Builds throwaway data trees under the system temp directory.

    use std::fs;
    use std::path::{Path, PathBuf};

    pub struct DataDir {
        pub root: PathBuf,
    }

    impl DataDir {
        pub fn new(name: &str) -> DataDir {
            let root = ::std::env::temp_dir().join(format!(
                "evaluation-{}-{}",
                name,
                ::std::process::id()
            ));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(&root).unwrap();
            DataDir { root: root }
        }

        pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
            let path = self.root.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, contents).unwrap();
            path
        }

        pub fn path(&self) -> &Path {
            &self.root
        }
    }

    impl Drop for DataDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }
}
