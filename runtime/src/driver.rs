//! Sweeps packet loss for one (algorithm, swept value) pair and records the
//! handshake times.

use super::errors::*;
use super::netem::Shaper;
use super::schedule::steps;
use super::timer::Timer;
use super::Setting;
use evaluation::{derive_result_file, SweepAxis};
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Instant;

/// One invocation of the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    /// Signature algorithm passed to the timing binary.
    pub algorithm: String,

    /// Which parameter the value belongs to.
    pub axis: SweepAxis,

    /// Swept value, kept verbatim for the directory name.
    pub value: String,
}

impl Experiment {
    /// Creates a new `Experiment`. The value must be a plain decimal (digits
    /// and dots) so the result directory can be read back.
    pub fn new(algorithm: &str, axis: SweepAxis, value: &str) -> Result<Self> {
        if axis.parse_value(value).is_none() {
            bail!(ErrorKind::InvalidSetting(format!(
                "{} value must be a plain decimal, got '{}'",
                axis, value
            )));
        }
        Ok(Experiment {
            algorithm: algorithm.to_string(),
            axis: axis,
            value: value.to_string(),
        })
    }

    /// Result file for one latency.
    pub fn result_file(&self, setting: &Setting, latency: &str) -> PathBuf {
        let dir = self.axis.derive_result_dir(&setting.data_dir, &self.value, latency);
        derive_result_file(dir, &self.algorithm)
    }

    /// Runs the whole schedule under every configured latency. Each result
    /// file is truncated first and gets one row per loss value, flushed as
    /// soon as it is measured. Returns the files written.
    pub fn run(&self, setting: &Setting, shaper: &mut dyn Shaper, timer: &dyn Timer) -> Result<Vec<PathBuf>> {
        setting.validate()?;
        let steps = steps(&setting.schedule);
        let mut written = Vec::new();

        for latency in &setting.latencies {
            let path = self.result_file(setting, latency);
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).chain_err(|| format!("failed to create {}", dir.display()))?;
            }

            shaper.shape(0.0, latency)?;

            let file = File::create(&path).chain_err(|| format!("failed to create {}", path.display()))?;
            let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(file);
            info!("{} with {}={} at {}: writing {}", self.algorithm, self.axis, self.value, latency, path.display());

            for &(loss, measurements) in &steps {
                let start = Instant::now();
                shaper.shape(loss, latency)?;
                let times = timer.time(&self.algorithm, measurements, setting.timers)?;

                let mut row = Vec::with_capacity(times.len() + 1);
                row.push(loss.to_string());
                row.extend(times.iter().map(|t| t.to_string()));
                wtr.write_record(&row)?;
                wtr.flush()?;
                info!(
                    "{}% loss: {} handshakes in {:.1}s",
                    loss,
                    times.len(),
                    start.elapsed().as_secs_f64()
                );
            }
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::LossBatch;
    use evaluation::{load_rows, scan, ResultIndex, ResultKey, ScanFilter};
    use std::cell::Cell;
    use std::sync::Mutex;

    struct RecordingShaper {
        calls: Vec<(f64, String)>,
    }

    impl Shaper for RecordingShaper {
        fn shape(&mut self, loss: f64, delay: &str) -> Result<()> {
            self.calls.push((loss, delay.to_string()));
            Ok(())
        }
    }

    struct FakeTimer {
        calls: Mutex<Vec<(String, usize, usize)>>,
        fail_at: Option<usize>,
        seen: Cell<usize>,
    }

    impl FakeTimer {
        fn new(fail_at: Option<usize>) -> Self {
            FakeTimer {
                calls: Mutex::new(Vec::new()),
                fail_at: fail_at,
                seen: Cell::new(0),
            }
        }
    }

    impl Timer for FakeTimer {
        fn time(&self, algorithm: &str, measurements: usize, invocations: usize) -> Result<Vec<f64>> {
            let n = self.seen.get();
            self.seen.set(n + 1);
            if self.fail_at == Some(n) {
                bail!(ErrorKind::TimerOutput("garbage".to_string()));
            }
            self.calls
                .lock()
                .unwrap()
                .push((algorithm.to_string(), measurements, invocations));
            Ok((0..invocations).map(|i| 40.0 + n as f64 + i as f64 * 0.5).collect())
        }
    }

    fn setting(root: &PathBuf) -> Setting {
        Setting {
            data_dir: root.display().to_string(),
            timers: 2,
            schedule: vec![LossBatch::new(&[0.0, 0.1], 10), LossBatch::new(&[4.0], 20)],
            ..Setting::default()
        }
    }

    fn temp_root(name: &str) -> PathBuf {
        let root = ::std::env::temp_dir().join(format!("pqbench-{}-{}", name, ::std::process::id()));
        let _ = fs::remove_dir_all(&root);
        root
    }

    #[test]
    fn test_rejects_non_numeric_value() {
        for bad in &["ten", "1e3", "+10", "inf", "NaN", ""] {
            assert!(Experiment::new("falcon512", SweepAxis::Initcwnd, bad).is_err(), "{}", bad);
        }
        let e = Experiment::new("falcon512", SweepAxis::Mtu, "1500").unwrap();
        assert_eq!(e.value, "1500");
    }

    #[test]
    fn test_accepted_value_scans_back() {
        let root = temp_root("driver-value");
        let mut setting = setting(&root);
        setting.schedule = vec![LossBatch::new(&[0.0], 5)];
        let experiment = Experiment::new("mldsa44", SweepAxis::Initcwnd, "2.5").unwrap();
        let mut shaper = RecordingShaper { calls: Vec::new() };
        experiment.run(&setting, &mut shaper, &FakeTimer::new(None)).unwrap();

        let files = scan(&root, SweepAxis::Initcwnd, &ScanFilter::new()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].sweep, SweepAxis::Initcwnd.parse_value("2.5").unwrap());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_run_writes_rows_in_schedule_order() {
        let root = temp_root("driver-run");
        let setting = setting(&root);
        let experiment = Experiment::new("falcon512", SweepAxis::Initcwnd, "10").unwrap();
        let mut shaper = RecordingShaper { calls: Vec::new() };
        let timer = FakeTimer::new(None);

        let written = experiment.run(&setting, &mut shaper, &timer).unwrap();
        assert_eq!(written, vec![root.join("initcwnd=10/latency=20.000ms/falcon512.csv")]);

        // reset to 0% first, then one reconfiguration per loss value
        let losses = shaper.calls.iter().map(|c| c.0).collect::<Vec<_>>();
        assert_eq!(losses, vec![0.0, 0.0, 0.1, 4.0]);
        assert!(shaper.calls.iter().all(|c| c.1 == "20.000ms"));

        let calls = timer.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                ("falcon512".to_string(), 10, 2),
                ("falcon512".to_string(), 10, 2),
                ("falcon512".to_string(), 20, 2),
            ]
        );

        let text = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(text, "0,40,40.5\n0.1,41,41.5\n4,42,42.5\n");

        // the evaluation side reads the file back under the expected key
        let rows = load_rows(&written[0]).unwrap();
        assert_eq!(rows.len(), 3);
        let files = scan(&root, SweepAxis::Initcwnd, &ScanFilter::new()).unwrap();
        let index = ResultIndex::build(&files);
        assert!(index.get(&ResultKey::new("falcon512", 10.0, 20.0)).is_some());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_rerun_truncates() {
        let root = temp_root("driver-truncate");
        let setting = setting(&root);
        let experiment = Experiment::new("mayo1", SweepAxis::Mtu, "9000").unwrap();
        let path = experiment.result_file(&setting, "20.000ms");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "99,1,2,3\n").unwrap();

        let mut shaper = RecordingShaper { calls: Vec::new() };
        experiment.run(&setting, &mut shaper, &FakeTimer::new(None)).unwrap();
        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.iter().map(|r| r.value).collect::<Vec<_>>(), vec![0.0, 0.1, 4.0]);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_timer_failure_aborts_with_partial_file() {
        let root = temp_root("driver-fail");
        let setting = setting(&root);
        let experiment = Experiment::new("mldsa44", SweepAxis::Initcwnd, "5").unwrap();
        let mut shaper = RecordingShaper { calls: Vec::new() };

        let result = experiment.run(&setting, &mut shaper, &FakeTimer::new(Some(1)));
        assert!(result.is_err());

        // the row measured before the failure was flushed
        let path = experiment.result_file(&setting, "20.000ms");
        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 0.0);

        let _ = fs::remove_dir_all(&root);
    }
}
