//! Runs the external handshake timing binary, several invocations at a time.

use super::command;
use super::errors::*;
use super::Setting;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Produces raw handshake times for one loss value.
pub trait Timer {
    /// Runs `invocations` timing runs of `measurements` handshakes each and
    /// returns all times (ms), flattened in invocation order.
    fn time(&self, algorithm: &str, measurements: usize, invocations: usize) -> Result<Vec<f64>>;
}

/// Parses the comma separated handshake times printed by the timing binary.
/// Empty fields are ignored; anything else that is not a decimal is an error.
pub fn parse_timings(output: &str) -> Result<Vec<f64>> {
    output
        .trim()
        .split(',')
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .map(|f| {
            f.parse::<f64>()
                .map_err(|_| Error::from_kind(ErrorKind::TimerOutput(f.to_string())))
        })
        .collect()
}

/// A fixed-size pool of worker threads for blocking invocations.
pub struct TimerPool {
    pool: ThreadPool,
}

impl TimerPool {
    /// Creates a new `TimerPool` with `size` threads.
    pub fn new(size: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("timer-{}", i))
            .build()?;
        Ok(TimerPool { pool: pool })
    }

    /// Calls `f` `invocations` times on the pool and concatenates the results
    /// in invocation order. The first failure fails the batch.
    pub fn run<F>(&self, invocations: usize, f: F) -> Result<Vec<f64>>
    where
        F: Fn() -> Result<Vec<f64>> + Sync,
    {
        let nested = self.pool.install(|| {
            (0..invocations)
                .into_par_iter()
                .map(|_| f())
                .collect::<Result<Vec<Vec<f64>>>>()
        })?;
        Ok(nested.into_iter().flatten().collect())
    }
}

/// Runs the timing binary inside the client namespace.
pub struct HandshakeTimer {
    binary: String,
    namespace: String,
    pool: TimerPool,
}

impl HandshakeTimer {
    /// Creates a new `HandshakeTimer` with a pool of `setting.pool_size`
    /// threads.
    pub fn new(setting: &Setting) -> Result<Self> {
        Ok(HandshakeTimer {
            binary: setting.timer_binary.clone(),
            namespace: setting.client_namespace.clone(),
            pool: TimerPool::new(setting.pool_size)?,
        })
    }

    /// Argument vector of one invocation.
    pub fn command(&self, algorithm: &str, measurements: usize) -> Vec<String> {
        vec![
            "ip".to_string(),
            "netns".to_string(),
            "exec".to_string(),
            self.namespace.clone(),
            self.binary.clone(),
            algorithm.to_string(),
            measurements.to_string(),
        ]
    }
}

impl Timer for HandshakeTimer {
    fn time(&self, algorithm: &str, measurements: usize, invocations: usize) -> Result<Vec<f64>> {
        let args = self.command(algorithm, measurements);
        self.pool.run(invocations, || {
            let stdout = command::run(&args)?;
            parse_timings(&stdout)
        })
    }
}
