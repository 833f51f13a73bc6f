//! Experiment driver setting in TOML.

use super::errors::*;
use super::schedule::{default_schedule, LossBatch};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The driver setting. Omitted fields keep their default.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Setting {
    /// Path to the handshake timing binary, run inside the client namespace.
    pub timer_binary: String,

    /// Root of the result tree.
    pub data_dir: String,

    /// Network namespace of the TLS client.
    pub client_namespace: String,

    /// Network namespace of the TLS server.
    pub server_namespace: String,

    /// Emulated link device in the client namespace.
    pub client_device: String,

    /// Emulated link device in the server namespace.
    pub server_device: String,

    /// netem rate limit, e.g. `1000mbit`.
    pub rate: String,

    /// netem queue limit in packets.
    pub limit: u32,

    /// Worker threads running timing invocations.
    pub pool_size: usize,

    /// Timing invocations per loss value.
    pub timers: usize,

    /// One-way delays to run the whole schedule under, e.g. `20.000ms`.
    pub latencies: Vec<String>,

    /// Loss values and how many handshakes each timing invocation measures.
    pub schedule: Vec<LossBatch>,
}

impl Default for Setting {
    fn default() -> Self {
        Setting {
            timer_binary: "./src/build/time_handshake".to_string(),
            data_dir: "data".to_string(),
            client_namespace: "client_namespace".to_string(),
            server_namespace: "server_namespace".to_string(),
            client_device: "client_veth".to_string(),
            server_device: "server_veth".to_string(),
            rate: "1000mbit".to_string(),
            limit: 1000,
            pool_size: 40,
            timers: 4,
            latencies: vec!["20.000ms".to_string()],
            schedule: default_schedule(),
        }
    }
}

impl Setting {
    /// Initialize from a file.
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Setting> {
        let path = path.as_ref();
        let mut file = File::open(path).chain_err(|| format!("failed to open {}", path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Setting::parse(&contents)
    }

    /// Parses and validates a TOML document.
    pub fn parse(contents: &str) -> Result<Setting> {
        let setting: Setting = toml::from_str(contents)?;
        setting.validate()?;
        Ok(setting)
    }

    /// Rejects settings that cannot produce a measurement.
    pub fn validate(&self) -> Result<()> {
        let reason = if self.pool_size == 0 {
            "pool_size must be positive"
        } else if self.timers == 0 {
            "timers must be positive"
        } else if self.latencies.is_empty() {
            "latencies must not be empty"
        } else if self.schedule.is_empty() {
            "schedule must not be empty"
        } else if self.schedule.iter().any(|b| b.losses.is_empty() || b.measurements == 0) {
            "every schedule entry needs losses and a positive measurement count"
        } else if self
            .schedule
            .iter()
            .flat_map(|b| b.losses.iter())
            .any(|&l| !(l >= 0.0 && l <= 100.0))
        {
            "packet loss must be between 0 and 100"
        } else {
            return Ok(());
        };
        Err(ErrorKind::InvalidSetting(reason.to_string()).into())
    }
}
