//! Experiment driver for post-quantum TLS handshake benchmarks.
//!
//! For one signature algorithm and one value of a swept link parameter
//! (initcwnd or MTU) the driver walks an escalating packet loss schedule. At
//! each loss value it reconfigures netem on both ends of an emulated link and
//! runs the external handshake timing binary several times in parallel. Every
//! loss value becomes one row of
//!
//! ```text
//! data/<axis>=<value>/latency=<latency>/<algorithm>.csv
//! ```
//!
//! which the `evaluation` crate reads back for plotting.
#![recursion_limit = "1024"]
#![warn(missing_docs)]

extern crate csv;
#[macro_use]
extern crate error_chain;
extern crate evaluation;
#[macro_use]
extern crate log;
extern crate rayon;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate toml;

#[allow(missing_docs)]
pub mod errors;

mod setting;
pub use setting::Setting;

mod schedule;
pub use schedule::{default_schedule, steps, LossBatch};

pub mod command;

mod netem;
pub use netem::{qdisc_command, Endpoint, NetemPair, Shaper};

mod timer;
pub use timer::{parse_timings, HandshakeTimer, Timer, TimerPool};

mod driver;
pub use driver::Experiment;
