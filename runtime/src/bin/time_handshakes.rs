//! Measure TLS handshake times for one signature algorithm across the packet
//! loss schedule. Needs root and the client/server namespaces in place.
extern crate evaluation;
#[macro_use]
extern crate log;
extern crate pqbench;
extern crate structopt;

use evaluation::SweepAxis;
use pqbench::errors::*;
use pqbench::{Experiment, HandshakeTimer, NetemPair, Setting};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "time_handshakes")]
#[structopt(about = "Time TLS handshakes under increasing packet loss")]
struct Opt {
    /// Signature algorithm passed to the timing binary.
    #[structopt(name = "SIGNATURE_ALGORITHM")]
    algorithm: String,

    /// Value of the swept parameter, e.g. 10 or 1500.
    #[structopt(name = "VALUE")]
    value: String,

    /// Swept parameter: initcwnd or mtu.
    #[structopt(name = "MODE")]
    axis: SweepAxis,

    /// Driver setting in TOML. Built-in defaults are used when absent.
    #[structopt(short = "s", long = "setting", parse(from_os_str))]
    setting: Option<PathBuf>,
}

fn run(opt: &Opt) -> Result<()> {
    let setting = match opt.setting {
        Some(ref path) => Setting::init(path)?,
        None => Setting::default(),
    };
    debug!("{:?}", setting);

    let experiment = Experiment::new(&opt.algorithm, opt.axis, &opt.value)?;
    let mut shaper = NetemPair::new(&setting);
    let timer = HandshakeTimer::new(&setting)?;
    for path in experiment.run(&setting, &mut shaper, &timer)? {
        info!("done: {}", path.display());
    }
    Ok(())
}

fn main() {
    evaluation::init_logger();
    let opt = Opt::from_args();

    if let Err(ref e) = run(&opt) {
        log_chain(e);
        ::std::process::exit(1);
    }
}
