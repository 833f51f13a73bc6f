//! Summarize a result tree as CSV: count, median, 90th percentile, mean and
//! standard error per (algorithm, swept value, packet loss).
extern crate evaluation;
#[macro_use]
extern crate log;
extern crate structopt;

use evaluation::errors::*;
use evaluation::{scan, summarize, write_report, ScanFilter, SweepAxis};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "summary")]
#[structopt(about = "Summarize handshake measurements as CSV")]
struct Opt {
    /// Swept parameter: initcwnd or mtu.
    #[structopt(name = "AXIS")]
    axis: SweepAxis,

    /// Root of the result tree.
    #[structopt(short = "d", long = "data", default_value = "data", parse(from_os_str))]
    data: PathBuf,

    /// Output file. Writes to stdout when absent.
    #[structopt(short = "o", long = "out", parse(from_os_str))]
    out: Option<PathBuf>,

    /// Only use the given latency directory (ms).
    #[structopt(short = "l", long = "latency")]
    latency: Option<f64>,
}

fn run(opt: &Opt) -> Result<()> {
    let filter = ScanFilter::new().latency(opt.latency);
    let files = scan(&opt.data, opt.axis, &filter)?;
    if files.is_empty() {
        return Err(ErrorKind::NoData(opt.data.display().to_string()).into());
    }

    let records = summarize(&files, opt.axis);
    match opt.out {
        Some(ref path) => {
            let file = File::create(path).chain_err(|| format!("failed to create {}", path.display()))?;
            write_report(&records, file)?;
            info!("wrote {} rows to {}", records.len(), path.display());
        }
        None => write_report(&records, io::stdout())?,
    }
    Ok(())
}

fn main() {
    evaluation::init_logger();
    let opt = Opt::from_args();
    debug!("{:?}", opt);

    if let Err(ref e) = run(&opt) {
        log_chain(e);
        ::std::process::exit(1);
    }
}
