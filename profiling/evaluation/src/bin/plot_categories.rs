//! Plot median handshake time against initcwnd at fixed packet loss values,
//! one chart per signature scheme family.
extern crate evaluation;
#[macro_use]
extern crate log;
extern crate structopt;

use evaluation::errors::*;
use evaluation::figures::{category_filter, plot_categories};
use evaluation::{scan, Jitter, ResultIndex, SweepAxis};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "plot_categories")]
#[structopt(about = "Compare signature scheme families across initcwnd values")]
struct Opt {
    /// Root of the result tree (`initcwnd=<v>/latency=<v>/<alg>.csv`).
    #[structopt(short = "d", long = "data", default_value = "data", parse(from_os_str))]
    data: PathBuf,

    /// Directory the charts are written to.
    #[structopt(short = "o", long = "out", default_value = "plots", parse(from_os_str))]
    out: PathBuf,

    /// Seed of the render-only jitter.
    #[structopt(long = "seed", default_value = "0")]
    seed: u64,

    /// Only use the given latency directory (ms).
    #[structopt(short = "l", long = "latency")]
    latency: Option<f64>,
}

fn run(opt: &Opt) -> Result<()> {
    let filter = category_filter(opt.latency);
    let files = scan(&opt.data, SweepAxis::Initcwnd, &filter)?;
    if files.is_empty() {
        return Err(ErrorKind::NoData(opt.data.display().to_string()).into());
    }

    let index = ResultIndex::build(&files);
    let written = plot_categories(&index, &opt.out, &mut Jitter::new(opt.seed))?;
    info!("wrote {} charts to {}", written.len(), opt.out.display());
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
