mod args;
mod report;

use clap::Parser;
use env_logger::Env;
use log::{debug, warn};
use snafu::ErrorCompat;
use std::error::Error;

fn main() {
    let args = args::Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();
    debug!("args: {:?}", args);

    let res = report::run_report(&args);

    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("{}: {}", e.kind(), e);
        let mut source = e.source();
        while let Some(s) = source {
            eprintln!("  caused by: {}", s);
            source = s.source();
        }
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
