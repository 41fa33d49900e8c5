mod app;
mod args;

use clap::Parser;
use env_logger::{Builder, Env};
use log::{debug, LevelFilter};
use std::error::Error;

fn main() {
    let args = args::Args::parse();

    let mut logger = Builder::from_env(Env::default().default_filter_or("info"));
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();
    debug!("args: {:?}", args);

    let res = args.settings().and_then(|settings| app::run_topsis(&settings));

    if let Err(e) = res {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(s) = source {
            eprintln!("  caused by: {}", s);
            source = s.source();
        }
        std::process::exit(1);
    }
}
