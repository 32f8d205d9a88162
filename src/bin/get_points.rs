//! Dakota analysis driver: `get-points <params> <results>`.
//!
//! Dakota runs this once per evaluation. The results file echoes the value of
//! the uncertain variable so the points Dakota chose can be read back.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use windfarm_uq::cli::init_logging;
use windfarm_uq::driver::run_analysis_driver;

#[derive(Parser, Debug)]
#[command(name = "get-points")]
#[command(version)]
#[command(about = "Analysis driver that records the points chosen by Dakota")]
struct Args {
    /// Parameters file written by Dakota
    params: PathBuf,

    /// Results file to write
    results: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    run_analysis_driver(&args.params, &args.results)
        .with_context(|| format!("evaluating {}", args.params.display()))
}
