// src/main.rs
use std::process::exit;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap::error::ErrorKind;
use tracing::{debug, Level};

use ddosint::cli::{self, Args};
use ddosint::DdosintError;

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    // One request per invocation, so a single-threaded runtime is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(cli::run(args))?;
    Ok(())
}

fn main() {
    // Parse command line arguments; usage errors exit with 1 like any other failure
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit(0),
                _ => exit(1),
            }
        }
    };

    init_logging(args.verbose);

    if args.command.is_none() {
        let _ = Args::command().print_help();
        exit(1);
    }

    debug!("Starting ddosint v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args) {
        match e.downcast_ref::<DdosintError>() {
            Some(err) => eprintln!("{}", err.report()),
            None => eprintln!("Error: {:#}", e),
        }
        exit(1);
    }
}
