//! create-static-map - command-line interface
//!
//! Renders a static map image with the `staticmaps` library and writes it
//! as PNG.

mod args;
mod error;
mod runner;

use clap::Parser;
use staticmaps::logging;
use staticmaps::provider::TileProvider;

use crate::args::Args;
use crate::error::CliError;

fn main() {
    let args = Args::parse();

    if args.lists_providers() {
        for name in TileProvider::builtin().keys() {
            println!("{}", name);
        }
        return;
    }

    let _log_guard = match logging::init_logging(args.log_level(), args.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e).exit(),
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to create async runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(runner::run(args)) {
        e.exit();
    }
}
