//! The gas tank relayer.

use clap::Parser;

mod cli;
mod commands;
mod flags;

fn main() {
    gastank_cli::backtrace::enable();

    if let Err(err) = cli::Cli::parse().run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
