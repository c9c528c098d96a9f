//! Contains the relayer CLI.

use crate::{
    commands::{GasTankCommand, RelayCommand, SweepCommand},
    flags::GlobalArgs,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use gastank_cli::cli_styles;

/// Subcommands of the relayer.
#[derive(Subcommand, Clone, Debug)]
pub(crate) enum Commands {
    /// Bridges test tokens and relays the bridge message.
    Relay(RelayCommand),
    /// Runs a single gas tank relay cycle.
    #[command(name = "gastank")]
    GasTank(GasTankCommand),
    /// Runs gas tank relay cycles over a range of nested message counts.
    Sweep(SweepCommand),
}

/// Relays messages between OP stack chains through the gas tank and reports how the declared
/// costs compare to the gas actually used.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, styles = cli_styles(), long_about = None)]
pub(crate) struct Cli {
    /// Global arguments for the CLI.
    #[command(flatten)]
    pub(crate) global: GlobalArgs,
    /// The subcommand to run.
    #[command(subcommand)]
    pub(crate) subcommand: Commands,
}

impl Cli {
    /// Runs the CLI.
    pub(crate) fn run(self) -> Result<()> {
        self.global.log_args.init_tracing()?;

        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
        runtime.block_on(async move {
            match self.subcommand {
                Commands::Relay(cmd) => cmd.run(&self.global).await,
                Commands::GasTank(cmd) => cmd.run(&self.global).await,
                Commands::Sweep(cmd) => cmd.run(&self.global).await,
            }
        })
    }
}
