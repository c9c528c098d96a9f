//! Logging flags and tracing subscriber setup.

use crate::{CliError, CliResult};
use clap::{ArgAction, Parser};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Logging arguments shared by every subcommand.
#[derive(Parser, Default, Clone, Debug, PartialEq, Eq)]
pub struct LogArgs {
    /// Verbosity level. Logs at info by default, `-v` enables debug and `-vv` trace.
    #[arg(long = "verbosity", short = 'v', action = ArgAction::Count, global = true)]
    pub v: u8,
    /// Disable colored log output.
    #[arg(long = "log.no-color", visible_alias = "log-no-color", global = true)]
    pub no_color: bool,
}

impl LogArgs {
    /// The most verbose level enabled by the flags.
    pub const fn level(&self) -> LevelFilter {
        match self.v {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Installs the global tracing subscriber.
    pub fn init_tracing(&self) -> CliResult<()> {
        init_tracing_subscriber(self.v, !self.no_color, None)
    }
}

/// Installs a `fmt` subscriber logging at the level selected by `verbosity`.
///
/// `RUST_LOG` overrides the verbosity when set. An explicit `env_filter` overrides both.
pub fn init_tracing_subscriber(
    verbosity: u8,
    ansi: bool,
    env_filter: Option<EnvFilter>,
) -> CliResult<()> {
    let level = LogArgs { v: verbosity, no_color: !ansi }.level();
    let filter = env_filter.unwrap_or_else(|| {
        EnvFilter::builder().with_default_directive(level.into()).from_env_lossy()
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CliError::Tracing(e.to_string()))
}
