//! Sweep Subcommand

use crate::flags::GlobalArgs;
use anyhow::Context;
use clap::Parser;
use gastank_relay::sweep;
use std::path::PathBuf;

/// The `sweep` Subcommand
///
/// Runs one gas tank relay cycle per nested message count, from zero up to
/// `--max-nested-messages`, and writes the gas deltas of the successful cycles to a JSON file.
///
/// # Usage
///
/// ```sh
/// gastank-relayer sweep --max-nested-messages 60 --output gas_analysis.json
/// ```
#[derive(Parser, PartialEq, Eq, Debug, Clone)]
#[command(about = "Runs relay cycles over a range of nested message counts")]
pub(crate) struct SweepCommand {
    /// Largest nested message count to run, inclusive.
    #[arg(long, default_value_t = 60)]
    pub(crate) max_nested_messages: u64,
    /// Where to write the report.
    #[arg(long, short = 'o', default_value = "gas_analysis.json")]
    pub(crate) output: PathBuf,
}

impl SweepCommand {
    /// Runs the subcommand.
    pub(crate) async fn run(self, args: &GlobalArgs) -> anyhow::Result<()> {
        let orchestrator = args.orchestrator()?;
        let report = sweep(&orchestrator, self.max_nested_messages).await;
        report
            .write_json(&self.output)
            .with_context(|| format!("failed to write {}", self.output.display()))?;
        tracing::info!(
            target: "relay",
            points = report.len(),
            output = %self.output.display(),
            "Wrote sweep report"
        );
        Ok(())
    }
}
