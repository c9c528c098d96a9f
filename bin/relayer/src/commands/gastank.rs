//! Gas Tank Subcommand

use crate::flags::GlobalArgs;
use clap::Parser;

/// The `gastank` Subcommand
///
/// Runs a single gas tank relay cycle and reports the gas accounting of both legs.
///
/// # Usage
///
/// ```sh
/// gastank-relayer gastank --num-nested-messages 5
/// ```
#[derive(Parser, PartialEq, Eq, Debug, Clone)]
#[command(about = "Runs a single gas tank relay cycle")]
pub(crate) struct GasTankCommand {
    /// Number of nested messages the relayed message fans out into.
    #[arg(long, default_value_t = 5)]
    pub(crate) num_nested_messages: u64,
}

impl GasTankCommand {
    /// Runs the subcommand.
    pub(crate) async fn run(self, args: &GlobalArgs) -> anyhow::Result<()> {
        let orchestrator = args.orchestrator()?;
        let outcome = orchestrator.run(self.num_nested_messages).await?;
        outcome.relay.log();
        outcome.claim.log();

        let deltas = outcome.deltas();
        tracing::info!(
            target: "gas",
            message_hash = %outcome.message_hash,
            relay_gas_delta = deltas.relay,
            claim_gas_delta = deltas.claim,
            balance_matches = outcome.balance_matches(),
            "Relay cycle completed"
        );
        Ok(())
    }
}
