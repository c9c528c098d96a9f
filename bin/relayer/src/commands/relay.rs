//! Relay Subcommand

use crate::flags::GlobalArgs;
use alloy_primitives::U256;
use clap::Parser;
use gastank_relay::DEFAULT_TOKEN_AMOUNT;

/// The `relay` Subcommand
///
/// Mints test tokens on the source chain, bridges them to the destination chain and relays the
/// bridge message through the messenger.
///
/// # Usage
///
/// ```sh
/// gastank-relayer relay [OPTIONS]
/// ```
#[derive(Parser, PartialEq, Eq, Debug, Clone)]
#[command(about = "Bridges test tokens and relays the bridge message")]
pub(crate) struct RelayCommand {
    /// Amount of test tokens to mint and bridge.
    #[arg(long, default_value_t = DEFAULT_TOKEN_AMOUNT)]
    pub(crate) amount: u64,
}

impl RelayCommand {
    /// Runs the subcommand.
    pub(crate) async fn run(self, args: &GlobalArgs) -> anyhow::Result<()> {
        let orchestrator = args.token_orchestrator()?;
        let outcome = orchestrator.relay_tokens(U256::from(self.amount)).await?;
        tracing::info!(
            target: "relay",
            identifier = %outcome.identifier,
            send = %outcome.send.transaction_hash,
            relay = %outcome.relay.transaction_hash,
            "Token relay complete"
        );
        Ok(())
    }
}
