//! Global arguments for the CLI.

use alloy_signer_local::PrivateKeySigner;
use clap::Parser;
use gastank_cli::{CliError, CliResult, LogArgs, load_catalog};
use gastank_interop::{ContractCatalog, DEFAULT_DESTINATION_CHAIN_ID, DEFAULT_SOURCE_CHAIN_ID};
use gastank_providers::{
    AlloyChainClient, DEFAULT_CONFIRMATION_TIMEOUT, DEFAULT_GAS_LIMIT, DEFAULT_ORACLE_TIMEOUT,
    HttpAccessListOracle, TransactionDriver,
};
use gastank_relay::{DepositPolicy, RelayConfig, RelayOrchestrator, Signers};
use std::{path::PathBuf, time::Duration};
use url::Url;

/// First well-known account of the local devnet.
const DEVNET_KEY_0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Second well-known account of the local devnet.
const DEVNET_KEY_1: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

/// The orchestrator talking to live chains.
pub(crate) type LiveOrchestrator = RelayOrchestrator<
    TransactionDriver<AlloyChainClient>,
    TransactionDriver<AlloyChainClient>,
    HttpAccessListOracle,
>;

/// Global arguments for the CLI.
#[derive(Parser, Clone, Debug)]
pub(crate) struct GlobalArgs {
    /// Logging arguments.
    #[command(flatten)]
    pub(crate) log_args: LogArgs,
    /// RPC endpoint of the source chain.
    #[arg(
        long,
        global = true,
        default_value = "http://127.0.0.1:9545",
        env = "GASTANK_SOURCE_RPC"
    )]
    pub(crate) source_rpc: Url,
    /// RPC endpoint of the destination chain.
    #[arg(
        long,
        global = true,
        default_value = "http://127.0.0.1:9546",
        env = "GASTANK_DESTINATION_RPC"
    )]
    pub(crate) destination_rpc: Url,
    /// Admin RPC endpoint serving access lists for cross chain messages.
    #[arg(long, global = true, default_value = "http://127.0.0.1:8420", env = "GASTANK_ADMIN_RPC")]
    pub(crate) admin_rpc: Url,
    /// Chain id of the source chain.
    #[arg(long, global = true, default_value_t = DEFAULT_SOURCE_CHAIN_ID)]
    pub(crate) source_chain_id: u64,
    /// Chain id of the destination chain.
    #[arg(long, global = true, default_value_t = DEFAULT_DESTINATION_CHAIN_ID)]
    pub(crate) destination_chain_id: u64,
    /// Private key of the gas provider. Sends messages and funds the gas tank.
    #[arg(
        long,
        global = true,
        default_value = DEVNET_KEY_0,
        hide_default_value = true,
        env = "GASTANK_GAS_PROVIDER_KEY"
    )]
    pub(crate) gas_provider_key: String,
    /// Private key of the relayer. Relays messages and claims their cost.
    #[arg(
        long,
        global = true,
        default_value = DEVNET_KEY_1,
        hide_default_value = true,
        env = "GASTANK_RELAYER_KEY"
    )]
    pub(crate) relayer_key: String,
    /// Path to the deployment file written by the gas tank deployment script.
    #[arg(
        long,
        global = true,
        default_value = "supersim-contracts.json",
        env = "GASTANK_CONTRACTS"
    )]
    pub(crate) contracts: PathBuf,
    /// Seconds to wait for a transaction receipt.
    #[arg(long, global = true, default_value_t = DEFAULT_CONFIRMATION_TIMEOUT.as_secs())]
    pub(crate) confirmation_timeout: u64,
    /// Gas limit of every transaction.
    #[arg(long, global = true, default_value_t = DEFAULT_GAS_LIMIT)]
    pub(crate) gas_limit: u64,
    /// How the gas tank is funded: `top-up`, `budget:<wei>` or `skip`.
    #[arg(long, global = true, default_value_t = DepositPolicy::TopUpToCap)]
    pub(crate) deposit_policy: DepositPolicy,
}

impl GlobalArgs {
    /// Returns the tunables of a relay cycle.
    pub(crate) fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            deposit_policy: self.deposit_policy,
            gas_limit: self.gas_limit,
            confirmation_timeout: Duration::from_secs(self.confirmation_timeout),
            ..Default::default()
        }
    }

    /// Parses the private keys.
    pub(crate) fn signers(&self) -> CliResult<Signers> {
        let parse = |name, key: &str| {
            key.parse::<PrivateKeySigner>().map_err(|source| CliError::InvalidKey { name, source })
        };
        Ok(Signers {
            gas_provider: parse("gas provider", &self.gas_provider_key)?,
            relayer: parse("relayer", &self.relayer_key)?,
        })
    }

    /// Loads the contract catalog.
    pub(crate) fn catalog(&self) -> CliResult<ContractCatalog> {
        load_catalog(&self.contracts, self.source_chain_id, self.destination_chain_id)
    }

    /// Builds an orchestrator connected to the configured endpoints, with the deployed contracts.
    pub(crate) fn orchestrator(&self) -> anyhow::Result<LiveOrchestrator> {
        self.connect(self.catalog()?)
    }

    /// Builds an orchestrator that only knows the predeploys.
    ///
    /// Does not read the deployment file.
    pub(crate) fn token_orchestrator(&self) -> anyhow::Result<LiveOrchestrator> {
        let catalog = ContractCatalog::predeploys()
            .with_chain_ids(self.source_chain_id, self.destination_chain_id);
        self.connect(catalog)
    }

    fn connect(&self, catalog: ContractCatalog) -> anyhow::Result<LiveOrchestrator> {
        let config = self.relay_config();
        let signers = self.signers()?;
        let source = config.driver(
            AlloyChainClient::new_http(self.source_rpc.clone()),
            catalog.source_chain_id,
        );
        let destination = config.driver(
            AlloyChainClient::new_http(self.destination_rpc.clone()),
            catalog.destination_chain_id,
        );
        let oracle = HttpAccessListOracle::new(self.admin_rpc.clone(), DEFAULT_ORACLE_TIMEOUT)?;

        tracing::info!(
            target: "relay",
            source = %self.source_rpc,
            destination = %self.destination_rpc,
            gas_provider = %signers.gas_provider.address(),
            relayer = %signers.relayer.address(),
            deposit_policy = %config.deposit_policy,
            "Connected"
        );
        Ok(RelayOrchestrator::new(
            catalog,
            source,
            destination,
            oracle,
            signers,
            config.deposit_policy,
        ))
    }
}
