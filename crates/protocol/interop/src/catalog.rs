//! Addresses of the contracts taking part in a gas tank relay.

use alloy_primitives::{Address, address};

/// The `CrossL2Inbox` predeploy.
pub const CROSS_L2_INBOX: Address = address!("4200000000000000000000000000000000000022");

/// The `L2ToL2CrossDomainMessenger` predeploy.
pub const L2_TO_L2_CROSS_DOMAIN_MESSENGER: Address =
    address!("4200000000000000000000000000000000000023");

/// The `SuperchainTokenBridge` predeploy.
pub const SUPERCHAIN_TOKEN_BRIDGE: Address = address!("4200000000000000000000000000000000000028");

/// The `SuperchainERC20` test token deployed by supersim.
pub const SUPERSIM_TOKEN: Address = address!("420beef000000000000000000000000000000001");

/// The default source chain.
pub const DEFAULT_SOURCE_CHAIN_ID: u64 = 901;

/// The default destination chain.
pub const DEFAULT_DESTINATION_CHAIN_ID: u64 = 902;

/// Addresses written by the gas tank deployment script.
///
/// The keys mirror the deployment file, which names each contract after the chain it lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Deployment {
    /// The gas tank on the source chain.
    #[serde(rename = "gasTank901")]
    pub source_gas_tank: Address,
    /// The gas tank on the destination chain.
    #[serde(rename = "gasTank902")]
    pub destination_gas_tank: Address,
    /// The nested message sender on the destination chain.
    #[serde(rename = "messageSender902")]
    pub message_sender: Address,
}

/// Every contract address and chain id a relay cycle touches.
///
/// Built once at startup and handed to the orchestrator; never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractCatalog {
    /// Chain the messages originate on.
    pub source_chain_id: u64,
    /// Chain the messages are relayed to.
    pub destination_chain_id: u64,
    /// The `L2ToL2CrossDomainMessenger`, identical on both chains.
    pub messenger: Address,
    /// The `SuperchainTokenBridge`, identical on both chains.
    pub token_bridge: Address,
    /// The `CrossL2Inbox`, identical on both chains.
    pub cross_l2_inbox: Address,
    /// The test token bridged by the token relay.
    pub token: Address,
    /// The gas tank on the source chain.
    pub source_gas_tank: Address,
    /// The gas tank on the destination chain.
    pub destination_gas_tank: Address,
    /// The nested message sender on the destination chain.
    pub message_sender: Address,
}

impl ContractCatalog {
    /// Creates a catalog with the predeploy addresses and the given deployment.
    pub const fn new(deployment: Deployment) -> Self {
        Self {
            source_chain_id: DEFAULT_SOURCE_CHAIN_ID,
            destination_chain_id: DEFAULT_DESTINATION_CHAIN_ID,
            messenger: L2_TO_L2_CROSS_DOMAIN_MESSENGER,
            token_bridge: SUPERCHAIN_TOKEN_BRIDGE,
            cross_l2_inbox: CROSS_L2_INBOX,
            token: SUPERSIM_TOKEN,
            source_gas_tank: deployment.source_gas_tank,
            destination_gas_tank: deployment.destination_gas_tank,
            message_sender: deployment.message_sender,
        }
    }

    /// Creates a catalog holding only the predeploys and the test token.
    ///
    /// The gas tanks and the message sender are left at the zero address, so the catalog only
    /// serves flows that never touch them, such as the token relay.
    pub const fn predeploys() -> Self {
        Self::new(Deployment {
            source_gas_tank: Address::ZERO,
            destination_gas_tank: Address::ZERO,
            message_sender: Address::ZERO,
        })
    }

    /// Overrides the source and destination chain ids.
    pub const fn with_chain_ids(mut self, source: u64, destination: u64) -> Self {
        self.source_chain_id = source;
        self.destination_chain_id = destination;
        self
    }
}
