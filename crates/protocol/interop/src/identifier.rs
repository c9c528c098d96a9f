//! The cross chain message [`Identifier`].

use crate::{BlockInfo, EventLog, MessageIdentifierAbi};
use alloy_primitives::{Address, U256};
use derive_more::Display;

/// An [`Identifier`] uniquely names a log emitted by a chain within the dependency set.
///
/// It is passed alongside the reconstructed payload to the destination contracts, which hand it
/// to the `CrossL2Inbox` for validation.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[display("{{{origin} {block_number} {log_index} {timestamp} {chain_id}}}")]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    /// The contract that emitted the log.
    pub origin: Address,
    /// The block number that the log was emitted in.
    pub block_number: u64,
    /// The index of the log within the block.
    pub log_index: u64,
    /// The timestamp of the block.
    pub timestamp: u64,
    /// The chain ID of the chain that emitted the log.
    pub chain_id: u64,
}

impl Identifier {
    /// Builds the [`Identifier`] of `log`, which was included in `block` on `chain_id`.
    pub const fn from_log(log: &EventLog, block: &BlockInfo, chain_id: u64) -> Self {
        Self {
            origin: log.address(),
            block_number: block.number,
            log_index: log.log_index,
            timestamp: block.timestamp,
            chain_id,
        }
    }
}

impl From<Identifier> for MessageIdentifierAbi {
    fn from(id: Identifier) -> Self {
        Self {
            origin: id.origin,
            blockNumber: U256::from(id.block_number),
            logIndex: U256::from(id.log_index),
            timestamp: U256::from(id.timestamp),
            chainId: U256::from(id.chain_id),
        }
    }
}
