//! Receipt, log and block views used while reconstructing cross chain messages.

use crate::LocateError;
use alloy_primitives::{Address, B256, Log, LogData, U256};

/// A log emitted by a mined transaction, together with its position on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    /// The emitting contract and the raw topics/data.
    pub inner: Log,
    /// Hash of the block containing the log.
    pub block_hash: B256,
    /// Number of the block containing the log.
    pub block_number: u64,
    /// Index of the log within the block.
    pub log_index: u64,
}

impl EventLog {
    /// Returns the address of the contract that emitted the log.
    pub const fn address(&self) -> Address {
        self.inner.address
    }

    /// Returns the topics of the log. The first topic is the event selector.
    pub fn topics(&self) -> &[B256] {
        self.inner.data.topics()
    }

    /// Returns the topic and data portion of the log.
    pub const fn data(&self) -> &LogData {
        &self.inner.data
    }

    /// Returns `true` if the log was emitted by `address` and its selector is `topic`.
    pub fn matches(&self, address: Address, topic: B256) -> bool {
        self.inner.address == address && self.topics().first() == Some(&topic)
    }
}

/// The receipt of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Hash of the transaction.
    pub transaction_hash: B256,
    /// Whether the transaction executed successfully.
    pub status: bool,
    /// Gas consumed by the transaction.
    pub gas_used: u64,
    /// The price per unit of gas actually paid.
    pub effective_gas_price: u128,
    /// Number of the block that included the transaction.
    pub block_number: u64,
    /// Hash of the block that included the transaction.
    pub block_hash: B256,
    /// Logs emitted by the transaction, in emission order.
    pub logs: Vec<EventLog>,
}

impl TxReceipt {
    /// Finds the first log emitted by `address` whose selector is `topic`.
    pub fn find_log(&self, address: Address, topic: B256) -> Result<&EventLog, LocateError> {
        locate_log(&self.logs, address, topic)
    }

    /// The amount paid for the transaction, `gas_used * effective_gas_price`.
    pub fn cost(&self) -> U256 {
        U256::from(self.gas_used) * U256::from(self.effective_gas_price)
    }
}

/// Block metadata needed to build identifiers and reconcile fees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockInfo {
    /// The block hash.
    pub hash: B256,
    /// The block number.
    pub number: u64,
    /// The parent block hash.
    pub parent_hash: B256,
    /// The block timestamp, in seconds.
    pub timestamp: u64,
    /// The EIP-1559 base fee. `None` for pre-London blocks.
    pub base_fee_per_gas: Option<u64>,
}

/// Returns the first log in `logs` emitted by `address` with the selector `topic`.
pub fn locate_log(
    logs: &[EventLog],
    address: Address,
    topic: B256,
) -> Result<&EventLog, LocateError> {
    logs.iter()
        .find(|log| log.matches(address, topic))
        .ok_or(LocateError::NotFound { address, topic })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, address, b256};

    const EMITTER: Address = address!("4200000000000000000000000000000000000023");
    const SELECTOR: B256 =
        b256!("382409ac69001e11931a28435afef442cbfd20d9891907e8fa373ba7d351f320");

    fn log(address: Address, topics: Vec<B256>, log_index: u64) -> EventLog {
        EventLog {
            inner: Log { address, data: LogData::new_unchecked(topics, Bytes::new()) },
            block_hash: B256::ZERO,
            block_number: 1,
            log_index,
        }
    }

    #[test]
    fn test_locate_first_match() {
        let logs = vec![
            log(Address::ZERO, vec![SELECTOR], 0),
            log(EMITTER, vec![B256::repeat_byte(1)], 1),
            log(EMITTER, vec![SELECTOR], 2),
            log(EMITTER, vec![SELECTOR], 3),
        ];

        let found = locate_log(&logs, EMITTER, SELECTOR).unwrap();
        assert_eq!(found.log_index, 2);
    }

    #[test]
    fn test_locate_skips_anonymous_logs() {
        let logs = vec![log(EMITTER, vec![], 0)];
        assert_eq!(
            locate_log(&logs, EMITTER, SELECTOR),
            Err(LocateError::NotFound { address: EMITTER, topic: SELECTOR })
        );
    }

    #[test]
    fn test_locate_empty() {
        assert!(locate_log(&[], EMITTER, SELECTOR).is_err());
    }

    #[test]
    fn test_receipt_cost() {
        let receipt = TxReceipt {
            transaction_hash: B256::ZERO,
            status: true,
            gas_used: 21_000,
            effective_gas_price: 7,
            block_number: 1,
            block_hash: B256::ZERO,
            logs: vec![],
        };
        assert_eq!(receipt.cost(), U256::from(147_000));
    }
}
