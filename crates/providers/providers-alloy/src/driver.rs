//! The [`TransactionDriver`] builds, signs, submits and confirms transactions.

use crate::{CallRequest, ChainClient, ChainClientError};
use alloy_eips::{eip2718::Encodable2718, eip2930::AccessList};
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use gastank_interop::TxReceipt;
use std::time::Duration;
use thiserror::Error;

/// Gas limit attached to every transaction.
pub const DEFAULT_GAS_LIMIT: u64 = 500_000;

/// How long a submitted transaction may stay unmined.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between two receipt polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A failure while driving a transaction to inclusion.
#[derive(Error, Debug)]
pub enum DriverError {
    /// The pending nonce of the signer could not be fetched.
    #[error("failed to fetch nonce for {address}: {source}")]
    Nonce {
        /// The signer.
        address: Address,
        /// The underlying client error.
        #[source]
        source: ChainClientError,
    },
    /// The latest block could not be fetched.
    #[error("failed to fetch the latest block: {0}")]
    LatestBlock(#[source] ChainClientError),
    /// The latest block carries no base fee.
    #[error("block {0} has no base fee")]
    MissingBaseFee(u64),
    /// The transaction could not be signed.
    #[error("failed to sign transaction: {0}")]
    Signing(String),
    /// The node rejected the transaction.
    #[error("failed to submit transaction: {0}")]
    Submission(#[source] ChainClientError),
    /// The transaction was not mined before the confirmation timeout.
    #[error(
        "transaction {hash} not mined within {timeout:?}{}",
        .last_error.as_ref().map(|e| format!(", last poll failed: {e}")).unwrap_or_default()
    )]
    ConfirmationTimeout {
        /// The submitted transaction.
        hash: B256,
        /// The timeout that elapsed.
        timeout: Duration,
        /// The error of the last failed receipt poll, if the node stopped answering.
        #[source]
        last_error: Option<ChainClientError>,
    },
    /// The transaction was mined but reverted.
    #[error("transaction {hash} reverted: {}", .reason.as_deref().unwrap_or("no revert reason"))]
    Reverted {
        /// The reverted transaction.
        hash: B256,
        /// The revert reason recovered by replaying the call, if any.
        reason: Option<String>,
    },
}

/// EIP-1559 fee parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eip1559Fees {
    /// The fee cap.
    pub max_fee_per_gas: u128,
    /// The priority fee.
    pub max_priority_fee_per_gas: u128,
}

impl Eip1559Fees {
    /// Derives the fees from the base fee of the latest block.
    ///
    /// The cap is twice the base fee and the tip is zero, so the sender only ever pays the base
    /// fee. This is the same cost model the gas tank uses when declaring relay and claim costs.
    pub const fn from_base_fee(base_fee: u64) -> Self {
        Self { max_fee_per_gas: 2 * base_fee as u128, max_priority_fee_per_gas: 0 }
    }
}

/// What a transaction should do, independent of who signs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxIntent {
    /// The called contract.
    pub to: Address,
    /// Value sent with the call.
    pub value: U256,
    /// The call data.
    pub input: Bytes,
    /// Storage slots the call must pre-declare.
    pub access_list: Option<AccessList>,
}

impl TxIntent {
    /// A call to `to` with `input`, no value and no access list.
    pub fn call(to: Address, input: impl Into<Bytes>) -> Self {
        Self { to, input: input.into(), ..Default::default() }
    }

    /// Attaches `value` to the call.
    pub const fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Declares `access_list` on the transaction.
    pub fn with_access_list(mut self, access_list: AccessList) -> Self {
        self.access_list = Some(access_list);
        self
    }

    /// The read-only call replaying this intent from `from`.
    pub fn as_call(&self, from: Address) -> CallRequest {
        CallRequest::new(self.to, self.input.clone()).from(from).value(self.value)
    }
}

/// Drives transactions on a single chain.
#[derive(Debug, Clone)]
pub struct TransactionDriver<C> {
    client: C,
    chain_id: u64,
    gas_limit: u64,
    confirmation_timeout: Duration,
    poll_interval: Duration,
}

impl<C: ChainClient> TransactionDriver<C> {
    /// Creates a new [`TransactionDriver`] for `chain_id` with the default limits.
    pub const fn new(client: C, chain_id: u64) -> Self {
        Self {
            client,
            chain_id,
            gas_limit: DEFAULT_GAS_LIMIT,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets the gas limit of every transaction.
    pub const fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Sets how long to wait for a transaction to be mined.
    pub const fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    /// Sets the receipt polling interval.
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns the chain client.
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Returns the chain id transactions are signed for.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Signs `intent` with `signer`, submits it and waits for a successful receipt.
    pub async fn send(
        &self,
        signer: &PrivateKeySigner,
        intent: &TxIntent,
    ) -> Result<TxReceipt, DriverError> {
        let from = signer.address();
        let nonce = self
            .client
            .pending_nonce(from)
            .await
            .map_err(|source| DriverError::Nonce { address: from, source })?;

        let latest = self.client.latest_block().await.map_err(DriverError::LatestBlock)?;
        let base_fee = latest.base_fee_per_gas.ok_or(DriverError::MissingBaseFee(latest.number))?;
        let fees = Eip1559Fees::from_base_fee(base_fee);
        debug!(
            target: "driver",
            chain_id = self.chain_id,
            %from,
            nonce,
            base_fee,
            max_fee_per_gas = fees.max_fee_per_gas,
            "Prepared transaction"
        );

        let mut request = TransactionRequest::default()
            .with_from(from)
            .with_to(intent.to)
            .with_value(intent.value)
            .with_input(intent.input.clone())
            .with_chain_id(self.chain_id)
            .with_nonce(nonce)
            .with_gas_limit(self.gas_limit)
            .with_max_fee_per_gas(fees.max_fee_per_gas)
            .with_max_priority_fee_per_gas(fees.max_priority_fee_per_gas);
        if let Some(access_list) = &intent.access_list {
            request = request.with_access_list(access_list.clone());
        }

        let wallet = EthereumWallet::from(signer.clone());
        let envelope =
            request.build(&wallet).await.map_err(|e| DriverError::Signing(e.to_string()))?;
        let hash = self
            .client
            .send_raw_transaction(&envelope.encoded_2718())
            .await
            .map_err(DriverError::Submission)?;
        debug!(
            target: "driver",
            chain_id = self.chain_id,
            %hash,
            to = %intent.to,
            "Submitted transaction"
        );

        let mut last_error = None;
        let polled = tokio::time::timeout(
            self.confirmation_timeout,
            self.wait_for_receipt(hash, &mut last_error),
        )
        .await;
        let receipt = polled.map_err(|_| DriverError::ConfirmationTimeout {
            hash,
            timeout: self.confirmation_timeout,
            last_error,
        })?;

        if !receipt.status {
            let reason = self.revert_reason(from, intent, receipt.block_number).await;
            warn!(
                target: "driver",
                chain_id = self.chain_id,
                %hash,
                ?reason,
                "Transaction reverted"
            );
            return Err(DriverError::Reverted { hash, reason });
        }

        debug!(
            target: "driver",
            chain_id = self.chain_id,
            %hash,
            block = receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction mined"
        );
        Ok(receipt)
    }

    /// Polls until `hash` is mined. `last_error` holds the error of the latest failed poll.
    async fn wait_for_receipt(
        &self,
        hash: B256,
        last_error: &mut Option<ChainClientError>,
    ) -> TxReceipt {
        loop {
            match self.client.transaction_receipt(hash).await {
                Ok(Some(receipt)) => return receipt,
                Ok(None) => *last_error = None,
                Err(err) => {
                    trace!(target: "driver", %hash, %err, "Receipt retrieval failed");
                    *last_error = Some(err);
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Replays the reverted call at its block to recover a readable revert reason.
    async fn revert_reason(&self, from: Address, intent: &TxIntent, block: u64) -> Option<String> {
        match self.client.call(&intent.as_call(from), Some(block)).await {
            Ok(_) => None,
            Err(ChainClientError::Reverted(reason)) => Some(reason),
            Err(err) => {
                debug!(target: "driver", %err, "Failed to replay reverted transaction");
                None
            }
        }
    }
}
