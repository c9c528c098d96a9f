//! Chain access for the relay, backed by an alloy [`RootProvider`].

use alloy_eips::BlockId;
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types_eth::{Block, TransactionReceipt, TransactionRequest};
use alloy_transport::TransportError;
use async_trait::async_trait;
use gastank_interop::{BlockInfo, EventLog, TxReceipt};
use thiserror::Error;
use url::Url;

/// An error returned by a [`ChainClient`].
#[derive(Error, Debug)]
pub enum ChainClientError {
    /// The endpoint could not be reached or returned a transport level error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// A read-only call reverted.
    #[error("execution reverted: {0}")]
    Reverted(String),
    /// The requested block does not exist.
    #[error("block {0} not found")]
    BlockNotFound(BlockId),
    /// The node returned a receipt without a field the relay relies on.
    #[error("receipt for {hash} is missing its {field}")]
    IncompleteReceipt {
        /// The transaction hash.
        hash: B256,
        /// The missing field.
        field: &'static str,
    },
}

impl ChainClientError {
    /// Classifies an `eth_call` failure, extracting the revert reason when the node returned one.
    ///
    /// Only error responses carrying revert data or an `execution reverted` message are reverts.
    pub fn from_call(err: TransportError) -> Self {
        let reason = err.as_error_resp().and_then(|payload| match payload.as_revert_data() {
            Some(data) => Some(
                alloy_sol_types::decode_revert_reason(&data)
                    .unwrap_or_else(|| payload.message.to_string()),
            ),
            None if payload.message.starts_with("execution reverted") => {
                Some(payload.message.to_string())
            }
            None => None,
        });
        match reason {
            Some(reason) => Self::Reverted(reason),
            None => Self::Transport(err),
        }
    }
}

/// A read-only call against the latest or a historical state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRequest {
    /// The caller, if the call depends on `msg.sender`.
    pub from: Option<Address>,
    /// The called contract.
    pub to: Address,
    /// Value attached to the call.
    pub value: U256,
    /// The call data.
    pub input: Bytes,
}

impl CallRequest {
    /// Creates a call to `to` with `input` and no caller.
    pub fn new(to: Address, input: impl Into<Bytes>) -> Self {
        Self { to, input: input.into(), ..Default::default() }
    }

    /// Sets the caller.
    pub const fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Sets the attached value.
    pub const fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// The JSON-RPC surface of a chain that the relay depends on.
///
/// Kept narrow so the transaction driver can be exercised against an in-memory chain.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Returns the next nonce of `address`, counting pending transactions.
    async fn pending_nonce(&self, address: Address) -> Result<u64, ChainClientError>;

    /// Returns the latest block.
    async fn latest_block(&self) -> Result<BlockInfo, ChainClientError>;

    /// Returns the block with the given hash.
    async fn block_by_hash(&self, hash: B256) -> Result<BlockInfo, ChainClientError>;

    /// Returns the block with the given number.
    async fn block_by_number(&self, number: u64) -> Result<BlockInfo, ChainClientError>;

    /// Executes `request` without creating a transaction, at `block` or at the latest block.
    async fn call(
        &self,
        request: &CallRequest,
        block: Option<u64>,
    ) -> Result<Bytes, ChainClientError>;

    /// Submits an EIP-2718 encoded, signed transaction and returns its hash.
    async fn send_raw_transaction(&self, encoded: &[u8]) -> Result<B256, ChainClientError>;

    /// Returns the receipt of `hash`, or `None` if it has not been mined yet.
    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TxReceipt>, ChainClientError>;
}

/// A [`ChainClient`] talking to an execution node over HTTP.
#[derive(Debug, Clone)]
pub struct AlloyChainClient {
    inner: RootProvider,
}

impl AlloyChainClient {
    /// Creates a new [`AlloyChainClient`] from an existing provider.
    pub const fn new(inner: RootProvider) -> Self {
        Self { inner }
    }

    /// Creates a new [`AlloyChainClient`] connected to `url`.
    pub fn new_http(url: Url) -> Self {
        Self::new(RootProvider::new_http(url))
    }

    async fn block(&self, id: BlockId) -> Result<BlockInfo, ChainClientError> {
        let block = self.inner.get_block(id).await?.ok_or(ChainClientError::BlockNotFound(id))?;
        Ok(block_info(&block))
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn pending_nonce(&self, address: Address) -> Result<u64, ChainClientError> {
        Ok(self.inner.get_transaction_count(address).pending().await?)
    }

    async fn latest_block(&self) -> Result<BlockInfo, ChainClientError> {
        self.block(BlockId::latest()).await
    }

    async fn block_by_hash(&self, hash: B256) -> Result<BlockInfo, ChainClientError> {
        self.block(BlockId::hash(hash)).await
    }

    async fn block_by_number(&self, number: u64) -> Result<BlockInfo, ChainClientError> {
        self.block(BlockId::number(number)).await
    }

    async fn call(
        &self,
        request: &CallRequest,
        block: Option<u64>,
    ) -> Result<Bytes, ChainClientError> {
        let mut tx = TransactionRequest::default()
            .with_to(request.to)
            .with_value(request.value)
            .with_input(request.input.clone());
        if let Some(from) = request.from {
            tx = tx.with_from(from);
        }
        let block = block.map_or_else(BlockId::latest, BlockId::number);
        self.inner.call(tx).block(block).await.map_err(ChainClientError::from_call)
    }

    async fn send_raw_transaction(&self, encoded: &[u8]) -> Result<B256, ChainClientError> {
        let pending = self.inner.send_raw_transaction(encoded).await?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TxReceipt>, ChainClientError> {
        match self.inner.get_transaction_receipt(hash).await? {
            Some(receipt) => tx_receipt(receipt).map(Some),
            None => Ok(None),
        }
    }
}

fn block_info(block: &Block) -> BlockInfo {
    BlockInfo {
        hash: block.header.hash,
        number: block.header.number,
        parent_hash: block.header.parent_hash,
        timestamp: block.header.timestamp,
        base_fee_per_gas: block.header.base_fee_per_gas,
    }
}

fn tx_receipt(receipt: TransactionReceipt) -> Result<TxReceipt, ChainClientError> {
    let hash = receipt.transaction_hash;
    let missing = |field| ChainClientError::IncompleteReceipt { hash, field };

    let block_hash = receipt.block_hash.ok_or_else(|| missing("block hash"))?;
    let block_number = receipt.block_number.ok_or_else(|| missing("block number"))?;
    let logs = receipt
        .inner
        .logs()
        .iter()
        .map(|log| -> Result<EventLog, ChainClientError> {
            Ok(EventLog {
                inner: log.inner.clone(),
                block_hash: log.block_hash.unwrap_or(block_hash),
                block_number: log.block_number.unwrap_or(block_number),
                log_index: log.log_index.ok_or_else(|| missing("log index"))?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TxReceipt {
        transaction_hash: hash,
        status: receipt.inner.status(),
        gas_used: receipt.gas_used,
        effective_gas_price: receipt.effective_gas_price,
        block_number,
        block_hash,
        logs,
    })
}
