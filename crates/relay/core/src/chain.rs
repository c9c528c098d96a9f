//! The capabilities a relay cycle needs from each chain.

use alloy_primitives::{Address, B256, Bytes};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use gastank_interop::{BlockInfo, TxReceipt};
use gastank_providers::{
    CallRequest, ChainClient, ChainClientError, DriverError, TransactionDriver, TxIntent,
};

/// A chain the orchestrator can read from, simulate calls against and submit transactions to.
#[async_trait]
pub trait RelayChain: Send + Sync {
    /// The chain id.
    fn chain_id(&self) -> u64;

    /// Executes a read-only call from `from` against the latest state.
    async fn simulate(
        &self,
        from: Option<Address>,
        to: Address,
        input: Bytes,
    ) -> Result<Bytes, ChainClientError>;

    /// Returns the block with the given hash.
    async fn block(&self, hash: B256) -> Result<BlockInfo, ChainClientError>;

    /// Signs `intent` with `signer` and waits for its successful receipt.
    async fn submit(
        &self,
        signer: &PrivateKeySigner,
        intent: TxIntent,
    ) -> Result<TxReceipt, DriverError>;
}

#[async_trait]
impl<C: ChainClient> RelayChain for TransactionDriver<C> {
    fn chain_id(&self) -> u64 {
        Self::chain_id(self)
    }

    async fn simulate(
        &self,
        from: Option<Address>,
        to: Address,
        input: Bytes,
    ) -> Result<Bytes, ChainClientError> {
        let request = CallRequest { from, to, input, ..Default::default() };
        self.client().call(&request, None).await
    }

    async fn block(&self, hash: B256) -> Result<BlockInfo, ChainClientError> {
        self.client().block_by_hash(hash).await
    }

    async fn submit(
        &self,
        signer: &PrivateKeySigner,
        intent: TxIntent,
    ) -> Result<TxReceipt, DriverError> {
        self.send(signer, &intent).await
    }
}
