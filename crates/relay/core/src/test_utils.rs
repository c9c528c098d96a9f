//! Mock chains and oracle emulating the contracts of a relay cycle.

use crate::{DepositPolicy, RelayChain, RelayOrchestrator, Signers};
use alloy_eips::{
    BlockId,
    eip2930::{AccessList, AccessListItem},
};
use alloy_primitives::{Address, B256, Bytes, Log, U256, address};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use async_trait::async_trait;
use gastank_interop::{
    BlockInfo, CROSS_L2_INBOX, ContractCatalog, Deployment, EventLog, IGasTank,
    IL2ToL2CrossDomainMessenger, IMessageSender, ISuperchainTokenBridge, Identifier, Payload,
    SentMessage, TxReceipt,
};
use gastank_providers::{AccessListOracle, ChainClientError, DriverError, OracleError, TxIntent};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

/// The source gas tank of the mock deployment.
pub(crate) const SOURCE_GAS_TANK: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");
/// The destination gas tank of the mock deployment.
pub(crate) const DESTINATION_GAS_TANK: Address =
    address!("e7f1725e7734ce288f8367e1bb143e90bb3f0512");
/// The message sender of the mock deployment.
pub(crate) const MESSAGE_SENDER: Address = address!("9fe46736679d2d9a65f0992f2272de9f3c7fa6e0");

/// The message hash returned by the simulated `sendMessage`.
pub(crate) const MESSAGE_HASH: B256 = B256::repeat_byte(0xab);
/// Base fee of every mock block.
pub(crate) const BASE_FEE: u64 = 2;
/// Gas used by every mock transaction.
pub(crate) const GAS_USED: u64 = 200_000;
/// `MAX_DEPOSIT` of the mock source gas tank.
pub(crate) const MAX_DEPOSIT: u64 = 1_000_000_000;

pub(crate) fn catalog() -> ContractCatalog {
    ContractCatalog::new(Deployment {
        source_gas_tank: SOURCE_GAS_TANK,
        destination_gas_tank: DESTINATION_GAS_TANK,
        message_sender: MESSAGE_SENDER,
    })
}

pub(crate) fn signers() -> Signers {
    Signers { gas_provider: PrivateKeySigner::random(), relayer: PrivateKeySigner::random() }
}

/// A transaction submitted to a [`MockChain`].
#[derive(Debug, Clone)]
pub(crate) struct Submitted {
    /// The signer's address.
    pub(crate) from: Address,
    /// What was submitted.
    pub(crate) intent: TxIntent,
}

/// Mutable state of a [`MockChain`].
#[derive(Debug, Clone)]
pub(crate) struct MockChainStorage {
    /// Every submitted transaction, in order.
    pub(crate) submitted: Vec<Submitted>,
    /// Data returned by a simulated `sendMessage`.
    pub(crate) send_message_return: Bytes,
    /// The gas provider's balance in the gas tank.
    pub(crate) balance: U256,
    /// Whether `sendMessage` and `sendERC20` emit a `SentMessage` log.
    pub(crate) emit_sent_message: bool,
    /// Overrides the relayer recorded in gas receipts.
    pub(crate) receipt_relayer: Option<Address>,
    /// Relay cost declared in gas receipts.
    pub(crate) relay_cost: U256,
    /// Claim cost declared in `Claimed` logs.
    pub(crate) claim_cost: U256,
    /// Base fee reported for every block.
    pub(crate) base_fee: Option<u64>,
    /// Whether block lookups by hash fail.
    pub(crate) fail_block: bool,
    /// Number of the next mined block.
    pub(crate) next_block: u64,
}

impl Default for MockChainStorage {
    fn default() -> Self {
        Self {
            submitted: Vec::new(),
            send_message_return: Bytes::copy_from_slice(MESSAGE_HASH.as_slice()),
            balance: U256::ZERO,
            emit_sent_message: true,
            receipt_relayer: None,
            relay_cost: U256::from(210_000 * BASE_FEE),
            claim_cost: U256::from(190_000 * BASE_FEE),
            base_fee: Some(BASE_FEE),
            fail_block: false,
            next_block: 100,
        }
    }
}

/// A chain hosting a mock of every contract touched by a relay cycle.
///
/// Calls and transactions are dispatched on their selector and target.
#[derive(Debug, Clone)]
pub(crate) struct MockChain {
    chain_id: u64,
    catalog: ContractCatalog,
    storage: Arc<Mutex<MockChainStorage>>,
}

impl MockChain {
    pub(crate) fn new(chain_id: u64) -> Self {
        Self { chain_id, catalog: catalog(), storage: Default::default() }
    }

    /// Applies `f` to the storage.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut MockChainStorage) -> R) -> R {
        let mut storage = self.storage.lock().unwrap();
        f(&mut storage)
    }

    /// Returns the transactions submitted so far.
    pub(crate) fn submitted(&self) -> Vec<Submitted> {
        self.with(|s| s.submitted.clone())
    }

    fn block_hash(number: u64) -> B256 {
        B256::from(U256::from(number))
    }

    fn sent_message(&self, sender: Address, message: Bytes, nonce: u64) -> Log {
        let event = SentMessage {
            destination: U256::from(self.catalog.destination_chain_id),
            target: MESSAGE_SENDER,
            messageNonce: U256::from(nonce),
            sender,
            message,
        };
        Log { address: self.catalog.messenger, data: event.encode_log_data() }
    }

    fn execute(
        &self,
        storage: &mut MockChainStorage,
        from: Address,
        intent: &TxIntent,
    ) -> Vec<Log> {
        let selector = intent.input.get(..4).unwrap_or_default();
        let mut logs = Vec::new();

        if selector == IL2ToL2CrossDomainMessenger::sendMessageCall::SELECTOR {
            if storage.emit_sent_message {
                logs.push(self.sent_message(from, intent.input.clone(), 1));
            }
        } else if selector == ISuperchainTokenBridge::sendERC20Call::SELECTOR {
            if storage.emit_sent_message {
                logs.push(self.sent_message(self.catalog.token_bridge, intent.input.clone(), 2));
            }
        } else if selector == IGasTank::depositCall::SELECTOR {
            storage.balance += intent.value;
        } else if selector == IGasTank::relayMessageCall::SELECTOR
            && intent.to == self.catalog.destination_gas_tank
        {
            let event = IGasTank::RelayedMessageGasReceipt {
                originMessageHash: MESSAGE_HASH,
                relayer: storage.receipt_relayer.unwrap_or(from),
                relayCost: storage.relay_cost,
                destinationMessageHashes: vec![B256::repeat_byte(0x01), B256::repeat_byte(0x02)],
            };
            logs.push(Log { address: intent.to, data: event.encode_log_data() });
        } else if selector == IGasTank::claimCall::SELECTOR {
            let call = IGasTank::claimCall::abi_decode(&intent.input).unwrap();
            storage.balance = storage
                .balance
                .saturating_sub(storage.relay_cost)
                .saturating_sub(storage.claim_cost);
            let event = IGasTank::Claimed {
                originMessageHash: MESSAGE_HASH,
                relayer: from,
                gasProvider: call._gasProvider,
                claimer: from,
                relayCost: storage.relay_cost,
                claimCost: storage.claim_cost,
            };
            logs.push(Log { address: intent.to, data: event.encode_log_data() });
        }
        logs
    }
}

#[async_trait]
impl RelayChain for MockChain {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn simulate(
        &self,
        _from: Option<Address>,
        _to: Address,
        input: Bytes,
    ) -> Result<Bytes, ChainClientError> {
        let storage = self.storage.lock().unwrap();
        let selector = input.get(..4).unwrap_or_default();
        if selector == IL2ToL2CrossDomainMessenger::sendMessageCall::SELECTOR {
            Ok(storage.send_message_return.clone())
        } else if selector == IGasTank::MAX_DEPOSITCall::SELECTOR {
            Ok(U256::from(MAX_DEPOSIT).abi_encode().into())
        } else if selector == IGasTank::balanceOfCall::SELECTOR {
            Ok(storage.balance.abi_encode().into())
        } else {
            Err(ChainClientError::Reverted("unknown selector".to_string()))
        }
    }

    async fn block(&self, hash: B256) -> Result<BlockInfo, ChainClientError> {
        let storage = self.storage.lock().unwrap();
        if storage.fail_block {
            return Err(ChainClientError::BlockNotFound(BlockId::hash(hash)));
        }
        let number = U256::from_be_bytes(hash.0).to::<u64>();
        Ok(BlockInfo {
            hash,
            number,
            parent_hash: Self::block_hash(number.saturating_sub(1)),
            timestamp: 1_700_000_000 + number * 2,
            base_fee_per_gas: storage.base_fee,
        })
    }

    async fn submit(
        &self,
        signer: &PrivateKeySigner,
        intent: TxIntent,
    ) -> Result<TxReceipt, DriverError> {
        let mut storage = self.storage.lock().unwrap();
        let from = signer.address();
        let block_number = storage.next_block;
        storage.next_block += 1;

        let block_hash = Self::block_hash(block_number);
        let logs = self
            .execute(&mut storage, from, &intent)
            .into_iter()
            .enumerate()
            .map(|(index, inner)| EventLog {
                inner,
                block_hash,
                block_number,
                log_index: index as u64 + 3,
            })
            .collect();
        storage.submitted.push(Submitted { from, intent });

        Ok(TxReceipt {
            transaction_hash: B256::from(U256::from(block_number * 1000)),
            status: true,
            gas_used: GAS_USED,
            effective_gas_price: u128::from(BASE_FEE),
            block_number,
            block_hash,
            logs,
        })
    }
}

/// An oracle that answers with a fixed access list and can fail on a given call.
#[derive(Debug, Default)]
pub(crate) struct MockOracle {
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
    /// Every request received, in order.
    pub(crate) requests: Mutex<Vec<(Identifier, Payload)>>,
}

impl MockOracle {
    /// An oracle failing the `call`-th request, counting from 1.
    pub(crate) fn failing_on(call: usize) -> Self {
        Self { fail_on_call: Some(call), ..Default::default() }
    }

    /// The number of requests received.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn access_list() -> AccessList {
        AccessList(vec![AccessListItem {
            address: CROSS_L2_INBOX,
            storage_keys: vec![B256::repeat_byte(0x11)],
        }])
    }
}

#[async_trait]
impl AccessListOracle for MockOracle {
    async fn access_list(
        &self,
        identifier: &Identifier,
        payload: &Payload,
    ) -> Result<AccessList, OracleError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().unwrap().push((*identifier, payload.clone()));
        if self.fail_on_call == Some(call) {
            return Err(OracleError::Rpc(jsonrpsee::core::ClientError::Custom(
                "oracle unavailable".to_string(),
            )));
        }
        Ok(Self::access_list())
    }
}

/// An orchestrator over mock chains 901 and 902.
pub(crate) fn orchestrator(
    oracle: MockOracle,
    deposit_policy: DepositPolicy,
) -> RelayOrchestrator<MockChain, MockChain, MockOracle> {
    RelayOrchestrator::new(
        catalog(),
        MockChain::new(901),
        MockChain::new(902),
        oracle,
        signers(),
        deposit_policy,
    )
}

/// Decodes the nested message count out of a submitted `sendMessage`.
pub(crate) fn nested_messages(intent: &TxIntent) -> U256 {
    let call = IL2ToL2CrossDomainMessenger::sendMessageCall::abi_decode(&intent.input).unwrap();
    IMessageSender::sendMessagesCall::abi_decode(&call._message).unwrap()._numMessages
}
