//! The [`RelayOrchestrator`] drives a message through a full gas tank relay cycle.
//!
//! A cycle runs strictly in order:
//!
//! 1. `Send`: the gas provider sends a message from the source chain to the message sender on
//!    the destination chain, which fans out into nested messages once executed.
//! 2. `Authorize`: the gas provider authorizes the source gas tank to pay for the message.
//! 3. `Deposit`: the gas provider funds the source gas tank according to the [`DepositPolicy`].
//! 4. `Relay`: the relayer executes the message through the destination gas tank.
//! 5. `ExtractReceipt`: the gas receipt emitted by the destination gas tank is decoded.
//! 6. `Claim`: the relayer claims its reimbursement from the source gas tank.
//! 7. `Reconcile`: declared costs are compared against the costs actually paid.
//!
//! Any failure aborts the cycle with the step it happened in.
//!
//! [`DepositPolicy`]: crate::DepositPolicy

use crate::{
    DepositPolicy, GasDeltaResult, Leg, LegReport, RelayChain, RelayError, RelayStep, Signers,
    StepError,
};
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{B256, Bytes, U256};
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use gastank_interop::{
    ContractCatalog, EventLog, GasReceipt, IGasTank, IL2ToL2CrossDomainMessenger, IMessageSender,
    Identifier, Payload, SentMessage, TxReceipt, decode_claimed, decode_gas_receipt,
};
use gastank_providers::{AccessListOracle, TxIntent};
use std::num::NonZeroU64;

/// The result of the `Send` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessageReceipt {
    /// The message hash returned by the simulated `sendMessage` call.
    pub message_hash: B256,
    /// The receipt of the `sendMessage` transaction.
    pub receipt: TxReceipt,
}

/// The state of the source gas tank after the `Deposit` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Funding {
    /// The gas tank's `MAX_DEPOSIT`.
    pub cap: U256,
    /// The gas provider's balance before the deposit.
    pub balance: U256,
    /// The deposited amount, if a deposit was made.
    pub deposited: Option<U256>,
}

impl Funding {
    /// The gas provider's balance after the deposit.
    pub fn funded_balance(&self) -> U256 {
        self.balance + self.deposited.unwrap_or_default()
    }
}

/// The gas receipt emitted by the destination gas tank, with the log it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedGasReceipt {
    /// The `RelayedMessageGasReceipt` log.
    pub log: EventLog,
    /// The decoded gas receipt.
    pub receipt: GasReceipt,
}

/// The outcome of a completed relay cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Hash of the relayed message.
    pub message_hash: B256,
    /// Accounting of the relay on the destination chain.
    pub relay: LegReport,
    /// Accounting of the claim on the source chain.
    pub claim: LegReport,
    /// The gas provider's balance expected after the claim.
    pub expected_balance: U256,
    /// The gas provider's balance reported by the gas tank after the claim.
    pub actual_balance: U256,
}

impl RelayOutcome {
    /// The gas deltas of both legs.
    pub const fn deltas(&self) -> GasDeltaResult {
        GasDeltaResult::new(&self.relay, &self.claim)
    }

    /// Returns `true` if the gas tank holds what the declared costs predict.
    pub fn balance_matches(&self) -> bool {
        self.expected_balance == self.actual_balance
    }
}

/// Drives relay cycles between a source and a destination chain.
#[derive(Debug)]
pub struct RelayOrchestrator<S, D, O> {
    catalog: ContractCatalog,
    source: S,
    destination: D,
    oracle: O,
    signers: Signers,
    deposit_policy: DepositPolicy,
}

impl<S, D, O> RelayOrchestrator<S, D, O>
where
    S: RelayChain,
    D: RelayChain,
    O: AccessListOracle,
{
    /// Creates a new [`RelayOrchestrator`].
    pub const fn new(
        catalog: ContractCatalog,
        source: S,
        destination: D,
        oracle: O,
        signers: Signers,
        deposit_policy: DepositPolicy,
    ) -> Self {
        Self { catalog, source, destination, oracle, signers, deposit_policy }
    }

    /// Returns the contract catalog.
    pub const fn catalog(&self) -> &ContractCatalog {
        &self.catalog
    }

    /// Returns the source chain.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the destination chain.
    pub const fn destination(&self) -> &D {
        &self.destination
    }

    /// Returns the access list oracle.
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Returns the participating accounts.
    pub const fn signers(&self) -> &Signers {
        &self.signers
    }

    /// Runs a full relay cycle for a message fanning out into `nested_messages` messages.
    pub async fn run(&self, nested_messages: u64) -> Result<RelayOutcome, RelayError> {
        debug!(target: "relay", nested_messages, "Starting gas tank relay");

        let sent = self.send(nested_messages).await?;
        self.authorize(sent.message_hash).await?;
        let funding = self.deposit().await?;
        let relay_receipt = self.relay(&sent.receipt).await?;
        let gas_receipt = self.extract_receipt(&relay_receipt)?;
        let claim_receipt = self.claim(&gas_receipt).await?;
        let outcome = self
            .reconcile(sent.message_hash, &funding, &relay_receipt, &gas_receipt, &claim_receipt)
            .await?;

        let deltas = outcome.deltas();
        debug!(
            target: "relay",
            message_hash = %outcome.message_hash,
            relay_gas_delta = deltas.relay,
            claim_gas_delta = deltas.claim,
            "Relay cycle completed"
        );
        Ok(outcome)
    }

    /// Sends the initiating message from the gas provider.
    ///
    /// The call is simulated first to read the message hash it returns.
    pub async fn send(&self, nested_messages: u64) -> Result<SentMessageReceipt, RelayError> {
        let step = failed_at(RelayStep::Send, self.source.chain_id());

        let message = IMessageSender::sendMessagesCall {
            _destinationChainId: U256::from(self.catalog.source_chain_id),
            _numMessages: U256::from(nested_messages),
        }
        .abi_encode();
        let input: Bytes = IL2ToL2CrossDomainMessenger::sendMessageCall {
            _destination: U256::from(self.catalog.destination_chain_id),
            _target: self.catalog.message_sender,
            _message: message.into(),
        }
        .abi_encode()
        .into();

        let from = self.signers.gas_provider.address();
        let returned = self
            .source
            .simulate(Some(from), self.catalog.messenger, input.clone())
            .await
            .map_err(|e| step(e.into()))?;
        if returned.len() != 32 {
            return Err(step(StepError::ReturnLength { expected: 32, actual: returned.len() }));
        }
        let message_hash = B256::from_slice(&returned);
        debug!(target: "relay", %message_hash, "Simulated sendMessage");

        let receipt = self
            .source
            .submit(&self.signers.gas_provider, TxIntent::call(self.catalog.messenger, input))
            .await
            .map_err(|e| step(e.into()))?;
        debug!(target: "relay", tx = %receipt.transaction_hash, %message_hash, "Message sent");

        Ok(SentMessageReceipt { message_hash, receipt })
    }

    /// Authorizes the source gas tank to reimburse the relay of `message_hash`.
    pub async fn authorize(&self, message_hash: B256) -> Result<TxReceipt, RelayError> {
        let input = IGasTank::authorizeClaimCall { _messageHash: message_hash }.abi_encode();
        let receipt = self
            .source
            .submit(
                &self.signers.gas_provider,
                TxIntent::call(self.catalog.source_gas_tank, input),
            )
            .await
            .map_err(|e| RelayError::on_chain(RelayStep::Authorize, self.source.chain_id(), e))?;
        debug!(target: "relay", tx = %receipt.transaction_hash, "Claim authorized");
        Ok(receipt)
    }

    /// Funds the source gas tank according to the deposit policy.
    pub async fn deposit(&self) -> Result<Funding, RelayError> {
        let step = failed_at(RelayStep::Deposit, self.source.chain_id());

        let gas_tank = self.catalog.source_gas_tank;
        let cap_data = self
            .source
            .simulate(None, gas_tank, IGasTank::MAX_DEPOSITCall {}.abi_encode().into())
            .await
            .map_err(|e| step(e.into()))?;
        let cap = U256::abi_decode(&cap_data).map_err(|e| step(StepError::ReturnData(e)))?;
        let balance = self.gas_provider_balance().await.map_err(&step)?;

        let deposited = self.deposit_policy.deposit_amount(balance, cap);
        match deposited {
            Some(amount) => {
                debug!(target: "relay", %balance, %cap, %amount, "Depositing into gas tank");
                let input =
                    IGasTank::depositCall { _to: self.signers.gas_provider.address() }.abi_encode();
                let intent = TxIntent::call(gas_tank, input).with_value(amount);
                let receipt = self
                    .source
                    .submit(&self.signers.gas_provider, intent)
                    .await
                    .map_err(|e| step(e.into()))?;
                debug!(target: "relay", tx = %receipt.transaction_hash, "Deposit mined");
            }
            None => {
                debug!(
                    target: "relay",
                    %balance,
                    %cap,
                    policy = %self.deposit_policy,
                    "No deposit needed"
                );
            }
        }

        Ok(Funding { cap, balance, deposited })
    }

    /// Relays the message sent in `send_receipt` through the destination gas tank.
    pub async fn relay(&self, send_receipt: &TxReceipt) -> Result<TxReceipt, RelayError> {
        let on_source = failed_at(RelayStep::Relay, self.source.chain_id());
        let step = failed_at(RelayStep::Relay, self.destination.chain_id());

        let log = send_receipt
            .find_log(self.catalog.messenger, SentMessage::SIGNATURE_HASH)
            .map_err(|e| on_source(e.into()))?;
        let block = self.source.block(log.block_hash).await.map_err(|e| on_source(e.into()))?;
        let identifier = Identifier::from_log(log, &block, self.catalog.source_chain_id);
        let payload = Payload::sent_message(log).map_err(|e| on_source(e.into()))?;
        debug!(target: "relay", %identifier, payload = %payload.bytes(), "Rebuilt sent message");

        let access_list = self.access_list(&identifier, &payload).await.map_err(&step)?;
        let input = IGasTank::relayMessageCall {
            _id: identifier.into(),
            _sentMessage: payload.into(),
        }
        .abi_encode();
        let intent = TxIntent::call(self.catalog.destination_gas_tank, input)
            .with_access_list(access_list);

        let receipt = self
            .destination
            .submit(&self.signers.relayer, intent)
            .await
            .map_err(|e| step(e.into()))?;
        debug!(target: "relay", tx = %receipt.transaction_hash, "Message relayed");
        Ok(receipt)
    }

    /// Decodes the gas receipt emitted by the relay and checks it names the relayer.
    pub fn extract_receipt(
        &self,
        relay_receipt: &TxReceipt,
    ) -> Result<RelayedGasReceipt, RelayError> {
        let chain_id = self.destination.chain_id();
        let step = failed_at(RelayStep::ExtractReceipt, chain_id);

        let log = relay_receipt
            .find_log(
                self.catalog.destination_gas_tank,
                IGasTank::RelayedMessageGasReceipt::SIGNATURE_HASH,
            )
            .map_err(|e| step(e.into()))?;
        let receipt = decode_gas_receipt(log).map_err(|e| step(e.into()))?;

        let expected = self.signers.relayer.address();
        if receipt.relayer != expected {
            return Err(step(StepError::RelayerMismatch { expected, actual: receipt.relayer }));
        }
        debug!(
            target: "relay",
            origin_message_hash = %receipt.origin_message_hash,
            relay_cost = %receipt.relay_cost,
            nested = receipt.destination_message_hashes.len(),
            "Decoded gas receipt"
        );

        Ok(RelayedGasReceipt { log: log.clone(), receipt })
    }

    /// Claims the reimbursement of the relay from the source gas tank.
    pub async fn claim(&self, gas_receipt: &RelayedGasReceipt) -> Result<TxReceipt, RelayError> {
        let on_destination = failed_at(RelayStep::Claim, self.destination.chain_id());
        let step = failed_at(RelayStep::Claim, self.source.chain_id());

        let log = &gas_receipt.log;
        let block =
            self.destination.block(log.block_hash).await.map_err(|e| on_destination(e.into()))?;
        let identifier = Identifier::from_log(log, &block, self.catalog.destination_chain_id);
        let payload = Payload::from_gas_receipt(&gas_receipt.receipt);
        debug!(target: "relay", %identifier, payload = %payload.bytes(), "Rebuilt gas receipt");

        let access_list = self.access_list(&identifier, &payload).await.map_err(&step)?;
        let input = IGasTank::claimCall {
            _id: identifier.into(),
            _gasProvider: self.signers.gas_provider.address(),
            _payload: payload.into(),
        }
        .abi_encode();
        let intent =
            TxIntent::call(self.catalog.source_gas_tank, input).with_access_list(access_list);

        let receipt = self
            .source
            .submit(&self.signers.relayer, intent)
            .await
            .map_err(|e| step(e.into()))?;
        debug!(target: "relay", tx = %receipt.transaction_hash, "Relay cost claimed");
        Ok(receipt)
    }

    /// Reconciles the declared costs of both legs with what was actually paid.
    ///
    /// The gas provider's balance is compared with the balance the declared costs predict, but a
    /// mismatch is only reported.
    pub async fn reconcile(
        &self,
        message_hash: B256,
        funding: &Funding,
        relay_receipt: &TxReceipt,
        gas_receipt: &RelayedGasReceipt,
        claim_receipt: &TxReceipt,
    ) -> Result<RelayOutcome, RelayError> {
        let step = |e: StepError| RelayError::new(RelayStep::Reconcile, e);
        let on_source = failed_at(RelayStep::Reconcile, self.source.chain_id());

        let claimed_log = claim_receipt
            .find_log(self.catalog.source_gas_tank, IGasTank::Claimed::SIGNATURE_HASH)
            .map_err(|e| on_source(e.into()))?;
        let claimed = decode_claimed(claimed_log).map_err(|e| on_source(e.into()))?;

        let destination_id = self.destination.chain_id();
        let relay_fee = base_fee(&self.destination, relay_receipt.block_hash)
            .await
            .map_err(failed_at(RelayStep::Reconcile, destination_id))?;
        let claim_fee = base_fee(&self.source, claim_receipt.block_hash).await.map_err(&on_source)?;

        let relay_cost = gas_receipt.receipt.relay_cost;
        let relay =
            LegReport::new(Leg::Relay, relay_cost, relay_fee, relay_receipt).map_err(&step)?;
        let claim =
            LegReport::new(Leg::Claim, claimed.claimCost, claim_fee, claim_receipt).map_err(&step)?;

        let declared = relay.declared_cost + claim.declared_cost;
        let expected_balance = funding.funded_balance().saturating_sub(declared);
        let actual_balance = self.gas_provider_balance().await.map_err(&on_source)?;
        if expected_balance == actual_balance {
            debug!(target: "gas", balance = %actual_balance, "Gas provider balance matches");
        } else {
            warn!(
                target: "gas",
                expected = %expected_balance,
                actual = %actual_balance,
                "Gas provider balance mismatch"
            );
        }

        Ok(RelayOutcome { message_hash, relay, claim, expected_balance, actual_balance })
    }

    async fn gas_provider_balance(&self) -> Result<U256, StepError> {
        let gas_provider = self.signers.gas_provider.address();
        let input = IGasTank::balanceOfCall { gasProvider: gas_provider }.abi_encode();
        let data = self.source.simulate(None, self.catalog.source_gas_tank, input.into()).await?;
        U256::abi_decode(&data).map_err(StepError::ReturnData)
    }

    async fn access_list(
        &self,
        identifier: &Identifier,
        payload: &Payload,
    ) -> Result<AccessList, StepError> {
        let access_list = self.oracle.access_list(identifier, payload).await?;
        debug!(target: "relay", %identifier, entries = access_list.0.len(), "Got access list");
        Ok(access_list)
    }
}

fn failed_at(step: RelayStep, chain_id: u64) -> impl Fn(StepError) -> RelayError {
    move |e| RelayError::on_chain(step, chain_id, e)
}

async fn base_fee<C: RelayChain>(chain: &C, block_hash: B256) -> Result<NonZeroU64, StepError> {
    let block = chain.block(block_hash).await?;
    block
        .base_fee_per_gas
        .and_then(NonZeroU64::new)
        .ok_or(StepError::MissingBaseFee(block.number))
}
