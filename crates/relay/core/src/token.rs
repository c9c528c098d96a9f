//! Bridging of the test token through the messenger, without the gas tank.

use crate::{RelayChain, RelayError, RelayOrchestrator, RelayStep, StepError};
use alloy_primitives::U256;
use alloy_sol_types::{SolCall, SolEvent};
use gastank_interop::{
    IL2ToL2CrossDomainMessenger, ISuperchainERC20, ISuperchainTokenBridge, Identifier, Payload,
    SentMessage, TxReceipt,
};
use gastank_providers::{AccessListOracle, TxIntent};

/// Amount of test tokens minted and bridged by [`RelayOrchestrator::relay_tokens`].
pub const DEFAULT_TOKEN_AMOUNT: u64 = 1000;

/// The transactions of a token relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRelayOutcome {
    /// The bridge transaction on the source chain.
    pub send: TxReceipt,
    /// The identifier of the bridged message.
    pub identifier: Identifier,
    /// The relay transaction on the destination chain.
    pub relay: TxReceipt,
}

impl<S, D, O> RelayOrchestrator<S, D, O>
where
    S: RelayChain,
    D: RelayChain,
    O: AccessListOracle,
{
    /// Mints `amount` test tokens to the gas provider, bridges them to itself on the destination
    /// chain and relays the bridge message directly through the messenger.
    pub async fn relay_tokens(&self, amount: U256) -> Result<TokenRelayOutcome, RelayError> {
        let catalog = self.catalog();
        let signer = &self.signers().gas_provider;
        let owner = signer.address();
        let source_id = self.source().chain_id();
        let destination_id = self.destination().chain_id();
        info!(target: "relay", %owner, %amount, "Starting token relay");

        let mint = ISuperchainERC20::mintCall { _to: owner, _amount: amount }.abi_encode();
        let receipt = self
            .source()
            .submit(signer, TxIntent::call(catalog.token, mint))
            .await
            .map_err(|e| RelayError::on_chain(RelayStep::Mint, source_id, e))?;
        debug!(target: "relay", tx = %receipt.transaction_hash, "Tokens minted");

        let bridge = ISuperchainTokenBridge::sendERC20Call {
            _token: catalog.token,
            _to: owner,
            _amount: amount,
            _chainId: U256::from(catalog.destination_chain_id),
        }
        .abi_encode();
        let send = self
            .source()
            .submit(signer, TxIntent::call(catalog.token_bridge, bridge))
            .await
            .map_err(|e| RelayError::on_chain(RelayStep::Send, source_id, e))?;
        info!(target: "relay", tx = %send.transaction_hash, "Tokens sent");

        let relay_failed = |e: StepError| RelayError::on_chain(RelayStep::Relay, destination_id, e);
        let locate_failed = |e: StepError| RelayError::on_chain(RelayStep::Relay, source_id, e);
        let log = send
            .find_log(catalog.messenger, SentMessage::SIGNATURE_HASH)
            .map_err(|e| locate_failed(e.into()))?;
        let block =
            self.source().block(log.block_hash).await.map_err(|e| locate_failed(e.into()))?;
        let identifier = Identifier::from_log(log, &block, catalog.source_chain_id);
        let payload = Payload::raw(log);
        let access_list = self
            .oracle()
            .access_list(&identifier, &payload)
            .await
            .map_err(|e| relay_failed(e.into()))?;

        let input = IL2ToL2CrossDomainMessenger::relayMessageCall {
            _id: identifier.into(),
            _sentMessage: payload.into(),
        }
        .abi_encode();
        let intent = TxIntent::call(catalog.messenger, input).with_access_list(access_list);
        let relay = self
            .destination()
            .submit(signer, intent)
            .await
            .map_err(|e| relay_failed(e.into()))?;
        info!(target: "relay", tx = %relay.transaction_hash, %identifier, "Tokens relayed");

        Ok(TokenRelayOutcome { send, identifier, relay })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DepositPolicy,
        test_utils::{MockOracle, orchestrator},
    };
    use gastank_interop::{L2_TO_L2_CROSS_DOMAIN_MESSENGER, SUPERCHAIN_TOKEN_BRIDGE, SUPERSIM_TOKEN};

    #[tokio::test]
    async fn test_relay_tokens() {
        let orchestrator = orchestrator(MockOracle::default(), DepositPolicy::Skip);
        let owner = orchestrator.signers().gas_provider.address();

        let outcome = orchestrator.relay_tokens(U256::from(DEFAULT_TOKEN_AMOUNT)).await.unwrap();

        let source = orchestrator.source().submitted();
        assert_eq!(source.len(), 2);
        assert_eq!(source[0].intent.to, SUPERSIM_TOKEN);
        let mint = ISuperchainERC20::mintCall::abi_decode(&source[0].intent.input).unwrap();
        assert_eq!((mint._to, mint._amount), (owner, U256::from(1000)));
        assert_eq!(source[1].intent.to, SUPERCHAIN_TOKEN_BRIDGE);
        let bridge = ISuperchainTokenBridge::sendERC20Call::abi_decode(&source[1].intent.input)
            .unwrap();
        assert_eq!(bridge._chainId, U256::from(902));

        assert_eq!(outcome.identifier.chain_id, 901);
        assert_eq!(outcome.identifier.block_number, outcome.send.block_number);

        let destination = orchestrator.destination().submitted();
        assert_eq!(destination.len(), 1);
        assert_eq!(destination[0].from, owner);
        assert_eq!(destination[0].intent.to, L2_TO_L2_CROSS_DOMAIN_MESSENGER);
        let relay =
            IL2ToL2CrossDomainMessenger::relayMessageCall::abi_decode(&destination[0].intent.input)
                .unwrap();
        // The raw payload is every topic followed by the log data.
        assert_eq!(relay._sentMessage, *Payload::raw(&outcome.send.logs[0]).bytes());
        assert_eq!(destination[0].intent.access_list, Some(MockOracle::access_list()));
    }

    #[tokio::test]
    async fn test_relay_tokens_without_message() {
        let orchestrator = orchestrator(MockOracle::default(), DepositPolicy::Skip);
        orchestrator.source().with(|s| s.emit_sent_message = false);

        let err = orchestrator.relay_tokens(U256::from(1)).await.unwrap_err();

        assert_eq!(err.step, RelayStep::Relay);
        assert_eq!(err.chain_id, Some(901));
        assert!(matches!(err.source, StepError::Locate(_)));
        assert!(orchestrator.destination().submitted().is_empty());
    }

    #[tokio::test]
    async fn test_relay_tokens_block_lookup_failure() {
        let orchestrator = orchestrator(MockOracle::default(), DepositPolicy::Skip);
        orchestrator.source().with(|s| s.fail_block = true);

        let err = orchestrator.relay_tokens(U256::from(1)).await.unwrap_err();

        assert_eq!(err.step, RelayStep::Relay);
        assert_eq!(err.chain_id, Some(901));
        assert!(matches!(
            err.source,
            StepError::Chain(gastank_providers::ChainClientError::BlockNotFound(_))
        ));
        assert_eq!(orchestrator.oracle().calls(), 0);
    }
}
