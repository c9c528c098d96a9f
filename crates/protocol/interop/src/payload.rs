//! Reconstruction of the payloads expected by the destination contracts.
//!
//! A payload is laid out as `selector ++ abi(topic fields) ++ abi(data fields)`. The receiving
//! contract decodes both groups independently, so each group is encoded as its own parameter
//! list rather than as a single tuple.

use crate::{
    EventLog, PayloadError,
    bindings::{IGasTank, IL2ToL2CrossDomainMessenger},
};
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::{SolEvent, SolValue};

/// A decoded `SentMessage` event.
pub type SentMessage = IL2ToL2CrossDomainMessenger::SentMessage;

/// A decoded `Claimed` event.
pub type Claimed = IGasTank::Claimed;

/// The fields of a `RelayedMessageGasReceipt` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasReceipt {
    /// Hash of the message that was relayed.
    pub origin_message_hash: B256,
    /// The account that relayed the message.
    pub relayer: Address,
    /// The relay cost declared by the destination gas tank, in wei.
    pub relay_cost: U256,
    /// Hashes of the messages sent while the relayed message executed.
    pub destination_message_hashes: Vec<B256>,
}

impl From<IGasTank::RelayedMessageGasReceipt> for GasReceipt {
    fn from(event: IGasTank::RelayedMessageGasReceipt) -> Self {
        Self {
            origin_message_hash: event.originMessageHash,
            relayer: event.relayer,
            relay_cost: event.relayCost,
            destination_message_hashes: event.destinationMessageHashes,
        }
    }
}

/// Decodes `log` as a `SentMessage` event.
pub fn decode_sent_message(log: &EventLog) -> Result<SentMessage, PayloadError> {
    SentMessage::decode_log_data(log.data())
        .map_err(|e| PayloadError::decode(SentMessage::SIGNATURE, e))
}

/// Decodes `log` as a `RelayedMessageGasReceipt` event.
pub fn decode_gas_receipt(log: &EventLog) -> Result<GasReceipt, PayloadError> {
    IGasTank::RelayedMessageGasReceipt::decode_log_data(log.data())
        .map(Into::into)
        .map_err(|e| PayloadError::decode(IGasTank::RelayedMessageGasReceipt::SIGNATURE, e))
}

/// Decodes `log` as a `Claimed` event.
pub fn decode_claimed(log: &EventLog) -> Result<Claimed, PayloadError> {
    Claimed::decode_log_data(log.data()).map_err(|e| PayloadError::decode(Claimed::SIGNATURE, e))
}

/// The byte-exact payload of an initiating message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Payload(Bytes);

impl Payload {
    /// The raw payload of a log: every topic, followed by the log data.
    pub fn raw(log: &EventLog) -> Self {
        let topics = log.topics();
        let data = &log.data().data;
        let mut payload = Vec::with_capacity(topics.len() * 32 + data.len());
        for topic in topics {
            payload.extend_from_slice(topic.as_slice());
        }
        payload.extend_from_slice(data);
        Self(payload.into())
    }

    /// Rebuilds the payload `L2ToL2CrossDomainMessenger.relayMessage` expects from a
    /// `SentMessage` log.
    pub fn sent_message(log: &EventLog) -> Result<Self, PayloadError> {
        Ok(Self::from_sent_message(&decode_sent_message(log)?))
    }

    /// Encodes a decoded `SentMessage` event.
    pub fn from_sent_message(event: &SentMessage) -> Self {
        Self::assemble(
            SentMessage::SIGNATURE_HASH,
            (event.destination, event.target, event.messageNonce).abi_encode_params(),
            (event.sender, event.message.clone()).abi_encode_params(),
        )
    }

    /// Rebuilds the payload `GasTank.claim` expects from a `RelayedMessageGasReceipt` log.
    pub fn gas_receipt(log: &EventLog) -> Result<Self, PayloadError> {
        Ok(Self::from_gas_receipt(&decode_gas_receipt(log)?))
    }

    /// Encodes a decoded gas receipt.
    pub fn from_gas_receipt(receipt: &GasReceipt) -> Self {
        Self::assemble(
            IGasTank::RelayedMessageGasReceipt::SIGNATURE_HASH,
            (receipt.origin_message_hash, receipt.relayer).abi_encode_params(),
            (receipt.relay_cost, receipt.destination_message_hashes.clone()).abi_encode_params(),
        )
    }

    fn assemble(selector: B256, topic_fields: Vec<u8>, data_fields: Vec<u8>) -> Self {
        let mut payload = Vec::with_capacity(32 + topic_fields.len() + data_fields.len());
        payload.extend_from_slice(selector.as_slice());
        payload.extend(topic_fields);
        payload.extend(data_fields);
        Self(payload.into())
    }

    /// Returns the payload bytes.
    pub const fn bytes(&self) -> &Bytes {
        &self.0
    }

    /// Returns the payload length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl From<Payload> for Bytes {
    fn from(payload: Payload) -> Self {
        payload.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Log, LogData, address};
    use rstest::rstest;

    const MESSENGER: Address = address!("4200000000000000000000000000000000000023");
    const GAS_TANK: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");

    fn event_log(address: Address, data: LogData) -> EventLog {
        EventLog {
            inner: Log { address, data },
            block_hash: B256::ZERO,
            block_number: 9,
            log_index: 1,
        }
    }

    fn sent_message(message: &'static [u8]) -> SentMessage {
        SentMessage {
            destination: U256::from(902),
            target: address!("e7f1725e7734ce288f8367e1bb143e90bb3f0512"),
            messageNonce: U256::from(7),
            sender: address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
            message: Bytes::from_static(message),
        }
    }

    fn gas_receipt(nested: usize) -> GasReceipt {
        GasReceipt {
            origin_message_hash: B256::repeat_byte(0xaa),
            relayer: address!("70997970c51812dc3a010c7d01b50e0d17dc79c8"),
            relay_cost: U256::from(123_456_789u64),
            destination_message_hashes: (0..nested).map(|i| B256::repeat_byte(i as u8)).collect(),
        }
    }

    #[rstest]
    #[case::empty(b"")]
    #[case::short(b"\x01\x02\x03")]
    #[case::multi_word(&[0xab; 100])]
    fn test_sent_message_payload_round_trip(#[case] message: &'static [u8]) {
        let event = sent_message(message);
        let log = event_log(MESSENGER, event.encode_log_data());

        let payload = Payload::sent_message(&log).unwrap();
        let bytes = payload.as_ref();

        assert_eq!(&bytes[..32], SentMessage::SIGNATURE_HASH.as_slice());
        let (destination, target, nonce) =
            <(U256, Address, U256)>::abi_decode_params(&bytes[32..128]).unwrap();
        let (sender, decoded_message) =
            <(Address, Bytes)>::abi_decode_params(&bytes[128..]).unwrap();

        assert_eq!(destination, event.destination);
        assert_eq!(target, event.target);
        assert_eq!(nonce, event.messageNonce);
        assert_eq!(sender, event.sender);
        assert_eq!(decoded_message, event.message);
    }

    #[test]
    fn test_sent_message_payload_matches_raw_layout() {
        let log = event_log(MESSENGER, sent_message(b"hello").encode_log_data());
        assert_eq!(Payload::sent_message(&log).unwrap(), Payload::raw(&log));
    }

    #[rstest]
    #[case::no_nested(0)]
    #[case::one_nested(1)]
    #[case::many_nested(5)]
    fn test_gas_receipt_payload_round_trip(#[case] nested: usize) {
        let receipt = gas_receipt(nested);
        let event = IGasTank::RelayedMessageGasReceipt {
            originMessageHash: receipt.origin_message_hash,
            relayer: receipt.relayer,
            relayCost: receipt.relay_cost,
            destinationMessageHashes: receipt.destination_message_hashes.clone(),
        };
        let log = event_log(GAS_TANK, event.encode_log_data());

        assert_eq!(decode_gas_receipt(&log).unwrap(), receipt);

        let payload = Payload::gas_receipt(&log).unwrap();
        let bytes = payload.as_ref();

        assert_eq!(&bytes[..32], IGasTank::RelayedMessageGasReceipt::SIGNATURE_HASH.as_slice());
        let (hash, relayer) = <(B256, Address)>::abi_decode_params(&bytes[32..96]).unwrap();
        let (relay_cost, hashes) = <(U256, Vec<B256>)>::abi_decode_params(&bytes[96..]).unwrap();

        assert_eq!(hash, receipt.origin_message_hash);
        assert_eq!(relayer, receipt.relayer);
        assert_eq!(relay_cost, receipt.relay_cost);
        assert_eq!(hashes, receipt.destination_message_hashes);
    }

    #[test]
    fn test_truncated_data_fails_to_decode() {
        let full = sent_message(b"hello").encode_log_data();
        let truncated = LogData::new_unchecked(full.topics().to_vec(), full.data.slice(..40));
        let log = event_log(MESSENGER, truncated);

        assert!(matches!(Payload::sent_message(&log), Err(PayloadError::Decode { .. })));
    }

    #[test]
    fn test_wrong_event_fails_to_decode() {
        let log = event_log(MESSENGER, sent_message(b"hello").encode_log_data());
        assert!(matches!(Payload::gas_receipt(&log), Err(PayloadError::Decode { .. })));
    }

    #[test]
    fn test_raw_payload() {
        let data = LogData::new_unchecked(
            vec![B256::repeat_byte(1), B256::repeat_byte(2)],
            Bytes::from_static(&[0xde, 0xad]),
        );
        let payload = Payload::raw(&event_log(MESSENGER, data));

        assert_eq!(payload.len(), 66);
        assert_eq!(&payload.as_ref()[..32], B256::repeat_byte(1).as_slice());
        assert_eq!(&payload.as_ref()[64..], &[0xde, 0xad]);
    }
}
