//! Core primitives for relaying gas tank messages between OP stack chains.
//!
//! This crate rebuilds the [`Identifier`] and byte-exact [`Payload`] of an initiating message
//! from the logs of its receipt, and carries the Solidity bindings of every contract a relay
//! cycle calls.

mod bindings;
pub use bindings::{
    IGasTank, IL2ToL2CrossDomainMessenger, IMessageSender, ISuperchainERC20,
    ISuperchainTokenBridge, MessageIdentifierAbi,
};

mod catalog;
pub use catalog::{
    CROSS_L2_INBOX, ContractCatalog, DEFAULT_DESTINATION_CHAIN_ID, DEFAULT_SOURCE_CHAIN_ID,
    Deployment, L2_TO_L2_CROSS_DOMAIN_MESSENGER, SUPERCHAIN_TOKEN_BRIDGE, SUPERSIM_TOKEN,
};

mod errors;
pub use errors::{LocateError, PayloadError};

mod identifier;
pub use identifier::Identifier;

mod log;
pub use log::{BlockInfo, EventLog, TxReceipt, locate_log};

mod payload;
pub use payload::{
    Claimed, GasReceipt, Payload, SentMessage, decode_claimed, decode_gas_receipt,
    decode_sent_message,
};
