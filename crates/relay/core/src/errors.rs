//! Step-tagged errors of a relay cycle.

use alloy_primitives::{Address, U256};
use derive_more::Display;
use gastank_interop::{LocateError, PayloadError};
use gastank_providers::{ChainClientError, DriverError, OracleError};
use thiserror::Error;

/// A step of a relay cycle.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayStep {
    /// Minting test tokens before bridging them.
    #[display("mint")]
    Mint,
    /// Emitting the initiating message on the source chain.
    #[display("send")]
    Send,
    /// Authorizing the gas tank to pay for the message.
    #[display("authorize")]
    Authorize,
    /// Funding the gas tank.
    #[display("deposit")]
    Deposit,
    /// Executing the message on the destination chain.
    #[display("relay")]
    Relay,
    /// Reading the gas receipt emitted by the relay.
    #[display("extract-receipt")]
    ExtractReceipt,
    /// Reimbursing the relayer on the source chain.
    #[display("claim")]
    Claim,
    /// Comparing declared and incurred costs.
    #[display("reconcile")]
    Reconcile,
}

/// The cause of a failed step.
#[derive(Error, Debug)]
pub enum StepError {
    /// A read-only call or block query failed.
    #[error(transparent)]
    Chain(#[from] ChainClientError),
    /// A transaction could not be driven to a successful receipt.
    #[error(transparent)]
    Driver(#[from] DriverError),
    /// The access list oracle failed.
    #[error(transparent)]
    Oracle(#[from] OracleError),
    /// A required log is missing.
    #[error(transparent)]
    Locate(#[from] LocateError),
    /// A log or a return value could not be decoded.
    #[error(transparent)]
    Payload(#[from] PayloadError),
    /// A call returned data of an unexpected length.
    #[error("expected {expected} bytes of return data, got {actual}")]
    ReturnLength {
        /// The expected length.
        expected: usize,
        /// The received length.
        actual: usize,
    },
    /// A return value could not be decoded.
    #[error("failed to decode return data: {0}")]
    ReturnData(#[source] alloy_sol_types::Error),
    /// The gas receipt names another relayer than the one that relayed the message.
    #[error("relayer from event ({actual}) does not match expected relayer ({expected})")]
    RelayerMismatch {
        /// The address that signed the relay transaction.
        expected: Address,
        /// The relayer recorded by the gas tank.
        actual: Address,
    },
    /// A block used for gas accounting has no base fee.
    #[error("block {0} has no base fee")]
    MissingBaseFee(u64),
    /// A gas figure does not fit the report.
    #[error("implied gas of {0} does not fit in a signed 128-bit integer")]
    GasOverflow(U256),
}

/// A relay cycle aborted at `step`.
#[derive(Error, Debug)]
#[error("{step} step failed{}: {source}", chain_suffix(.chain_id))]
pub struct RelayError {
    /// The failed step.
    pub step: RelayStep,
    /// The chain the step was talking to, if any.
    pub chain_id: Option<u64>,
    /// The cause.
    #[source]
    pub source: StepError,
}

impl RelayError {
    /// Creates a new [`RelayError`] for a step that is not bound to a chain.
    pub fn new(step: RelayStep, source: impl Into<StepError>) -> Self {
        Self { step, chain_id: None, source: source.into() }
    }

    /// Creates a new [`RelayError`] for a step executed on `chain_id`.
    pub fn on_chain(step: RelayStep, chain_id: u64, source: impl Into<StepError>) -> Self {
        Self { step, chain_id: Some(chain_id), source: source.into() }
    }
}

fn chain_suffix(chain_id: &Option<u64>) -> String {
    chain_id.map(|id| format!(" on chain {id}")).unwrap_or_default()
}
