#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod chain;
pub use chain::RelayChain;

mod config;
pub use config::{DepositPolicy, DepositPolicyParseError, RelayConfig, Signers};

mod errors;
pub use errors::{RelayError, RelayStep, StepError};

mod gas;
pub use gas::{GasDeltaResult, Leg, LegReport, Settlement};

mod orchestrator;
pub use orchestrator::{
    Funding, RelayOrchestrator, RelayOutcome, RelayedGasReceipt, SentMessageReceipt,
};

mod sweep;
pub use sweep::{SweepReport, sweep};

mod token;
pub use token::{DEFAULT_TOKEN_AMOUNT, TokenRelayOutcome};

#[cfg(test)]
mod test_utils;
