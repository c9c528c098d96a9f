#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod client;
pub use client::{AlloyChainClient, CallRequest, ChainClient, ChainClientError};

mod driver;
pub use driver::{
    DEFAULT_CONFIRMATION_TIMEOUT, DEFAULT_GAS_LIMIT, DEFAULT_POLL_INTERVAL, DriverError,
    Eip1559Fees, TransactionDriver, TxIntent,
};

mod oracle;
pub use oracle::{
    AccessListOracle, AccessListRequest, AccessListResponse, DEFAULT_ORACLE_TIMEOUT,
    HttpAccessListOracle, OracleError, SupersimAdminApiClient,
};
