#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod backtrace;

mod deployment;
pub use deployment::{load_catalog, load_deployment};

mod error;
pub use error::{CliError, CliResult};

mod log;
pub use log::{LogArgs, init_tracing_subscriber};

mod styles;
pub use styles::cli_styles;
