//! Error types for CLI utilities.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors that can occur while setting up a relayer run.
#[derive(Error, Debug)]
pub enum CliError {
    /// The deployment file could not be read.
    #[error("failed to read deployment file {path}: {source}")]
    ReadDeployment {
        /// Path of the deployment file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The deployment file is not valid JSON or misses an address.
    #[error("invalid deployment file {path}: {source}")]
    ParseDeployment {
        /// Path of the deployment file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A private key flag could not be parsed.
    #[error("invalid {name} key: {source}")]
    InvalidKey {
        /// The account the key belongs to.
        name: &'static str,
        /// The underlying error.
        #[source]
        source: alloy_signer_local::LocalSignerError,
    },

    /// The tracing subscriber could not be installed.
    #[error("failed to initialize tracing: {0}")]
    Tracing(String),
}

/// Type alias for CLI results.
pub type CliResult<T> = Result<T, CliError>;
