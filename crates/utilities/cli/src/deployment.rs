//! Loading of the addresses written by the gas tank deployment script.

use crate::{CliError, CliResult};
use gastank_interop::{ContractCatalog, Deployment};
use std::{fs, path::Path};

/// Reads the deployment file at `path`.
pub fn load_deployment(path: impl AsRef<Path>) -> CliResult<Deployment> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|source| CliError::ReadDeployment { path: path.to_path_buf(), source })?;
    serde_json::from_str(&contents)
        .map_err(|source| CliError::ParseDeployment { path: path.to_path_buf(), source })
}

/// Builds the [`ContractCatalog`] for the deployment at `path` relaying from `source_chain_id` to
/// `destination_chain_id`.
pub fn load_catalog(
    path: impl AsRef<Path>,
    source_chain_id: u64,
    destination_chain_id: u64,
) -> CliResult<ContractCatalog> {
    let deployment = load_deployment(path)?;
    tracing::debug!(
        target: "cli",
        source_gas_tank = %deployment.source_gas_tank,
        destination_gas_tank = %deployment.destination_gas_tank,
        message_sender = %deployment.message_sender,
        "Loaded deployment"
    );
    Ok(ContractCatalog::new(deployment).with_chain_ids(source_chain_id, destination_chain_id))
}
