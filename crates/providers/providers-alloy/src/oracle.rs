//! Access lists for executing messages, served by the supersim admin RPC.

use alloy_eips::eip2930::AccessList;
use alloy_primitives::Bytes;
use async_trait::async_trait;
use gastank_interop::{Identifier, Payload};
use jsonrpsee::{
    core::RpcResult,
    http_client::{HttpClient, HttpClientBuilder},
    proc_macros::rpc,
};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default timeout for access list requests.
pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Parameters of `admin_getAccessListForIdentifier`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccessListRequest {
    /// The identifier of the initiating message, flattened into the request.
    #[serde(flatten)]
    pub identifier: Identifier,
    /// The payload of the initiating message.
    pub payload: Bytes,
}

/// Response of `admin_getAccessListForIdentifier`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListResponse {
    /// Storage slots the executing transaction must declare.
    pub access_list: AccessList,
}

/// The supersim admin namespace.
#[rpc(client, namespace = "admin")]
pub trait SupersimAdminApi {
    /// Computes the access list the `CrossL2Inbox` needs to validate a message.
    #[method(name = "getAccessListForIdentifier")]
    async fn get_access_list_for_identifier(
        &self,
        request: AccessListRequest,
    ) -> RpcResult<AccessListResponse>;
}

/// An error returned by an [`AccessListOracle`].
#[derive(Error, Debug)]
pub enum OracleError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClientBuild(String),
    /// The request failed.
    #[error("RPC error: {0}")]
    Rpc(#[from] jsonrpsee::core::ClientError),
}

/// Supplies the access list required to execute a message.
#[async_trait]
pub trait AccessListOracle: Send + Sync {
    /// Returns the access list for the message named by `identifier` with the given `payload`.
    async fn access_list(
        &self,
        identifier: &Identifier,
        payload: &Payload,
    ) -> Result<AccessList, OracleError>;
}

/// An [`AccessListOracle`] backed by the supersim admin RPC.
#[derive(Debug, Clone)]
pub struct HttpAccessListOracle {
    client: HttpClient,
}

impl HttpAccessListOracle {
    /// Connects to the admin RPC at `url`.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, OracleError> {
        let client = HttpClientBuilder::default()
            .request_timeout(timeout)
            .build(url)
            .map_err(|e| OracleError::HttpClientBuild(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AccessListOracle for HttpAccessListOracle {
    async fn access_list(
        &self,
        identifier: &Identifier,
        payload: &Payload,
    ) -> Result<AccessList, OracleError> {
        let request =
            AccessListRequest { identifier: *identifier, payload: payload.bytes().clone() };
        let response = self.client.get_access_list_for_identifier(request).await?;
        log_access_list(identifier, &response.access_list);
        Ok(response.access_list)
    }
}

fn log_access_list(identifier: &Identifier, access_list: &AccessList) {
    debug!(target: "oracle", %identifier, entries = access_list.len(), "Fetched access list");
    for (i, item) in access_list.iter().enumerate() {
        debug!(target: "oracle", i, address = %item.address, "Access list entry");
        for key in &item.storage_keys {
            debug!(target: "oracle", i, %key, "Storage key");
        }
    }
}
