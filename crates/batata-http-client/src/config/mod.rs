//! Configuration service
//!
//! Provides `BatataConfigClient` for reading configuration content through
//! the v1 open API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use crate::constants::open_api_path;
use crate::error::{ClientError, Result};
use crate::failover::{read_ok_body, try_endpoints};
use crate::http::{HttpClientConfig, HttpTransport};
use crate::model::{ConfigIdentity, ConfigRequest};

/// Read access to configuration content
#[async_trait]
pub trait ConfigService: Send + Sync {
    /// Fetch the raw content of a configuration
    ///
    /// Endpoints are tried in order; the body of the first status-200
    /// response is returned. Fails with `ClientError::ConfigFetchFailed`
    /// once every endpoint has failed.
    async fn get_config(&self, request: &ConfigRequest) -> Result<Vec<u8>>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigQuery<'a> {
    tenant: &'a str,
    data_id: &'a str,
    group: &'a str,
}

impl<'a> From<&'a ConfigIdentity> for ConfigQuery<'a> {
    fn from(identity: &'a ConfigIdentity) -> Self {
        Self {
            tenant: &identity.namespace,
            data_id: &identity.data_id,
            group: &identity.group,
        }
    }
}

/// Config client over HTTP with endpoint failover
#[derive(Clone, Debug)]
pub struct BatataConfigClient {
    transport: Arc<HttpTransport>,
}

impl BatataConfigClient {
    /// Create a config client with its own transport
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?)))
    }

    /// Create a config client sharing an existing transport
    pub fn with_transport(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ConfigService for BatataConfigClient {
    async fn get_config(&self, request: &ConfigRequest) -> Result<Vec<u8>> {
        let query = serde_urlencoded::to_string(ConfigQuery::from(&request.identity))?;
        let query = query.as_str();
        let transport = self.transport.as_ref();

        try_endpoints("get_config", &request.endpoints, |endpoint| {
            let url = format!("{}?{}", endpoint.url(open_api_path::CONFIG), query);
            async move {
                let response = transport.request(Method::GET, &url, None, None, &[]).await;
                read_ok_body(response).await.map(|body| body.to_vec())
            }
        })
        .await
        .ok_or(ClientError::ConfigFetchFailed)
    }
}
