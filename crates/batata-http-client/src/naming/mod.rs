//! Service discovery (naming) service
//!
//! Provides `BatataNamingClient` for instance registration and instance
//! list queries through the v1 open API.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    Method,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::Serialize;

use crate::constants::open_api_path;
use crate::error::{ClientError, Result};
use crate::failover::{Attempt, expect_ok, read_ok_body, try_endpoints};
use crate::http::{HttpClientConfig, HttpTransport};
use crate::model::{ServiceInstance, ServiceInstanceList, ServiceRequest};

/// Instance registration and lookup
#[async_trait]
pub trait NamingService: Send + Sync {
    /// Register the request's instance with the first endpoint that accepts it
    ///
    /// The instance is encoded before any endpoint is contacted; an encoding
    /// failure is returned as-is. Fails with `ClientError::RegistrationFailed`
    /// once every endpoint has rejected the registration.
    async fn register_service(&self, request: &ServiceRequest) -> Result<bool>;

    /// Query the instances of the service described by the request's instance
    ///
    /// Fails with `ClientError::ServiceLookupFailed` once every endpoint has
    /// failed, including endpoints that answered with an unparseable body.
    async fn get_service(&self, request: &ServiceRequest) -> Result<ServiceInstanceList>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InstanceListQuery<'a> {
    service_name: &'a str,
    group_name: &'a str,
    namespace_id: &'a str,
    clusters: &'a str,
    healthy_only: bool,
}

impl<'a> From<&'a ServiceInstance> for InstanceListQuery<'a> {
    fn from(instance: &'a ServiceInstance) -> Self {
        Self {
            service_name: &instance.service_name,
            group_name: &instance.group_name,
            namespace_id: &instance.namespace_id,
            clusters: &instance.cluster_name,
            healthy_only: instance.healthy,
        }
    }
}

/// Naming client over HTTP with endpoint failover
#[derive(Clone, Debug)]
pub struct BatataNamingClient {
    transport: Arc<HttpTransport>,
}

impl BatataNamingClient {
    /// Create a naming client with its own transport
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?)))
    }

    /// Create a naming client sharing an existing transport
    pub fn with_transport(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl NamingService for BatataNamingClient {
    async fn register_service(&self, request: &ServiceRequest) -> Result<bool> {
        let body = Bytes::from(serde_json::to_vec(&request.instance)?);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let transport = self.transport.as_ref();

        try_endpoints("register_service", &request.endpoints, |endpoint| {
            let url = endpoint.url(open_api_path::INSTANCE);
            let body = body.clone();
            let headers = headers.clone();
            async move {
                let response = transport
                    .request(Method::POST, &url, Some(body), Some(headers), &[])
                    .await;
                expect_ok(response).map(|_| true)
            }
        })
        .await
        .ok_or(ClientError::RegistrationFailed)
    }

    async fn get_service(&self, request: &ServiceRequest) -> Result<ServiceInstanceList> {
        let query = serde_urlencoded::to_string(InstanceListQuery::from(&request.instance))?;
        let query = query.as_str();
        let transport = self.transport.as_ref();

        try_endpoints("get_service", &request.endpoints, |endpoint| {
            let url = format!("{}?{}", endpoint.url(open_api_path::INSTANCE_LIST), query);
            async move {
                let response = transport.request(Method::GET, &url, None, None, &[]).await;
                let body = match read_ok_body(response).await {
                    Attempt::Success(body) => body,
                    Attempt::Failed(reason) => return Attempt::Failed(reason),
                };

                match serde_json::from_slice::<ServiceInstanceList>(&body) {
                    Ok(list) => Attempt::Success(list),
                    Err(e) => Attempt::Failed(format!("invalid instance list: {}", e)),
                }
            }
        })
        .await
        .ok_or(ClientError::ServiceLookupFailed)
    }
}
