//! Client model types
//!
//! This module defines the request parameters and response bodies exchanged
//! with the Nacos v1 open API.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

use crate::constants::{DEFAULT_CONTEXT_PATH, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SCHEME};
use crate::error::ClientError;

pub const DEFAULT_GROUP: &str = "DEFAULT_GROUP";
pub const DEFAULT_CLUSTER: &str = "DEFAULT";

// ============================================================================
// Server endpoints
// ============================================================================

/// One node of the server cluster
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerEndpoint {
    /// URL scheme, usually "http" or "https"
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Context path (e.g., "/nacos"), may be empty
    pub context_path: String,
}

impl Default for ServerEndpoint {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            context_path: DEFAULT_CONTEXT_PATH.to_string(),
        }
    }
}

impl ServerEndpoint {
    pub fn new(scheme: &str, host: &str, port: u16, context_path: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            port,
            context_path: context_path.to_string(),
        }
    }

    /// `{scheme}://{host}:{port}{contextPath}` with the context path normalized
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}{}",
            self.scheme,
            self.host,
            self.port,
            normalize_context_path(&self.context_path)
        )
    }

    /// Build full URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}

impl FromStr for ServerEndpoint {
    type Err = ClientError;

    /// Parse an address such as `http://10.0.0.1:8848/nacos`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = url::Url::parse(s.trim())
            .map_err(|e| ClientError::InvalidEndpoint(format!("{s}: {e}")))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| ClientError::InvalidEndpoint(format!("{s}: missing host")))?;
        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| ClientError::InvalidEndpoint(format!("{s}: missing port")))?;

        Ok(Self {
            scheme: parsed.scheme().to_string(),
            host: host.to_string(),
            port,
            context_path: normalize_context_path(parsed.path()),
        })
    }
}

/// Normalize a context path to either "" or "/a[/b]"
fn normalize_context_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// A cookie sent with every request of a call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

// ============================================================================
// Config
// ============================================================================

/// Identifies a configuration resource
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigIdentity {
    /// Namespace id, sent as `tenant`
    pub namespace: String,
    pub group: String,
    pub data_id: String,
}

impl ConfigIdentity {
    pub fn new(namespace: &str, group: &str, data_id: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            group: group.to_string(),
            data_id: data_id.to_string(),
        }
    }
}

/// Parameters of a config fetch
#[derive(Clone, Debug, Default)]
pub struct ConfigRequest {
    pub identity: ConfigIdentity,
    /// Tried in order until one succeeds
    pub endpoints: Vec<ServerEndpoint>,
}

impl ConfigRequest {
    pub fn new(identity: ConfigIdentity, endpoints: Vec<ServerEndpoint>) -> Self {
        Self {
            identity,
            endpoints,
        }
    }
}

// ============================================================================
// Naming
// ============================================================================

/// A service instance, used both as registration payload and lookup template
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstance {
    pub ip: String,
    pub port: u16,
    pub namespace_id: String,
    #[serde(serialize_with = "serialize_finite")]
    pub weight: f64,
    pub enabled: bool,
    pub healthy: bool,
    /// Extended info, passed through as an opaque string
    pub metadata: String,
    pub cluster_name: String,
    pub service_name: String,
    pub group_name: String,
    pub ephemeral: bool,
}

impl Default for ServiceInstance {
    fn default() -> Self {
        Self {
            ip: String::new(),
            port: 0,
            namespace_id: String::new(),
            weight: 1.0,
            enabled: true,
            healthy: true,
            metadata: String::new(),
            cluster_name: DEFAULT_CLUSTER.to_string(),
            service_name: String::new(),
            group_name: DEFAULT_GROUP.to_string(),
            ephemeral: true,
        }
    }
}

impl ServiceInstance {
    pub fn new(service_name: &str, ip: &str, port: u16) -> Self {
        Self {
            ip: ip.to_string(),
            port,
            service_name: service_name.to_string(),
            ..Default::default()
        }
    }
}

fn serialize_finite<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        Err(serde::ser::Error::custom(format!(
            "weight must be a finite number, got {}",
            value
        )))
    }
}

/// Parameters of a registration or instance lookup
#[derive(Clone, Debug, Default)]
pub struct ServiceRequest {
    pub instance: ServiceInstance,
    /// Tried in order until one succeeds
    pub endpoints: Vec<ServerEndpoint>,
}

impl ServiceRequest {
    pub fn new(instance: ServiceInstance, endpoints: Vec<ServerEndpoint>) -> Self {
        Self {
            instance,
            endpoints,
        }
    }
}

/// Instance list returned by `/v1/ns/instance/list`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstanceList {
    #[serde(default)]
    pub hosts: Vec<InstanceHost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clusters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_millis: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ref_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(rename = "allIPs", default, skip_serializing_if = "Option::is_none")]
    pub all_ips: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach_protection_threshold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

impl ServiceInstanceList {
    /// Hosts that are both healthy and enabled
    pub fn healthy_hosts(&self) -> impl Iterator<Item = &InstanceHost> {
        self.hosts
            .iter()
            .filter(|h| h.healthy && h.enabled.unwrap_or(true))
    }
}

/// One host entry in an instance list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceHost {
    pub ip: String,
    pub port: u16,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub healthy: bool,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeral: Option<bool>,
}

fn default_weight() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_default() {
        let endpoint = ServerEndpoint::default();
        assert_eq!(endpoint.base_url(), "http://127.0.0.1:8848/nacos");
    }

    #[test]
    fn test_endpoint_url_normalizes_context_path() {
        let endpoint = ServerEndpoint::new("http", "10.0.0.1", 8848, "nacos/");
        assert_eq!(
            endpoint.url("/v1/cs/configs"),
            "http://10.0.0.1:8848/nacos/v1/cs/configs"
        );

        let endpoint = ServerEndpoint::new("https", "10.0.0.1", 443, "");
        assert_eq!(endpoint.url("/v1/ns/instance"), "https://10.0.0.1:443/v1/ns/instance");

        let endpoint = ServerEndpoint::new("http", "10.0.0.1", 8848, "/");
        assert_eq!(endpoint.to_string(), "http://10.0.0.1:8848");
    }

    #[test]
    fn test_endpoint_from_str() {
        let endpoint: ServerEndpoint = "http://10.0.0.2:8848/nacos/".parse().unwrap();
        assert_eq!(endpoint, ServerEndpoint::new("http", "10.0.0.2", 8848, "/nacos"));

        let endpoint: ServerEndpoint = "https://nacos.example.com".parse().unwrap();
        assert_eq!(endpoint.port, 443);
        assert_eq!(endpoint.context_path, "");
    }

    #[test]
    fn test_endpoint_from_str_invalid() {
        assert!(matches!(
            "10.0.0.1:8848".parse::<ServerEndpoint>(),
            Err(ClientError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            "localhost:8848".parse::<ServerEndpoint>(),
            Err(ClientError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_service_instance_serialization() {
        let instance = ServiceInstance {
            namespace_id: "public".to_string(),
            metadata: r#"{"version":"1"}"#.to_string(),
            ..ServiceInstance::new("order-service", "192.168.1.10", 8080)
        };
        let value = serde_json::to_value(&instance).unwrap();

        assert_eq!(value["ip"], "192.168.1.10");
        assert_eq!(value["port"], 8080);
        assert_eq!(value["namespaceId"], "public");
        assert_eq!(value["weight"], 1.0);
        assert_eq!(value["clusterName"], "DEFAULT");
        assert_eq!(value["serviceName"], "order-service");
        assert_eq!(value["groupName"], "DEFAULT_GROUP");
        assert_eq!(value["metadata"], r#"{"version":"1"}"#);
        assert_eq!(value["ephemeral"], true);
    }

    #[test]
    fn test_service_instance_rejects_non_finite_weight() {
        let instance = ServiceInstance {
            weight: f64::NAN,
            ..ServiceInstance::new("order-service", "192.168.1.10", 8080)
        };
        assert!(serde_json::to_vec(&instance).is_err());
    }

    #[test]
    fn test_instance_list_deserialization() {
        let json = r#"{
            "name": "DEFAULT_GROUP@@order-service",
            "clusters": "",
            "cacheMillis": 3000,
            "allIPs": false,
            "hosts": [
                {
                    "instanceId": "192.168.1.10#8080#DEFAULT#DEFAULT_GROUP@@order-service",
                    "ip": "192.168.1.10",
                    "port": 8080,
                    "weight": 2.0,
                    "healthy": true,
                    "enabled": true,
                    "ephemeral": true,
                    "clusterName": "DEFAULT",
                    "serviceName": "DEFAULT_GROUP@@order-service",
                    "metadata": {"version": "1"}
                },
                {"ip": "192.168.1.11", "port": 8080, "healthy": false}
            ]
        }"#;

        let list: ServiceInstanceList = serde_json::from_str(json).unwrap();
        assert_eq!(list.name.as_deref(), Some("DEFAULT_GROUP@@order-service"));
        assert_eq!(list.cache_millis, Some(3000));
        assert_eq!(list.all_ips, Some(false));
        assert_eq!(list.hosts.len(), 2);
        assert_eq!(list.hosts[0].metadata.get("version").map(String::as_str), Some("1"));
        assert_eq!(list.hosts[1].weight, 1.0);
        assert!(list.hosts[1].cluster_name.is_none());
        assert_eq!(list.healthy_hosts().count(), 1);
    }

    #[test]
    fn test_instance_list_empty_object() {
        let list: ServiceInstanceList = serde_json::from_str("{}").unwrap();
        assert_eq!(list, ServiceInstanceList::default());
        assert!(serde_json::from_str::<ServiceInstanceList>("\"hosts\"").is_err());
    }
}
