//! Sequential failover across server endpoints
//!
//! Every operation walks its endpoint list once, in the caller's order, and
//! stops at the first endpoint that produces a usable result. Any failure of
//! a single attempt (request not sent, non-200 status, unreadable or
//! unparseable body) moves on to the next endpoint, wherever it sits in the
//! list.

use std::future::Future;

use bytes::Bytes;
use reqwest::{Response, StatusCode};
use tracing::{debug, warn};

use crate::model::ServerEndpoint;

/// Outcome of one attempt against one endpoint
#[derive(Debug)]
pub enum Attempt<T> {
    Success(T),
    /// Recoverable failure, carrying the reason for the log
    Failed(String),
}

impl<T> Attempt<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Attempt<U> {
        match self {
            Attempt::Success(value) => Attempt::Success(f(value)),
            Attempt::Failed(reason) => Attempt::Failed(reason),
        }
    }
}

/// Try `endpoints` in order and return the first successful result
///
/// Returns `None` when the list is empty or every attempt failed. Each
/// endpoint is attempted at most once.
pub async fn try_endpoints<'a, T, F, Fut>(
    operation: &str,
    endpoints: &'a [ServerEndpoint],
    mut attempt: F,
) -> Option<T>
where
    F: FnMut(&'a ServerEndpoint) -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    let total = endpoints.len();

    for (index, endpoint) in endpoints.iter().enumerate() {
        match attempt(endpoint).await {
            Attempt::Success(value) => {
                debug!(
                    endpoint = %endpoint,
                    attempt = index + 1,
                    total,
                    "{} succeeded",
                    operation
                );
                return Some(value);
            }
            Attempt::Failed(reason) => {
                warn!(
                    endpoint = %endpoint,
                    attempt = index + 1,
                    total,
                    "{} failed: {}",
                    operation,
                    reason
                );
            }
        }
    }

    if total > 0 {
        warn!(total, "{} failed on all servers", operation);
    }
    None
}

/// Check a response for status 200
pub(crate) fn expect_ok(response: Option<Response>) -> Attempt<Response> {
    match response {
        None => Attempt::Failed("request could not be sent".to_string()),
        Some(response) if response.status() == StatusCode::OK => Attempt::Success(response),
        Some(response) => Attempt::Failed(format!("unexpected status {}", response.status())),
    }
}

/// Read the full body of a status-200 response
pub(crate) async fn read_ok_body(response: Option<Response>) -> Attempt<Bytes> {
    let response = match expect_ok(response) {
        Attempt::Success(response) => response,
        Attempt::Failed(reason) => return Attempt::Failed(reason),
    };

    match response.bytes().await {
        Ok(body) => Attempt::Success(body),
        Err(e) => Attempt::Failed(format!("failed to read body: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(hosts: &[&str]) -> Vec<ServerEndpoint> {
        hosts
            .iter()
            .map(|host| ServerEndpoint::new("http", host, 8848, "/nacos"))
            .collect()
    }

    #[tokio::test]
    async fn test_first_success_stops_iteration() {
        let endpoints = endpoints(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
        let mut visited = Vec::new();

        let result = try_endpoints("test", &endpoints, |endpoint| {
            visited.push(endpoint.host.clone());
            let host = endpoint.host.clone();
            async move { Attempt::Success(host) }
        })
        .await;

        assert_eq!(result.as_deref(), Some("10.0.0.1"));
        assert_eq!(visited, vec!["10.0.0.1"]);
    }

    #[tokio::test]
    async fn test_all_failures_visit_each_endpoint_once_in_order() {
        let endpoints = endpoints(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
        let mut visited = Vec::new();

        let result: Option<()> = try_endpoints("test", &endpoints, |endpoint| {
            visited.push(endpoint.host.clone());
            async { Attempt::Failed("unexpected status 500".to_string()) }
        })
        .await;

        assert!(result.is_none());
        assert_eq!(visited, vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    }

    #[tokio::test]
    async fn test_last_endpoint_success() {
        let endpoints = endpoints(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]);

        let result = try_endpoints("test", &endpoints, |endpoint| {
            let last = endpoint.host == "10.0.0.3";
            async move {
                if last {
                    Attempt::Success(42)
                } else {
                    Attempt::Failed("failed to read body".to_string())
                }
            }
        })
        .await;

        assert_eq!(result, Some(42));
    }

    #[tokio::test]
    async fn test_empty_endpoints() {
        let mut calls = 0;
        let result: Option<()> = try_endpoints("test", &[], |_| {
            calls += 1;
            async { Attempt::Success(()) }
        })
        .await;

        assert!(result.is_none());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_expect_ok_without_response() {
        assert!(matches!(expect_ok(None), Attempt::Failed(_)));
    }
}
