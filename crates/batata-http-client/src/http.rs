//! Shared HTTP transport
//!
//! This module provides the single-request transport used by the config and
//! naming clients. One `reqwest::Client` is built per transport and reused for
//! every request, so connections are pooled across calls.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{
    Client, Method, Response,
    header::{COOKIE, HeaderMap, HeaderName, HeaderValue},
};
use tracing::{debug, warn};

use crate::constants::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_READ_TIMEOUT_MS};
use crate::error::{ClientError, Result};
use crate::model::Cookie;

/// Configuration for the HTTP transport
#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Headers sent with every request (e.g. an access token)
    pub headers: Vec<(String, String)>,
    /// Cookies sent with every request
    pub cookies: Vec<Cookie>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            headers: Vec::new(),
            cookies: Vec::new(),
        }
    }
}

impl HttpClientConfig {
    /// Set timeouts
    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a cookie sent with every request
    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.push(Cookie::new(name, value));
        self
    }
}

/// HTTP transport issuing one request per call, without retries
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    cookies: Vec<Cookie>,
}

impl HttpTransport {
    /// Create a new transport
    ///
    /// Fails if the underlying client cannot be built, a configured header
    /// is not a valid HTTP header, or a configured cookie would not survive
    /// being joined into one `Cookie` header.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        for cookie in &config.cookies {
            validate_cookie(cookie)?;
        }

        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::InvalidHeader(format!("{name}: {e}")))?;
            default_headers.append(name, value);
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            client,
            cookies: config.cookies,
        })
    }

    /// Issue a single request
    ///
    /// Returns `None` when the request cannot be built or sent. Callers treat
    /// that the same as an error status from the endpoint.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<Bytes>,
        headers: Option<HeaderMap>,
        cookies: &[Cookie],
    ) -> Option<Response> {
        let mut builder = self.client.request(method.clone(), url);

        if let Some(headers) = headers {
            builder = builder.headers(headers);
        }

        if let Err(e) = cookies.iter().try_for_each(validate_cookie) {
            warn!("Rejected cookie for {} {}: {}", method, url, e);
            return None;
        }

        if let Some(cookie_header) = cookie_header(self.cookies.iter().chain(cookies)) {
            match HeaderValue::from_str(&cookie_header) {
                Ok(value) => builder = builder.header(COOKIE, value),
                Err(e) => {
                    warn!("Invalid cookie for {} {}: {}", method, url, e);
                    return None;
                }
            }
        }

        if let Some(body) = body {
            builder = builder.body(body);
        }

        match builder.send().await {
            Ok(response) => {
                debug!("{} {} -> {}", method, url, response.status());
                Some(response)
            }
            Err(e) => {
                warn!("Request {} {} failed: {}", method, url, e);
                None
            }
        }
    }
}

/// Check that a cookie can be joined into a `Cookie` header unambiguously
///
/// `;` separates pairs and `=` ends the name; `=` inside a value is left to
/// the server, which splits on the first one.
fn validate_cookie(cookie: &Cookie) -> Result<()> {
    let bad_name = cookie.name.is_empty()
        || cookie
            .name
            .chars()
            .any(|c| c == ';' || c == '=' || c.is_whitespace());
    if bad_name || cookie.value.contains(';') {
        return Err(ClientError::InvalidCookie(cookie.name.clone()));
    }
    Ok(())
}

/// Render cookies as a single `Cookie` header value
fn cookie_header<'a>(cookies: impl Iterator<Item = &'a Cookie>) -> Option<String> {
    let pairs: Vec<String> = cookies
        .map(|c| format!("{}={}", c.name, c.value))
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
