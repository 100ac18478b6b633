//! Client error types for the Batata HTTP client

/// Error type for Batata HTTP client operations
///
/// Exhaustion errors carry no per-endpoint detail; the individual attempts
/// are reported through `tracing` instead.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("configuration fetch failed")]
    ConfigFetchFailed,

    #[error("service registration failed")]
    RegistrationFailed,

    #[error("service lookup failed")]
    ServiceLookupFailed,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("query encoding error: {0}")]
    QueryEncoding(#[from] serde_urlencoded::ser::Error),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("invalid cookie: {0}")]
    InvalidCookie(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
