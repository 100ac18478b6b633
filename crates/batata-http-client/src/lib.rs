//! Batata HTTP Client - failover client for Nacos-compatible clusters
//!
//! This crate provides:
//! - A shared HTTP transport with default headers and cookies
//! - A sequential failover loop over an ordered list of server endpoints
//! - `BatataConfigClient` for fetching configuration content
//! - `BatataNamingClient` for registering and querying service instances
//! - Typed request and response models for the v1 open API

pub mod config;
pub mod constants;
pub mod error;
pub mod failover;
pub mod http;
pub mod model;
pub mod naming;

pub use config::{BatataConfigClient, ConfigService};
pub use error::{ClientError, Result};
pub use http::{HttpClientConfig, HttpTransport};
pub use model::*;
pub use naming::{BatataNamingClient, NamingService};
