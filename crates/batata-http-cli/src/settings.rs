//! Command line arguments and layered client settings
//!
//! Settings are resolved in this order, later sources winning: built-in
//! defaults, the optional TOML file, `BATATA_*` environment variables, then
//! command line flags.

use batata_http_client::{
    DEFAULT_GROUP, HttpClientConfig, ServerEndpoint,
    constants::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_READ_TIMEOUT_MS},
};
use clap::{Args, Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "conf/client.toml";
pub const DEFAULT_SERVER_ADDR: &str = "http://127.0.0.1:8848/nacos";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "batata-http", version, about = "Batata/Nacos HTTP client")]
pub struct Cli {
    /// Settings file, ignored when missing
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: String,
    /// Server address, repeat for a cluster (replaces configured servers)
    #[arg(short = 's', long = "server")]
    pub servers: Vec<String>,
    #[arg(long = "connect-timeout-ms")]
    pub connect_timeout_ms: Option<u64>,
    #[arg(long = "read-timeout-ms")]
    pub read_timeout_ms: Option<u64>,
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the content of a configuration
    GetConfig(GetConfigArgs),
    /// Register a service instance
    Register(RegisterArgs),
    /// List the instances of a service
    ListInstances(ListInstancesArgs),
}

#[derive(Debug, Args)]
pub struct GetConfigArgs {
    #[arg(long, default_value = "")]
    pub namespace: String,
    #[arg(long, default_value = DEFAULT_GROUP)]
    pub group: String,
    #[arg(long = "data-id")]
    pub data_id: String,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub ip: String,
    #[arg(long)]
    pub port: u16,
    #[arg(long = "service-name")]
    pub service_name: String,
    #[arg(long = "group-name", default_value = DEFAULT_GROUP)]
    pub group_name: String,
    #[arg(long = "namespace-id", default_value = "")]
    pub namespace_id: String,
    #[arg(long = "cluster-name", default_value = "DEFAULT")]
    pub cluster_name: String,
    #[arg(long, default_value_t = 1.0)]
    pub weight: f64,
    #[arg(long, default_value = "")]
    pub metadata: String,
    #[arg(long)]
    pub disabled: bool,
    #[arg(long)]
    pub unhealthy: bool,
    /// Register a persistent (non-ephemeral) instance
    #[arg(long)]
    pub persistent: bool,
}

#[derive(Debug, Args)]
pub struct ListInstancesArgs {
    #[arg(long = "service-name")]
    pub service_name: String,
    #[arg(long = "group-name", default_value = DEFAULT_GROUP)]
    pub group_name: String,
    #[arg(long = "namespace-id", default_value = "")]
    pub namespace_id: String,
    #[arg(long, default_value = "")]
    pub clusters: String,
    #[arg(long = "healthy-only")]
    pub healthy_only: bool,
}

/// Resolved client settings
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub server_addrs: Vec<String>,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub log_level: String,
    /// Sent as the `accessToken` header when present
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Settings {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .set_default("server_addrs", vec![DEFAULT_SERVER_ADDR])?
            .set_default("connect_timeout_ms", DEFAULT_CONNECT_TIMEOUT_MS)?
            .set_default("read_timeout_ms", DEFAULT_READ_TIMEOUT_MS)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .add_source(File::with_name(&cli.config_file).required(false))
            .add_source(
                Environment::with_prefix("batata")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server_addrs"),
            );

        if !cli.servers.is_empty() {
            builder = builder.set_override("server_addrs", cli.servers.clone())?;
        }
        if let Some(v) = cli.connect_timeout_ms {
            builder = builder.set_override("connect_timeout_ms", v)?;
        }
        if let Some(v) = cli.read_timeout_ms {
            builder = builder.set_override("read_timeout_ms", v)?;
        }
        if let Some(v) = &cli.log_level {
            builder = builder.set_override("log_level", v.as_str())?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Parse the configured server addresses, keeping their order
    pub fn endpoints(&self) -> anyhow::Result<Vec<ServerEndpoint>> {
        self.server_addrs
            .iter()
            .map(|addr| addr.parse::<ServerEndpoint>().map_err(Into::into))
            .collect()
    }

    pub fn http_config(&self) -> HttpClientConfig {
        let config = HttpClientConfig::default()
            .with_timeouts(self.connect_timeout_ms, self.read_timeout_ms);

        match &self.access_token {
            Some(token) => config.with_header("accessToken", token),
            None => config,
        }
    }
}
