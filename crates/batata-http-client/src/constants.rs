// Open API path constants following Nacos v1 open API

pub mod open_api_path {
    // Config
    pub const CONFIG: &str = "/v1/cs/configs";

    // Naming
    pub const INSTANCE: &str = "/v1/ns/instance";
    pub const INSTANCE_LIST: &str = "/v1/ns/instance/list";
}

pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8848;
pub const DEFAULT_CONTEXT_PATH: &str = "/nacos";

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30000;
