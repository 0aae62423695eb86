//! Configuration handling for the Snowflake MCP Server.
//!
//! Configuration is read once at startup from CLI arguments and environment
//! variables. The Snowflake connection parameters are copied into an
//! immutable [`ConnectionParams`] value that is shared for the process
//! lifetime and never mutated.

use clap::{Parser, ValueEnum};

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";

/// Warehouse used when SNOWFLAKE_WAREHOUSE is not set.
pub const DEFAULT_WAREHOUSE: &str = "COMPUTE_WH";
/// Schema used when SNOWFLAKE_SCHEMA is not set.
pub const DEFAULT_SCHEMA: &str = "PUBLIC";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// HTTP with streaming responses (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Immutable Snowflake connection parameters.
///
/// Built once from [`Config`] at startup. The password is intentionally not
/// part of any Debug/log output path.
#[derive(Clone)]
pub struct ConnectionParams {
    pub user: String,
    pub password: String,
    pub account: String,
    pub warehouse: String,
    pub database: Option<String>,
    pub schema: String,
}

impl ConnectionParams {
    /// Base URL of the account's Snowflake endpoint.
    pub fn base_url(&self) -> String {
        format!("https://{}.snowflakecomputing.com", self.account)
    }
}

impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("account", &self.account)
            .field("warehouse", &self.warehouse)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .finish()
    }
}

/// Configuration for the Snowflake MCP Server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "snowflake-mcp-server",
    about = "MCP server for Snowflake - enables AI assistants to query a Snowflake warehouse",
    version,
    author
)]
pub struct Config {
    /// Snowflake login name
    #[arg(long, env = "SNOWFLAKE_USER")]
    pub user: String,

    /// Snowflake password (sensitive - not logged)
    #[arg(long, env = "SNOWFLAKE_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Snowflake account identifier, e.g. "xy12345" or "xy12345.us-east-1"
    #[arg(long, env = "SNOWFLAKE_ACCOUNT")]
    pub account: String,

    /// Virtual warehouse used for query execution
    #[arg(long, env = "SNOWFLAKE_WAREHOUSE", default_value = DEFAULT_WAREHOUSE)]
    pub warehouse: String,

    /// Database to scope the session to
    #[arg(long, env = "SNOWFLAKE_DATABASE")]
    pub database: Option<String>,

    /// Default schema for the session and for list_tables
    #[arg(long, env = "SNOWFLAKE_SCHEMA", default_value = DEFAULT_SCHEMA)]
    pub schema: String,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,

    /// Authentication tokens for HTTP transport.
    /// Can be specified multiple times or as comma-separated values.
    /// When set, all HTTP requests must include a valid Bearer token.
    #[arg(
        long = "auth-token",
        value_name = "TOKEN",
        env = "MCP_AUTH_TOKENS",
        value_delimiter = ','
    )]
    pub auth_tokens: Vec<String>,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            user: "test_user".to_string(),
            password: "test_password".to_string(),
            account: "xy12345".to_string(),
            warehouse: DEFAULT_WAREHOUSE.to_string(),
            database: None,
            schema: DEFAULT_SCHEMA.to_string(),
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            auth_tokens: Vec::new(),
        }
    }

    /// Snapshot the Snowflake connection parameters.
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams {
            user: self.user.clone(),
            password: self.password.clone(),
            account: self.account.clone(),
            warehouse: self.warehouse.clone(),
            database: self.database.clone(),
            schema: self.schema.clone(),
        }
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
