//! MCP service implementation using rmcp.
//!
//! This module defines the SnowflakeService struct with the four warehouse
//! tools exposed via the MCP protocol using the rmcp framework's macros.
//! Every tool returns a plain string, so each call produces exactly one text
//! content item whether it succeeded or failed.

use crate::db::SessionProvider;
use crate::tools::freshness::{FreshnessInput, FreshnessToolHandler};
use crate::tools::query::{QueryInput, QueryToolHandler};
use crate::tools::schema::{DescribeTableInput, ListTablesInput, SchemaToolHandler};
use rmcp::{
    ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct SnowflakeService {
    /// Shared lazy session provider for all warehouse operations
    provider: Arc<SessionProvider>,
    /// Schema used by list_tables when the caller gives none
    default_schema: String,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl SnowflakeService {
    /// Create a new SnowflakeService instance.
    pub fn new(provider: Arc<SessionProvider>, default_schema: impl Into<String>) -> Self {
        Self {
            provider,
            default_schema: default_schema.into(),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl SnowflakeService {
    #[tool(
        description = "Execute a SQL query on Snowflake and return results.\nA LIMIT clause (default 100 rows) is appended to statements that lack one."
    )]
    async fn query_snowflake(&self, Parameters(input): Parameters<QueryInput>) -> String {
        QueryToolHandler::new(self.provider.clone()).query(input).await
    }

    #[tool(
        description = "List all tables in the current database/schema.\nReturns table names with approximate row counts."
    )]
    async fn list_tables(&self, Parameters(input): Parameters<ListTablesInput>) -> String {
        SchemaToolHandler::new(self.provider.clone(), self.default_schema.clone())
            .list_tables(input)
            .await
    }

    #[tool(
        description = "Get detailed information about a table's structure.\nReturns column names, types, nullability, defaults, and primary keys."
    )]
    async fn describe_table(&self, Parameters(input): Parameters<DescribeTableInput>) -> String {
        SchemaToolHandler::new(self.provider.clone(), self.default_schema.clone())
            .describe_table(input)
            .await
    }

    #[tool(
        description = "Check when a table was last updated (requires a timestamp column).\nReports the latest timestamp, total row count, and distinct days of data."
    )]
    async fn check_table_freshness(
        &self,
        Parameters(input): Parameters<FreshnessInput>,
    ) -> String {
        FreshnessToolHandler::new(self.provider.clone())
            .check_freshness(input)
            .await
    }
}

#[tool_handler]
impl ServerHandler for SnowflakeService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "snowflake-mcp-server".to_owned(),
                title: Some("Snowflake MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tools for querying a Snowflake warehouse.\n\
                \n\
                ## Tools\n\
                - `query_snowflake`: run ad-hoc SQL (a LIMIT is added when missing)\n\
                - `list_tables`: list tables in a schema with row counts\n\
                - `describe_table`: show a table's columns and constraints\n\
                - `check_table_freshness`: report how current a table's data is\n\
                \n\
                ## Notes\n\
                - The warehouse connection is established on the first call and\n\
                  reused afterwards; the first call may be slower.\n\
                - All results come back as plain text. Failures are reported in\n\
                  the response text rather than as protocol errors."
                    .to_string(),
            ),
        }
    }
}
