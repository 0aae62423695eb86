//! Schema introspection tools.
//!
//! This module implements the `list_tables` and `describe_table` MCP tools.
//! Both interpret warehouse metadata rows positionally: `SHOW TABLES` puts
//! the table name in the second column and the row count in the fifth;
//! `DESCRIBE TABLE` yields name, type, nullability flag, default, and
//! primary-key flag. Identifiers are interpolated verbatim (trusted caller).

use crate::db::SessionProvider;
use crate::error::SnowflakeResult;
use crate::tools::format;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

/// Input for the list_tables tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTablesInput {
    /// Optional schema name (defaults to the configured schema)
    #[serde(default)]
    pub schema: Option<String>,
}

/// Input for the describe_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeTableInput {
    /// Name of the table to describe
    #[serde(default)]
    pub table_name: String,
}

/// Translate Snowflake's single-character flag convention ('Y'/other).
fn yes_no(value: Option<&JsonValue>) -> &'static str {
    match value {
        Some(JsonValue::String(s)) if s == "Y" => "YES",
        _ => "NO",
    }
}

/// Handler for schema introspection.
pub struct SchemaToolHandler {
    provider: Arc<SessionProvider>,
    default_schema: String,
}

impl SchemaToolHandler {
    pub fn new(provider: Arc<SessionProvider>, default_schema: impl Into<String>) -> Self {
        Self {
            provider,
            default_schema: default_schema.into(),
        }
    }

    /// Handle the list_tables tool call. Always returns a text response.
    pub async fn list_tables(&self, input: ListTablesInput) -> String {
        let schema = input
            .schema
            .unwrap_or_else(|| self.default_schema.clone());

        match self.run_list(&schema).await {
            Ok(text) => text,
            Err(e) => format!("Error listing tables: {e}"),
        }
    }

    async fn run_list(&self, schema: &str) -> SnowflakeResult<String> {
        let session = self.provider.session().await?;
        let result = session
            .execute(&format!("SHOW TABLES IN SCHEMA {schema}"))
            .await?;

        info!(schema = %schema, table_count = result.rows.len(), "Listed tables");

        if result.is_empty() {
            return Ok(format!("No tables found in schema {schema}"));
        }

        let mut output = format!("Tables in {schema}:\n\n");
        for row in &result.rows {
            // SHOW TABLES: created_on, name, database_name, schema_name, rows, ...
            let name = row.get(1).map(format::value_text).unwrap_or_default();
            let row_count = match row.get(4) {
                Some(value) => format::value_text(value),
                None => "Unknown".to_string(),
            };
            output.push_str(&format!("- {name} ({row_count} rows)\n"));
        }
        Ok(output)
    }

    /// Handle the describe_table tool call. Always returns a text response.
    pub async fn describe_table(&self, input: DescribeTableInput) -> String {
        if input.table_name.is_empty() {
            return "Error: table_name is required".to_string();
        }

        match self.run_describe(&input.table_name).await {
            Ok(text) => text,
            Err(e) => format!("Error describing table: {e}"),
        }
    }

    async fn run_describe(&self, table_name: &str) -> SnowflakeResult<String> {
        let session = self.provider.session().await?;
        let result = session
            .execute(&format!("DESCRIBE TABLE {table_name}"))
            .await?;

        info!(table = %table_name, column_count = result.rows.len(), "Described table");

        let mut output = format!("Table: {table_name}\n\n");
        output.push_str("Column Name | Type | Nullable | Default | Primary Key\n");
        output.push_str(&"-".repeat(70));
        output.push('\n');

        for row in &result.rows {
            // DESCRIBE TABLE: name, type, kind?, null?, default, primary key, ...
            let name = row.get(0).map(format::value_text).unwrap_or_default();
            let col_type = row.get(1).map(format::value_text).unwrap_or_default();
            let nullable = yes_no(row.get(2));
            let default = match row.get(3) {
                Some(JsonValue::Null) | None => "-".to_string(),
                Some(JsonValue::String(s)) if s.is_empty() => "-".to_string(),
                Some(value) => format::value_text(value),
            };
            let primary_key = yes_no(row.get(4));
            output.push_str(&format!(
                "{name} | {col_type} | {nullable} | {default} | {primary_key}\n"
            ));
        }
        Ok(output)
    }
}
