//! Table freshness tool.
//!
//! This module implements the `check_table_freshness` MCP tool: one
//! aggregate statement reporting the most recent value of a timestamp
//! column, the total row count, and the number of distinct calendar dates
//! the column spans.

use crate::db::SessionProvider;
use crate::error::{SnowflakeError, SnowflakeResult};
use crate::tools::format;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Timestamp column assumed when none is given.
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "UPDATED_AT";

/// Input for the check_table_freshness tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FreshnessInput {
    /// Name of the table to check
    #[serde(default)]
    pub table_name: String,
    /// Name of the timestamp column (default: UPDATED_AT)
    #[serde(default)]
    pub timestamp_column: Option<String>,
}

/// Build the freshness aggregate. Identifiers are interpolated verbatim
/// (trusted caller, same convention as the other tools).
pub fn freshness_sql(table_name: &str, timestamp_column: &str) -> String {
    format!(
        "SELECT MAX({timestamp_column}) AS LAST_UPDATE, \
         COUNT(*) AS TOTAL_ROWS, \
         COUNT(DISTINCT DATE({timestamp_column})) AS DISTINCT_DAYS \
         FROM {table_name}"
    )
}

/// Handler for the freshness check.
pub struct FreshnessToolHandler {
    provider: Arc<SessionProvider>,
}

impl FreshnessToolHandler {
    pub fn new(provider: Arc<SessionProvider>) -> Self {
        Self { provider }
    }

    /// Handle the check_table_freshness tool call. Always returns a text
    /// response.
    pub async fn check_freshness(&self, input: FreshnessInput) -> String {
        if input.table_name.is_empty() {
            return "Error: table_name is required".to_string();
        }
        let column = input
            .timestamp_column
            .unwrap_or_else(|| DEFAULT_TIMESTAMP_COLUMN.to_string());

        match self.run(&input.table_name, &column).await {
            Ok(text) => text,
            Err(e) => format!("Error checking freshness: {e}"),
        }
    }

    async fn run(&self, table_name: &str, timestamp_column: &str) -> SnowflakeResult<String> {
        let session = self.provider.session().await?;
        let result = session
            .execute(&freshness_sql(table_name, timestamp_column))
            .await?;

        let row = result
            .rows
            .first()
            .ok_or_else(|| SnowflakeError::internal("freshness query returned no rows"))?;

        let last_update = row
            .get(0)
            .map(format::value_text)
            .unwrap_or_else(|| "NULL".to_string());
        let total_rows = match row.get(1) {
            Some(value) => match format::value_as_i64(value) {
                Some(n) => format::group_digits(n),
                None => format::value_text(value),
            },
            None => "0".to_string(),
        };
        let distinct_days = row
            .get(2)
            .map(format::value_text)
            .unwrap_or_else(|| "0".to_string());

        info!(table = %table_name, column = %timestamp_column, "Checked table freshness");

        Ok(format!(
            "Table Freshness: {table_name}\n\n\
             Last Updated: {last_update}\n\
             Total Rows: {total_rows}\n\
             Data Span: {distinct_days} distinct days\n"
        ))
    }
}
