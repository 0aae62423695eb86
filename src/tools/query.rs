//! Ad-hoc query execution tool.
//!
//! This module implements the `query_snowflake` MCP tool. The statement is
//! interpolated as given; callers are trusted (single-operator tool), so no
//! escaping or parameterization is applied anywhere in query construction.

use crate::db::SessionProvider;
use crate::error::SnowflakeResult;
use crate::tools::format;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Row cap applied when the statement has no LIMIT clause of its own.
pub const DEFAULT_ROW_LIMIT: u32 = 100;

/// Input for the query_snowflake tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// The SQL query to execute
    #[serde(default)]
    pub sql: String,
    /// Maximum number of rows to return (default: 100)
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Append ` LIMIT {limit}` unless the statement already contains the token
/// `LIMIT` (any case). A single trailing semicolon is dropped first.
pub fn apply_limit(sql: &str, limit: u32) -> String {
    if sql.to_uppercase().contains("LIMIT") {
        return sql.to_string();
    }
    let base = sql.strip_suffix(';').unwrap_or(sql);
    format!("{base} LIMIT {limit}")
}

/// Handler for query execution.
pub struct QueryToolHandler {
    provider: Arc<SessionProvider>,
}

impl QueryToolHandler {
    pub fn new(provider: Arc<SessionProvider>) -> Self {
        Self { provider }
    }

    /// Handle the query_snowflake tool call.
    ///
    /// Always returns a text response: a formatted table on success, an
    /// error message on failure. Failures never propagate to the transport.
    pub async fn query(&self, input: QueryInput) -> String {
        if input.sql.is_empty() {
            return "Error: SQL query is required".to_string();
        }
        let limit = input.limit.unwrap_or(DEFAULT_ROW_LIMIT);

        match self.run(&input.sql, limit).await {
            Ok(text) => text,
            Err(e) => format!("Error executing query: {e}"),
        }
    }

    async fn run(&self, sql: &str, limit: u32) -> SnowflakeResult<String> {
        let statement = apply_limit(sql, limit);
        let session = self.provider.session().await?;
        let result = session.execute(&statement).await?;

        info!(row_count = result.rows.len(), "Query executed");

        if result.is_empty() {
            return Ok("Query executed successfully. No rows returned.".to_string());
        }
        Ok(format::render_table(&result.columns, &result.rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_limit_appends() {
        assert_eq!(
            apply_limit("SELECT * FROM users", 100),
            "SELECT * FROM users LIMIT 100"
        );
    }

    #[test]
    fn test_apply_limit_strips_single_trailing_semicolon() {
        assert_eq!(
            apply_limit("SELECT * FROM users;", 50),
            "SELECT * FROM users LIMIT 50"
        );
        // Only one terminator is trimmed.
        assert_eq!(
            apply_limit("SELECT 1;;", 10),
            "SELECT 1; LIMIT 10"
        );
    }

    #[test]
    fn test_apply_limit_skips_statements_with_limit() {
        let sql = "SELECT * FROM users LIMIT 5";
        assert_eq!(apply_limit(sql, 100), sql);

        let lowercase = "select * from users limit 5;";
        assert_eq!(apply_limit(lowercase, 100), lowercase);
    }

    #[test]
    fn test_apply_limit_matches_token_anywhere() {
        // Token match is substring-based: a column named DELIMITER also
        // suppresses the appended clause.
        let sql = "SELECT DELIMITER FROM config";
        assert_eq!(apply_limit(sql, 100), sql);
    }

    #[test]
    fn test_query_input_defaults() {
        let input: QueryInput = serde_json::from_str("{}").unwrap();
        assert!(input.sql.is_empty());
        assert!(input.limit.is_none());

        let input: QueryInput =
            serde_json::from_str(r#"{"sql": "SELECT 1", "limit": 10}"#).unwrap();
        assert_eq!(input.sql, "SELECT 1");
        assert_eq!(input.limit, Some(10));
    }
}
