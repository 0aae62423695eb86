//! Tabular result types.
//!
//! Snowflake returns loosely-typed scalar values (text, numbers, timestamps,
//! nulls). Results are kept positional: tools that interpret `SHOW TABLES` or
//! `DESCRIBE TABLE` output pick fields by column index, matching the
//! warehouse's documented column order.

use serde_json::Value as JsonValue;

/// One query result: ordered column names plus ordered rows of scalar values.
///
/// Produced fresh per call and never cached.
#[derive(Debug, Clone, Default)]
pub struct TableResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<JsonValue>>,
}

impl TableResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<JsonValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_result() {
        let result = TableResult::default();
        assert!(result.is_empty());
        assert!(result.columns.is_empty());
    }

    #[test]
    fn test_result_preserves_order() {
        let result = TableResult::new(
            vec!["NAME".to_string(), "VAL".to_string()],
            vec![vec![json!("a"), json!(1)], vec![json!("b"), json!(2)]],
        );
        assert!(!result.is_empty());
        assert_eq!(result.columns, ["NAME", "VAL"]);
        assert_eq!(result.rows[1][0], json!("b"));
    }
}
