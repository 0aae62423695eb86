//! Output formatting utilities for MCP tools.
//!
//! All tool responses are plain text. This module renders result rows as a
//! pipe-delimited table and provides the scalar-to-text conversions shared by
//! the tools.

use serde_json::Value as JsonValue;

/// Render a scalar result value for display. Absent values render as the SQL
/// `NULL` token.
pub fn value_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "NULL".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(arr) => serde_json::to_string(arr).unwrap_or_default(),
        JsonValue::Object(obj) => serde_json::to_string(obj).unwrap_or_default(),
    }
}

/// Interpret a result value as an integer where possible. Snowflake's REST
/// rowset delivers numbers as JSON strings.
pub fn value_as_i64(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Render query results as a pipe-delimited text table:
/// a row-count header, the column header line, a dash separator sized from
/// the column names, then one line per row.
pub fn render_table(columns: &[String], rows: &[Vec<JsonValue>]) -> String {
    let mut output = format!("Results ({} rows):\n\n", rows.len());

    output.push_str(&columns.join(" | "));
    output.push('\n');

    let width = columns.iter().map(String::len).sum::<usize>() + columns.len() * 3;
    output.push_str(&"-".repeat(width));
    output.push('\n');

    for row in rows {
        let line: Vec<String> = row.iter().map(value_text).collect();
        output.push_str(&line.join(" | "));
        output.push('\n');
    }

    output
}

/// Format an integer with comma-grouped digits, e.g. 1234567 -> "1,234,567".
pub fn group_digits(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
