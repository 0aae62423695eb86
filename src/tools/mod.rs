//! MCP tool implementations.
//!
//! This module contains the four warehouse tool handlers:
//! - `query`: Execute ad-hoc SQL queries
//! - `schema`: List tables and describe table structure
//! - `freshness`: Check when a table was last updated
//! - `format`: Shared text rendering for tool responses
//!
//! Every handler converts failures into a text response at its boundary;
//! tool calls never surface as transport-level errors.

pub mod format;
pub mod freshness;
pub mod query;
pub mod schema;

pub use freshness::{DEFAULT_TIMESTAMP_COLUMN, FreshnessInput, FreshnessToolHandler};
pub use query::{DEFAULT_ROW_LIMIT, QueryInput, QueryToolHandler};
pub use schema::{DescribeTableInput, ListTablesInput, SchemaToolHandler};
