//! Snowflake MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to query a Snowflake data warehouse: ad-hoc queries, table listing, table
//! description, and data freshness checks.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod tools;
pub mod transport;

pub use config::{Config, ConnectionParams};
pub use error::SnowflakeError;
pub use mcp::SnowflakeService;
