//! Warehouse access layer.
//!
//! This module provides Snowflake access functionality:
//! - The narrow [`Warehouse`]/[`Connector`] traits that tools execute through
//! - The REST API session implementation behind those traits
//! - The lazy single-session provider
//! - Tabular result types

pub mod provider;
pub mod session;
pub mod types;

pub use provider::SessionProvider;
pub use session::{Connector, SnowflakeConnector, SnowflakeSession, Warehouse};
pub use types::TableResult;
