//! Lazy single-session provider.
//!
//! The server holds at most one live warehouse session for its whole
//! lifetime. The session is created on the first tool call that needs it and
//! reused by every call after that. Liveness is never probed and a broken
//! session is never replaced; a stale handle surfaces as an execution error
//! on the call that uses it.

use crate::db::session::{Connector, Warehouse};
use crate::error::SnowflakeResult;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Get-or-create accessor for the shared warehouse session.
pub struct SessionProvider {
    connector: Arc<dyn Connector>,
    // Mutex held across the connect await so concurrent first calls cannot
    // both create a session.
    session: Mutex<Option<Arc<dyn Warehouse>>>,
}

impl SessionProvider {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            session: Mutex::new(None),
        }
    }

    /// Return the shared session, connecting on first use.
    ///
    /// A failed connect leaves the slot empty, so the next call attempts a
    /// fresh connection instead of reusing a poisoned handle.
    pub async fn session(&self) -> SnowflakeResult<Arc<dyn Warehouse>> {
        let mut slot = self.session.lock().await;
        if let Some(session) = slot.as_ref() {
            return Ok(session.clone());
        }

        let session = self.connector.connect().await?;
        info!("Warehouse session established");
        *slot = Some(session.clone());
        Ok(session)
    }

    /// Whether a session has been established.
    pub async fn is_connected(&self) -> bool {
        self.session.lock().await.is_some()
    }
}
