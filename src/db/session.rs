//! Snowflake session handling over the REST API.
//!
//! The rest of the crate only sees the [`Warehouse`] and [`Connector`]
//! traits: establish a session, execute a statement, get back a
//! [`TableResult`]. The production implementation speaks Snowflake's REST
//! protocol: a `login-request` exchanges credentials for a session token,
//! then each statement goes through `query-request` with that token.

use crate::config::ConnectionParams;
use crate::db::types::TableResult;
use crate::error::{SnowflakeError, SnowflakeResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const LOGIN_PATH: &str = "/session/v1/login-request";
const QUERY_PATH: &str = "/queries/v1/query-request";
const CLIENT_APP_ID: &str = "snowflake-mcp-server";

/// A live session with the warehouse.
///
/// Implementations execute exactly one statement per call, fetch all rows,
/// and return columns in positional order.
#[async_trait]
pub trait Warehouse: Send + Sync {
    async fn execute(&self, sql: &str) -> SnowflakeResult<TableResult>;
}

/// Establishes warehouse sessions. Split from [`Warehouse`] so the lazy
/// provider (and tests) can retry creation without holding a broken handle.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> SnowflakeResult<Arc<dyn Warehouse>>;
}

#[derive(Deserialize)]
struct LoginResponse {
    success: bool,
    message: Option<String>,
    data: Option<LoginData>,
}

#[derive(Deserialize)]
struct LoginData {
    token: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    success: bool,
    message: Option<String>,
    code: Option<String>,
    data: Option<QueryData>,
}

#[derive(Deserialize)]
struct QueryData {
    #[serde(default)]
    rowtype: Vec<ColumnType>,
    #[serde(default)]
    rowset: Vec<Vec<JsonValue>>,
}

#[derive(Deserialize)]
struct ColumnType {
    name: String,
}

/// Production connector: logs in to Snowflake and yields a
/// [`SnowflakeSession`].
pub struct SnowflakeConnector {
    params: ConnectionParams,
    http: reqwest::Client,
}

impl SnowflakeConnector {
    pub fn new(params: ConnectionParams) -> Self {
        Self {
            params,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Connector for SnowflakeConnector {
    async fn connect(&self) -> SnowflakeResult<Arc<dyn Warehouse>> {
        let session = SnowflakeSession::login(self.http.clone(), &self.params).await?;
        Ok(Arc::new(session))
    }
}

/// An authenticated Snowflake REST session.
pub struct SnowflakeSession {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl SnowflakeSession {
    /// Authenticate against the account endpoint and return a live session.
    ///
    /// Session scope (warehouse, database, schema) is fixed at login time
    /// from the connection parameters.
    pub async fn login(
        http: reqwest::Client,
        params: &ConnectionParams,
    ) -> SnowflakeResult<Self> {
        let base_url = params.base_url();
        let request_id = Uuid::new_v4().to_string();

        let mut query: Vec<(&str, &str)> = vec![
            ("requestId", request_id.as_str()),
            ("warehouse", params.warehouse.as_str()),
            ("schemaName", params.schema.as_str()),
        ];
        if let Some(database) = params.database.as_deref() {
            query.push(("databaseName", database));
        }

        let body = json!({
            "data": {
                "LOGIN_NAME": params.user,
                "PASSWORD": params.password,
                "ACCOUNT_NAME": params.account,
                "CLIENT_APP_ID": CLIENT_APP_ID,
                "CLIENT_APP_VERSION": env!("CARGO_PKG_VERSION"),
            }
        });

        debug!(account = %params.account, user = %params.user, "Logging in to Snowflake");

        let response: LoginResponse = http
            .post(format!("{base_url}{LOGIN_PATH}"))
            .query(&query)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if !response.success {
            return Err(SnowflakeError::connection(
                response
                    .message
                    .unwrap_or_else(|| "login rejected by Snowflake".to_string()),
            ));
        }

        let token = response
            .data
            .map(|d| d.token)
            .ok_or_else(|| SnowflakeError::connection("login response carried no session token"))?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }
}

#[async_trait]
impl Warehouse for SnowflakeSession {
    async fn execute(&self, sql: &str) -> SnowflakeResult<TableResult> {
        let request_id = Uuid::new_v4().to_string();
        let body = json!({ "sqlText": sql });

        debug!(request_id = %request_id, "Dispatching statement to Snowflake");

        let response: QueryResponse = self
            .http
            .post(format!("{}{QUERY_PATH}", self.base_url))
            .query(&[("requestId", request_id.as_str())])
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Snowflake Token=\"{}\"", self.token),
            )
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "statement rejected by Snowflake".to_string());
            return Err(match response.code {
                Some(code) => SnowflakeError::query_with_code(message, code),
                None => SnowflakeError::query(message),
            });
        }

        let data = response
            .data
            .ok_or_else(|| SnowflakeError::internal("query response carried no result data"))?;

        let columns = data.rowtype.into_iter().map(|c| c.name).collect();
        Ok(TableResult::new(columns, data.rowset))
    }
}
