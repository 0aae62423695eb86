//! Integration tests for the tool handlers.
//!
//! These tests drive the four tools end-to-end against a scripted in-memory
//! warehouse, verifying SQL construction, text formatting, and the contract
//! that every failure comes back as a text response.

use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};
use snowflake_mcp_server::db::{Connector, SessionProvider, TableResult, Warehouse};
use snowflake_mcp_server::error::{SnowflakeError, SnowflakeResult};
use snowflake_mcp_server::tools::freshness::{FreshnessInput, FreshnessToolHandler};
use snowflake_mcp_server::tools::query::{QueryInput, QueryToolHandler};
use snowflake_mcp_server::tools::schema::{
    DescribeTableInput, ListTablesInput, SchemaToolHandler,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Warehouse double that records executed SQL and replays scripted results.
struct FakeWarehouse {
    results: Mutex<VecDeque<SnowflakeResult<TableResult>>>,
    executed: Mutex<Vec<String>>,
}

impl FakeWarehouse {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(VecDeque::new()),
            executed: Mutex::new(Vec::new()),
        })
    }

    fn push(&self, result: SnowflakeResult<TableResult>) {
        self.results.lock().unwrap().push_back(result);
    }

    fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Warehouse for FakeWarehouse {
    async fn execute(&self, sql: &str) -> SnowflakeResult<TableResult> {
        self.executed.lock().unwrap().push(sql.to_string());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(TableResult::default()))
    }
}

/// Connector double that counts session establishment attempts.
struct CountingConnector {
    warehouse: Arc<FakeWarehouse>,
    connects: AtomicUsize,
}

#[async_trait]
impl Connector for CountingConnector {
    async fn connect(&self) -> SnowflakeResult<Arc<dyn Warehouse>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(self.warehouse.clone())
    }
}

/// Connector double whose connect always fails.
struct RefusingConnector;

#[async_trait]
impl Connector for RefusingConnector {
    async fn connect(&self) -> SnowflakeResult<Arc<dyn Warehouse>> {
        Err(SnowflakeError::connection("login refused"))
    }
}

struct Fixture {
    warehouse: Arc<FakeWarehouse>,
    connector: Arc<CountingConnector>,
    provider: Arc<SessionProvider>,
}

impl Fixture {
    fn new() -> Self {
        let warehouse = FakeWarehouse::new();
        let connector = Arc::new(CountingConnector {
            warehouse: warehouse.clone(),
            connects: AtomicUsize::new(0),
        });
        let provider = Arc::new(SessionProvider::new(connector.clone()));
        Self {
            warehouse,
            connector,
            provider,
        }
    }

    fn connects(&self) -> usize {
        self.connector.connects.load(Ordering::SeqCst)
    }
}

fn table(columns: &[&str], rows: Vec<Vec<JsonValue>>) -> TableResult {
    TableResult::new(columns.iter().map(|c| c.to_string()).collect(), rows)
}

// =========================================================================
// query_snowflake
// =========================================================================

#[tokio::test]
async fn test_query_requires_sql_without_touching_connection() {
    let fx = Fixture::new();
    let handler = QueryToolHandler::new(fx.provider.clone());

    let response = handler
        .query(QueryInput {
            sql: String::new(),
            limit: None,
        })
        .await;

    assert_eq!(response, "Error: SQL query is required");
    assert_eq!(fx.connects(), 0, "validation must not open a connection");
}

#[tokio::test]
async fn test_query_appends_default_limit_and_strips_semicolon() {
    let fx = Fixture::new();
    fx.warehouse.push(Ok(TableResult::default()));
    let handler = QueryToolHandler::new(fx.provider.clone());

    let response = handler
        .query(QueryInput {
            sql: "SELECT * FROM users;".to_string(),
            limit: None,
        })
        .await;

    assert_eq!(
        fx.warehouse.executed(),
        ["SELECT * FROM users LIMIT 100"]
    );
    assert_eq!(response, "Query executed successfully. No rows returned.");
}

#[tokio::test]
async fn test_query_with_existing_limit_is_untouched() {
    let fx = Fixture::new();
    fx.warehouse.push(Ok(TableResult::default()));
    let handler = QueryToolHandler::new(fx.provider.clone());

    let sql = "select id from users limit 5";
    handler
        .query(QueryInput {
            sql: sql.to_string(),
            limit: Some(50),
        })
        .await;

    assert_eq!(fx.warehouse.executed(), [sql]);
}

#[tokio::test]
async fn test_query_renders_table_with_sized_separator() {
    let fx = Fixture::new();
    fx.warehouse.push(Ok(table(
        &["NAME", "VAL"],
        vec![vec![json!("a"), json!(1)], vec![json!("b"), json!(2)]],
    )));
    let handler = QueryToolHandler::new(fx.provider.clone());

    let response = handler
        .query(QueryInput {
            sql: "SELECT NAME, VAL FROM t".to_string(),
            limit: Some(10),
        })
        .await;

    let lines: Vec<&str> = response.lines().collect();
    assert_eq!(lines[0], "Results (2 rows):");
    assert_eq!(lines[2], "NAME | VAL");
    assert_eq!(lines[3].len(), 13, "sum of name lengths + 3 per column");
    assert!(lines[3].chars().all(|c| c == '-'));
    assert_eq!(lines[4], "a | 1");
    assert_eq!(lines[5], "b | 2");
}

#[tokio::test]
async fn test_query_renders_null_values() {
    let fx = Fixture::new();
    fx.warehouse.push(Ok(table(
        &["A", "B"],
        vec![vec![JsonValue::Null, json!("x")]],
    )));
    let handler = QueryToolHandler::new(fx.provider.clone());

    let response = handler
        .query(QueryInput {
            sql: "SELECT A, B FROM t".to_string(),
            limit: None,
        })
        .await;

    assert!(response.contains("NULL | x"));
}

#[tokio::test]
async fn test_query_execution_failure_becomes_text() {
    let fx = Fixture::new();
    fx.warehouse.push(Err(SnowflakeError::query_with_code(
        "SQL compilation error: syntax error line 1",
        "001003",
    )));
    let handler = QueryToolHandler::new(fx.provider.clone());

    let response = handler
        .query(QueryInput {
            sql: "SELEC 1".to_string(),
            limit: None,
        })
        .await;

    assert_eq!(
        response,
        "Error executing query: SQL compilation error: syntax error line 1"
    );
}

#[tokio::test]
async fn test_connection_failure_surfaces_as_query_error_text() {
    let provider = Arc::new(SessionProvider::new(Arc::new(RefusingConnector)));
    let handler = QueryToolHandler::new(provider);

    let response = handler
        .query(QueryInput {
            sql: "SELECT 1".to_string(),
            limit: None,
        })
        .await;

    assert_eq!(
        response,
        "Error executing query: Connection failed: login refused"
    );
}

// =========================================================================
// list_tables
// =========================================================================

#[tokio::test]
async fn test_list_tables_uses_default_schema() {
    let fx = Fixture::new();
    fx.warehouse.push(Ok(table(
        &["created_on", "name", "database_name", "schema_name", "rows"],
        vec![
            vec![
                json!("2024-01-01"),
                json!("ORDERS"),
                json!("DB"),
                json!("PUBLIC"),
                json!(1500),
            ],
            // A short row has no fifth column
            vec![json!("2024-01-02"), json!("EVENTS")],
        ],
    )));
    let handler = SchemaToolHandler::new(fx.provider.clone(), "PUBLIC");

    let response = handler.list_tables(ListTablesInput { schema: None }).await;

    assert_eq!(fx.warehouse.executed(), ["SHOW TABLES IN SCHEMA PUBLIC"]);
    assert!(response.starts_with("Tables in PUBLIC:\n\n"));
    assert!(response.contains("- ORDERS (1500 rows)\n"));
    assert!(response.contains("- EVENTS (Unknown rows)\n"));
}

#[tokio::test]
async fn test_list_tables_explicit_schema_empty_result() {
    let fx = Fixture::new();
    fx.warehouse.push(Ok(TableResult::default()));
    let handler = SchemaToolHandler::new(fx.provider.clone(), "PUBLIC");

    let response = handler
        .list_tables(ListTablesInput {
            schema: Some("ANALYTICS".to_string()),
        })
        .await;

    assert_eq!(fx.warehouse.executed(), ["SHOW TABLES IN SCHEMA ANALYTICS"]);
    assert_eq!(response, "No tables found in schema ANALYTICS");
}

#[tokio::test]
async fn test_list_tables_failure_becomes_text() {
    let fx = Fixture::new();
    fx.warehouse
        .push(Err(SnowflakeError::query("Schema 'NOPE' does not exist")));
    let handler = SchemaToolHandler::new(fx.provider.clone(), "PUBLIC");

    let response = handler
        .list_tables(ListTablesInput {
            schema: Some("NOPE".to_string()),
        })
        .await;

    assert_eq!(
        response,
        "Error listing tables: Schema 'NOPE' does not exist"
    );
}

// =========================================================================
// describe_table
// =========================================================================

#[tokio::test]
async fn test_describe_table_requires_name_without_touching_connection() {
    let fx = Fixture::new();
    let handler = SchemaToolHandler::new(fx.provider.clone(), "PUBLIC");

    let response = handler
        .describe_table(DescribeTableInput {
            table_name: String::new(),
        })
        .await;

    assert_eq!(response, "Error: table_name is required");
    assert_eq!(fx.connects(), 0);
}

#[tokio::test]
async fn test_describe_table_renders_columns() {
    let fx = Fixture::new();
    fx.warehouse.push(Ok(table(
        &["name", "type", "null?", "default", "primary key"],
        vec![
            vec![
                json!("ID"),
                json!("NUMBER"),
                json!("Y"),
                JsonValue::Null,
                json!("Y"),
            ],
            vec![
                json!("EMAIL"),
                json!("VARCHAR"),
                json!("N"),
                json!("'none'"),
                json!("N"),
            ],
        ],
    )));
    let handler = SchemaToolHandler::new(fx.provider.clone(), "PUBLIC");

    let response = handler
        .describe_table(DescribeTableInput {
            table_name: "USERS".to_string(),
        })
        .await;

    assert_eq!(fx.warehouse.executed(), ["DESCRIBE TABLE USERS"]);

    let lines: Vec<&str> = response.lines().collect();
    assert_eq!(lines[0], "Table: USERS");
    assert_eq!(lines[2], "Column Name | Type | Nullable | Default | Primary Key");
    assert_eq!(lines[3], "-".repeat(70));
    assert_eq!(lines[4], "ID | NUMBER | YES | - | YES");
    assert_eq!(lines[5], "EMAIL | VARCHAR | NO | 'none' | NO");
}

#[tokio::test]
async fn test_describe_table_failure_becomes_text() {
    let fx = Fixture::new();
    fx.warehouse.push(Err(SnowflakeError::query(
        "Table 'MISSING' does not exist or not authorized",
    )));
    let handler = SchemaToolHandler::new(fx.provider.clone(), "PUBLIC");

    let response = handler
        .describe_table(DescribeTableInput {
            table_name: "MISSING".to_string(),
        })
        .await;

    assert_eq!(
        response,
        "Error describing table: Table 'MISSING' does not exist or not authorized"
    );
}

// =========================================================================
// check_table_freshness
// =========================================================================

#[tokio::test]
async fn test_freshness_requires_table_name_without_touching_connection() {
    let fx = Fixture::new();
    let handler = FreshnessToolHandler::new(fx.provider.clone());

    let response = handler
        .check_freshness(FreshnessInput {
            table_name: String::new(),
            timestamp_column: None,
        })
        .await;

    assert_eq!(response, "Error: table_name is required");
    assert_eq!(fx.connects(), 0);
}

#[tokio::test]
async fn test_freshness_reports_three_lines_with_grouped_rows() {
    let fx = Fixture::new();
    fx.warehouse.push(Ok(table(
        &["LAST_UPDATE", "TOTAL_ROWS", "DISTINCT_DAYS"],
        vec![vec![
            json!("2024-06-01 12:30:00.000"),
            json!("1234567"),
            json!("42"),
        ]],
    )));
    let handler = FreshnessToolHandler::new(fx.provider.clone());

    let response = handler
        .check_freshness(FreshnessInput {
            table_name: "ORDERS".to_string(),
            timestamp_column: None,
        })
        .await;

    let executed = fx.warehouse.executed();
    assert!(executed[0].contains("MAX(UPDATED_AT)"));
    assert!(executed[0].contains("COUNT(DISTINCT DATE(UPDATED_AT))"));
    assert!(executed[0].ends_with("FROM ORDERS"));

    assert!(response.starts_with("Table Freshness: ORDERS\n\n"));
    assert!(response.contains("Last Updated: 2024-06-01 12:30:00.000\n"));
    assert!(response.contains("Total Rows: 1,234,567\n"));
    assert!(response.contains("Data Span: 42 distinct days\n"));
}

#[tokio::test]
async fn test_freshness_custom_timestamp_column() {
    let fx = Fixture::new();
    fx.warehouse.push(Ok(table(
        &["LAST_UPDATE", "TOTAL_ROWS", "DISTINCT_DAYS"],
        vec![vec![JsonValue::Null, json!("0"), json!("0")]],
    )));
    let handler = FreshnessToolHandler::new(fx.provider.clone());

    let response = handler
        .check_freshness(FreshnessInput {
            table_name: "EVENTS".to_string(),
            timestamp_column: Some("CREATED_AT".to_string()),
        })
        .await;

    assert!(fx.warehouse.executed()[0].contains("MAX(CREATED_AT)"));
    // An empty table has no max timestamp.
    assert!(response.contains("Last Updated: NULL\n"));
    assert!(response.contains("Total Rows: 0\n"));
}

#[tokio::test]
async fn test_freshness_failure_becomes_text() {
    let fx = Fixture::new();
    fx.warehouse.push(Err(SnowflakeError::query(
        "invalid identifier 'UPDATED_AT'",
    )));
    let handler = FreshnessToolHandler::new(fx.provider.clone());

    let response = handler
        .check_freshness(FreshnessInput {
            table_name: "LOGS".to_string(),
            timestamp_column: None,
        })
        .await;

    assert_eq!(
        response,
        "Error checking freshness: invalid identifier 'UPDATED_AT'"
    );
}

// =========================================================================
// shared session
// =========================================================================

#[tokio::test]
async fn test_session_is_shared_across_tools() {
    let fx = Fixture::new();
    fx.warehouse.push(Ok(TableResult::default()));
    fx.warehouse.push(Ok(TableResult::default()));

    QueryToolHandler::new(fx.provider.clone())
        .query(QueryInput {
            sql: "SELECT 1".to_string(),
            limit: None,
        })
        .await;
    SchemaToolHandler::new(fx.provider.clone(), "PUBLIC")
        .list_tables(ListTablesInput { schema: None })
        .await;

    assert_eq!(fx.connects(), 1, "one session across the process lifetime");
    assert_eq!(fx.warehouse.executed().len(), 2);
}
