//! Live SQL Server integration tests.
//!
//! These tests require a running SQL Server instance. They are ignored by
//! default and can be run with:
//!
//! ```bash
//! # Set connection details via environment variables
//! export MSSQL_HOST=localhost
//! export MSSQL_USER=sa
//! export MSSQL_PASSWORD=YourPassword
//! export MSSQL_ENCRYPT=false  # For development servers without TLS
//!
//! # Run integration tests
//! cargo test -p mssql-helper --test integration -- --ignored
//! ```
//!
//! For CI/CD, use Docker:
//! ```bash
//! docker run -e 'ACCEPT_EULA=Y' -e 'SA_PASSWORD=YourStrong@Passw0rd' \
//!     -p 1433:1433 mcr.microsoft.com/mssql/server:2022-latest
//! ```
//!
//! Statements go through the parameterized path (`sp_executesql`), where
//! session temp tables do not outlive the statement that created them, so
//! the tests work on regular tables with drop-if-exists cleanup.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use mssql_helper::{Command, Config, Connection, Error, Value};

/// Helper to get test configuration from environment variables.
fn get_test_config() -> Option<Config> {
    let host = std::env::var("MSSQL_HOST").ok()?;
    let port = std::env::var("MSSQL_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(1433);
    let user = std::env::var("MSSQL_USER").unwrap_or_else(|_| "sa".into());
    let password = std::env::var("MSSQL_PASSWORD").unwrap_or_else(|_| "MyStrongPassw0rd".into());
    let database = std::env::var("MSSQL_DATABASE").unwrap_or_else(|_| "master".into());
    let encrypt = std::env::var("MSSQL_ENCRYPT").unwrap_or_else(|_| "false".into());

    let conn_str = format!(
        "Server={},{};Database={};User Id={};Password={};TrustServerCertificate=true;Encrypt={}",
        host, port, database, user, password, encrypt
    );

    Config::from_connection_string(&conn_str).ok()
}

async fn connect() -> Connection {
    let config = get_test_config().expect("SQL Server config required");
    Connection::open(config).await.expect("Failed to connect")
}

/// Drop and recreate a test table with the given column list.
async fn recreate_table(conn: &mut Connection, table: &str, columns: &str) {
    conn.execute(&Command::new(format!("DROP TABLE IF EXISTS {table}")))
        .await
        .unwrap();
    conn.execute(&Command::new(format!("CREATE TABLE {table} ({columns})")))
        .await
        .unwrap();
}

async fn drop_table(conn: &mut Connection, table: &str) {
    conn.execute(&Command::new(format!("DROP TABLE IF EXISTS {table}")))
        .await
        .unwrap();
}

// =============================================================================
// Connection Tests
// =============================================================================

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_open_and_close() {
    let conn = connect().await;
    conn.close().await.expect("Failed to close connection");
}

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_open_with_invalid_credentials() {
    let config = get_test_config()
        .expect("SQL Server config required")
        .credentials("invalid_user", "wrong_password");

    let result = Connection::open(config).await;
    assert!(result.is_err());
}

// =============================================================================
// Query and Execute Tests
// =============================================================================

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_query_value() {
    let mut conn = connect().await;

    let value = conn
        .query_value(&Command::new("SELECT 41 + 1"))
        .await
        .unwrap();
    assert_eq!(value, Value::Int(42));

    conn.close().await.unwrap();
}

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_query_with_parameters() {
    let mut conn = connect().await;

    let row = conn
        .query_single_row(&Command::new("SELECT @P1 AS a, @P2 AS b").param(7).param("x"))
        .await
        .unwrap();

    assert_eq!(row.get_by_name("a"), Some(&Value::Int(7)));
    assert_eq!(row.get_by_name("b"), Some(&Value::String("x".to_string())));

    conn.close().await.unwrap();
}

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_query_single_row_rejects_multiple_rows() {
    let mut conn = connect().await;

    let result = conn
        .query_single_row(&Command::new("SELECT 1 UNION ALL SELECT 2"))
        .await;
    assert!(matches!(result, Err(Error::MoreThanOneRow)));

    conn.close().await.unwrap();
}

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_execute_and_read_back() {
    let mut conn = connect().await;
    recreate_table(&mut conn, "helper_people", "id INT, name NVARCHAR(50)").await;

    let affected = conn
        .execute(
            &Command::new("INSERT INTO helper_people VALUES (@P1, @P2), (@P3, @P4)")
                .param(1)
                .param("Alice")
                .param(2)
                .param("Bob"),
        )
        .await
        .unwrap();
    assert_eq!(affected, 2);

    let names = conn
        .query_single_column(&Command::new("SELECT name FROM helper_people ORDER BY id"))
        .await
        .unwrap();
    assert_eq!(
        names,
        vec![
            Value::String("Alice".to_string()),
            Value::String("Bob".to_string()),
        ]
    );

    assert!(conn
        .has_rows(&Command::new("SELECT * FROM helper_people WHERE id = 1"))
        .await
        .unwrap());
    assert!(!conn
        .has_rows(&Command::new("SELECT * FROM helper_people WHERE id = 99"))
        .await
        .unwrap());

    drop_table(&mut conn, "helper_people").await;
    conn.close().await.unwrap();
}

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_invalid_statement_propagates_client_error() {
    let mut conn = connect().await;

    let result = conn.query(&Command::new("SELECT * FROM")).await;
    assert!(matches!(result, Err(Error::Client(_))));

    conn.close().await.unwrap();
}

// =============================================================================
// Batch Tests
// =============================================================================

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_execute_batch() {
    let mut conn = connect().await;
    drop_table(&mut conn, "helper_batch").await;

    let script = "CREATE TABLE helper_batch (id INT)\n\
                  GO\n\
                  INSERT INTO helper_batch VALUES (1), (2), (3)\n\
                  GO\n\
                  DELETE FROM helper_batch WHERE id = 3\n";

    let rows_affected = conn.execute_batch(script).await.unwrap();
    assert_eq!(rows_affected, vec![0, 3, 1]);

    drop_table(&mut conn, "helper_batch").await;
    conn.close().await.unwrap();
}

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_execute_batch_rejects_empty_script() {
    let mut conn = connect().await;

    let result = conn.execute_batch("GO\r\nGO\r\n").await;
    assert!(matches!(result, Err(Error::EmptyBatch)));

    conn.close().await.unwrap();
}

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_execute_batch_aborts_on_first_failure() {
    let mut conn = connect().await;
    recreate_table(&mut conn, "helper_abort", "id INT").await;

    let script = "INSERT INTO helper_abort VALUES (1)\n\
                  GO\n\
                  INSERT INTO no_such_table VALUES (1)\n\
                  GO\n\
                  INSERT INTO helper_abort VALUES (2)\n";

    let result = conn.execute_batch(script).await;
    assert!(matches!(result, Err(Error::Client(_))));

    // The failing statement aborted the batch: the last insert never ran.
    let count = conn
        .query_value(&Command::new("SELECT COUNT(*) FROM helper_abort"))
        .await
        .unwrap();
    assert_eq!(count, Value::Int(1));

    drop_table(&mut conn, "helper_abort").await;
    conn.close().await.unwrap();
}

// =============================================================================
// Transaction Tests
// =============================================================================

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_transaction_commit() {
    let mut conn = connect().await;
    recreate_table(&mut conn, "helper_tx_commit", "id INT").await;

    let mut tx = conn.begin_transaction().await.unwrap();
    tx.execute(&Command::new("INSERT INTO helper_tx_commit VALUES (1)"))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let count = conn
        .query_value(&Command::new("SELECT COUNT(*) FROM helper_tx_commit"))
        .await
        .unwrap();
    assert_eq!(count, Value::Int(1));

    drop_table(&mut conn, "helper_tx_commit").await;
    conn.close().await.unwrap();
}

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_transaction_rollback() {
    let mut conn = connect().await;
    recreate_table(&mut conn, "helper_tx_rollback", "id INT").await;

    let mut tx = conn.begin_transaction().await.unwrap();
    tx.execute(&Command::new("INSERT INTO helper_tx_rollback VALUES (1)"))
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    let count = conn
        .query_value(&Command::new("SELECT COUNT(*) FROM helper_tx_rollback"))
        .await
        .unwrap();
    assert_eq!(count, Value::Int(0));

    drop_table(&mut conn, "helper_tx_rollback").await;
    conn.close().await.unwrap();
}

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_transaction_batch() {
    let mut conn = connect().await;
    recreate_table(&mut conn, "helper_tx_batch", "id INT").await;

    let mut tx = conn.begin_transaction().await.unwrap();
    let rows_affected = tx
        .execute_batch(
            "INSERT INTO helper_tx_batch VALUES (1)\nGO\nINSERT INTO helper_tx_batch VALUES (2)\n",
        )
        .await
        .unwrap();
    assert_eq!(rows_affected, vec![1, 1]);
    tx.commit().await.unwrap();

    let count = conn
        .query_value(&Command::new("SELECT COUNT(*) FROM helper_tx_batch"))
        .await
        .unwrap();
    assert_eq!(count, Value::Int(2));

    drop_table(&mut conn, "helper_tx_batch").await;
    conn.close().await.unwrap();
}

// =============================================================================
// CSV Tests
// =============================================================================

#[tokio::test]
#[ignore = "Requires SQL Server"]
async fn test_query_to_csv() {
    let mut conn = connect().await;

    let result = conn
        .query(&Command::new(
            "SELECT 1 AS id, 'first, second' AS note UNION ALL SELECT 2, NULL",
        ))
        .await
        .unwrap();

    let csv = mssql_helper::csv_string(&result).unwrap();
    assert_eq!(csv, "id,note\n1,\"first, second\"\n2,\n");

    conn.close().await.unwrap();
}
