//! Connection lifecycle and statement helpers.

use std::sync::Arc;

use tokio::net::TcpStream;
use tokio::time;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::batch;
use crate::command::Command;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::rows::{ResultSet, Row};
use crate::transaction::{IsolationLevel, Transaction};
use crate::value::Value;

/// The underlying client over a compat-wrapped TCP stream.
pub(crate) type SqlClient = tiberius::Client<Compat<TcpStream>>;

/// An open connection to SQL Server.
///
/// Thin wrapper around a [`tiberius::Client`] carrying the [`Config`] it
/// was opened with. All statement helpers take `&mut self`: statements on
/// one connection execute one at a time, in call order.
///
/// # Example
///
/// ```rust,ignore
/// use mssql_helper::{Command, Config, Connection};
///
/// let config = Config::from_connection_string(
///     "Server=localhost;Database=test;User Id=sa;Password=Password123;",
/// )?;
/// let mut conn = Connection::open(config).await?;
///
/// let name: String = conn
///     .query_value(&Command::new("SELECT name FROM users WHERE id = @P1").param(42))
///     .await?
///     .to_string();
///
/// conn.close().await?;
/// ```
pub struct Connection {
    client: SqlClient,
    config: Config,
}

impl Connection {
    /// Open a connection using the given configuration.
    ///
    /// The configured connect timeout covers TCP connect and the login
    /// handshake together.
    pub async fn open(config: Config) -> Result<Self> {
        config.validate()?;
        #[cfg(not(windows))]
        if config.username.is_none() {
            return Err(Error::Config(
                "integrated authentication is only supported on Windows; \
                 provide a user id and password"
                    .to_string(),
            ));
        }

        tracing::debug!(
            connection_string = config.obfuscated_connection_string(false),
            "opening connection"
        );

        let client_config = config.to_client_config();
        let client = time::timeout(config.connect_timeout, async {
            let tcp = TcpStream::connect(client_config.get_addr())
                .await
                .map_err(|e| Error::Connection(e.to_string()))?;
            tcp.set_nodelay(true)?;

            tiberius::Client::connect(client_config, tcp.compat_write())
                .await
                .map_err(|e| Error::Connection(e.to_string()))
        })
        .await
        .map_err(|_| Error::ConnectionTimeout)??;

        tracing::debug!(host = config.host, port = config.port, "connection open");

        Ok(Self { client, config })
    }

    /// Open a connection from an ADO.NET-style connection string.
    pub async fn open_connection_string(conn_str: &str) -> Result<Self> {
        Self::open(Config::from_connection_string(conn_str)?).await
    }

    /// Get the configuration this connection was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute a non-query command and return the number of rows affected.
    pub async fn execute(&mut self, command: &Command) -> Result<u64> {
        command.validate()?;

        let params = command.client_params();
        let timeout = command.timeout_override().unwrap_or(self.config.command_timeout);

        tracing::debug!(sql = command.sql(), params = params.len(), "executing non-query");

        let exec = time::timeout(timeout, self.client.execute(command.sql(), &params))
            .await
            .map_err(|_| Error::CommandTimeout)??;

        Ok(exec.rows_affected().iter().sum())
    }

    /// Execute a query and materialize its first result set.
    pub async fn query(&mut self, command: &Command) -> Result<ResultSet> {
        command.validate()?;

        let params = command.client_params();
        let timeout = command.timeout_override().unwrap_or(self.config.command_timeout);

        tracing::debug!(sql = command.sql(), params = params.len(), "executing query");

        let fetched = time::timeout(timeout, async {
            let stream = self.client.query(command.sql(), &params).await?;
            stream.into_first_result().await
        })
        .await
        .map_err(|_| Error::CommandTimeout)??;

        let columns: Arc<[String]> = fetched
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|column| column.name().to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
            .into();

        let mut rows = Vec::with_capacity(fetched.len());
        for fetched_row in fetched {
            let mut values = Vec::with_capacity(fetched_row.len());
            for data in fetched_row.into_iter() {
                values.push(Value::from_column_data(data)?);
            }
            rows.push(Row::new(Arc::clone(&columns), values));
        }

        tracing::debug!(rows = rows.len(), "query materialized");

        Ok(ResultSet::from_parts(columns, rows))
    }

    /// Execute a query expected to produce exactly one row and one value.
    ///
    /// Fails with [`Error::NoRows`] or [`Error::MoreThanOneRow`] otherwise.
    pub async fn query_value(&mut self, command: &Command) -> Result<Value> {
        let result = self.query(command).await?;
        result.single_value().cloned()
    }

    /// Execute a query expected to produce exactly one row.
    ///
    /// Fails with [`Error::NoRows`] or [`Error::MoreThanOneRow`] otherwise.
    pub async fn query_single_row(&mut self, command: &Command) -> Result<Row> {
        let result = self.query(command).await?;
        result.single_row().map(Clone::clone)
    }

    /// Execute a query expected to produce at most one row.
    ///
    /// Returns `None` on an empty result; fails with
    /// [`Error::MoreThanOneRow`] when more than one row came back.
    pub async fn query_single_row_opt(&mut self, command: &Command) -> Result<Option<Row>> {
        let result = self.query(command).await?;
        Ok(result.single_row_opt()?.cloned())
    }

    /// Execute a one-column query and return its values as a flat list.
    ///
    /// Fails with [`Error::MoreThanOneColumn`] on a wider result set.
    pub async fn query_single_column(&mut self, command: &Command) -> Result<Vec<Value>> {
        let result = self.query(command).await?;
        result.single_column()
    }

    /// Check whether a query produces at least one row.
    ///
    /// Only the first row is fetched; remaining rows are discarded.
    pub async fn has_rows(&mut self, command: &Command) -> Result<bool> {
        command.validate()?;

        let params = command.client_params();
        let timeout = command.timeout_override().unwrap_or(self.config.command_timeout);

        let row = time::timeout(timeout, async {
            let stream = self.client.query(command.sql(), &params).await?;
            stream.into_row().await
        })
        .await
        .map_err(|_| Error::CommandTimeout)??;

        Ok(row.is_some())
    }

    /// Execute a `GO`-separated batch script, statement by statement.
    ///
    /// Returns the rows-affected count of each statement in script order.
    /// Fails with [`Error::EmptyBatch`] when the script splits to zero
    /// statements; the first failing statement aborts the rest of the
    /// batch and its error is propagated unchanged.
    pub async fn execute_batch(&mut self, batch_sql: &str) -> Result<Vec<u64>> {
        batch::run_batch(&mut self.client, batch_sql, self.config.command_timeout).await
    }

    /// Begin a transaction with the server's default isolation level.
    pub async fn begin_transaction(&mut self) -> Result<Transaction<'_>> {
        self.begin_transaction_with_isolation(IsolationLevel::default()).await
    }

    /// Begin a transaction with an explicit isolation level.
    pub async fn begin_transaction_with_isolation(
        &mut self,
        isolation: IsolationLevel,
    ) -> Result<Transaction<'_>> {
        self.run_simple(isolation.as_sql()).await?;
        self.run_simple("BEGIN TRANSACTION").await?;
        tracing::debug!(isolation = isolation.name(), "transaction started");
        Ok(Transaction::new(self))
    }

    /// Close the connection gracefully.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        tracing::debug!("connection closed");
        Ok(())
    }

    /// Run a statement outside the parameterized path and drain its
    /// results.
    pub(crate) async fn run_simple(&mut self, sql: &str) -> Result<()> {
        let stream = self.client.simple_query(sql).await?;
        stream.into_results().await?;
        Ok(())
    }

    pub(crate) fn client_and_timeout(&mut self) -> (&mut SqlClient, std::time::Duration) {
        (&mut self.client, self.config.command_timeout)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("database", &self.config.database)
            .finish()
    }
}
