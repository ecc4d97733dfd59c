//! Transaction support.

use crate::command::Command;
use crate::connection::Connection;
use crate::error::Result;
use crate::rows::ResultSet;

/// Transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    /// Read uncommitted (dirty reads allowed).
    ReadUncommitted,

    /// Read committed (default for SQL Server).
    #[default]
    ReadCommitted,

    /// Repeatable read.
    RepeatableRead,

    /// Serializable (highest isolation).
    Serializable,

    /// Snapshot isolation (requires row versioning to be enabled on the
    /// database).
    Snapshot,
}

impl IsolationLevel {
    /// Get the SQL statement to set this isolation level.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::ReadUncommitted => "SET TRANSACTION ISOLATION LEVEL READ UNCOMMITTED",
            Self::ReadCommitted => "SET TRANSACTION ISOLATION LEVEL READ COMMITTED",
            Self::RepeatableRead => "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ",
            Self::Serializable => "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE",
            Self::Snapshot => "SET TRANSACTION ISOLATION LEVEL SNAPSHOT",
        }
    }

    /// Get the isolation level name as used in SQL Server.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ UNCOMMITTED",
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
            Self::Snapshot => "SNAPSHOT",
        }
    }
}

/// An open transaction on a borrowed connection.
///
/// Created with [`Connection::begin_transaction`]. Statements executed
/// through the guard run inside the transaction; finish with
/// [`commit`](Transaction::commit) or [`rollback`](Transaction::rollback).
/// A guard dropped without either leaves the server to roll the
/// transaction back when the connection closes.
#[must_use = "a transaction must be committed or rolled back"]
pub struct Transaction<'c> {
    conn: &'c mut Connection,
    completed: bool,
}

impl<'c> Transaction<'c> {
    pub(crate) fn new(conn: &'c mut Connection) -> Self {
        Self {
            conn,
            completed: false,
        }
    }

    /// Execute a non-query command inside the transaction.
    pub async fn execute(&mut self, command: &Command) -> Result<u64> {
        self.conn.execute(command).await
    }

    /// Execute a query inside the transaction.
    pub async fn query(&mut self, command: &Command) -> Result<ResultSet> {
        self.conn.query(command).await
    }

    /// Execute a `GO`-separated batch script inside the transaction.
    ///
    /// Same contract as [`Connection::execute_batch`]: per-statement
    /// rows-affected counts in script order, empty batches fail, and the
    /// first failing statement aborts the rest. The caller decides whether
    /// to commit or roll back afterwards.
    pub async fn execute_batch(&mut self, batch_sql: &str) -> Result<Vec<u64>> {
        let (client, timeout) = self.conn.client_and_timeout();
        crate::batch::run_batch(client, batch_sql, timeout).await
    }

    /// Commit the transaction.
    pub async fn commit(mut self) -> Result<()> {
        self.conn.run_simple("COMMIT TRANSACTION").await?;
        self.completed = true;
        tracing::debug!("transaction committed");
        Ok(())
    }

    /// Roll the transaction back.
    pub async fn rollback(mut self) -> Result<()> {
        self.conn.run_simple("ROLLBACK TRANSACTION").await?;
        self.completed = true;
        tracing::debug!("transaction rolled back");
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.completed {
            tracing::warn!(
                "transaction dropped without commit or rollback; \
                 the server rolls it back when the connection closes"
            );
        }
    }
}
