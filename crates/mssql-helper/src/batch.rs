//! Batch script execution.
//!
//! A batch script is split into statements on `GO` separator lines by
//! [`mssql_batch::split_statements`], then each statement is executed in
//! script order as an independent command on one connection. Later
//! statements routinely depend on the side effects of earlier ones (DDL
//! before DML), so execution is strictly sequential and stops at the first
//! failure.

use std::time::Duration;

use mssql_batch::split_statements;

use crate::connection::SqlClient;
use crate::error::{Error, Result};

/// Split a batch script, failing when nothing remains to execute.
///
/// A script that splits to zero statements (empty, whitespace-only, or
/// separators only) is an invalid batch: executing it must fail rather
/// than silently succeed with zero statements.
pub(crate) fn prepare_batch(batch: &str) -> Result<Vec<&str>> {
    let statements = split_statements(batch);
    if statements.is_empty() {
        return Err(Error::EmptyBatch);
    }
    Ok(statements)
}

/// Execute every statement of a batch script in order.
///
/// Returns the rows-affected count of each statement, in script order. The
/// first failing statement aborts the batch; its error is propagated
/// unchanged and no later statement runs. Statements are never retried or
/// skipped.
pub(crate) async fn run_batch(
    client: &mut SqlClient,
    batch: &str,
    command_timeout: Duration,
) -> Result<Vec<u64>> {
    let statements = prepare_batch(batch)?;

    let mut rows_affected = Vec::with_capacity(statements.len());
    for (index, statement) in statements.iter().enumerate() {
        tracing::debug!(
            statement = index + 1,
            total = statements.len(),
            "executing batch statement"
        );

        let exec = tokio::time::timeout(command_timeout, client.execute(*statement, &[]))
            .await
            .map_err(|_| Error::CommandTimeout)?
            .inspect_err(|error| {
                tracing::error!(statement = index + 1, %error, "batch statement failed");
            })?;

        rows_affected.push(exec.rows_affected().iter().sum());
    }

    Ok(rows_affected)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_batch_splits_statements() {
        let statements = prepare_batch("Select 1\nGO\nSelect 2\n").unwrap();
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_prepare_batch_without_separator() {
        let statements = prepare_batch("Select 1").unwrap();
        assert_eq!(statements, vec!["Select 1"]);
    }

    #[test]
    fn test_prepare_batch_rejects_empty_script() {
        assert!(matches!(prepare_batch(""), Err(Error::EmptyBatch)));
        assert!(matches!(prepare_batch("  \r\n"), Err(Error::EmptyBatch)));
    }

    #[test]
    fn test_prepare_batch_rejects_separators_only() {
        assert!(matches!(prepare_batch("\r\nGO\r\n\r\nGO"), Err(Error::EmptyBatch)));
    }
}
