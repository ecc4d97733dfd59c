//! Parameterized command construction.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::value::Value;

/// A SQL command: statement text, ordered parameters, and an optional
/// per-command timeout.
///
/// Parameters bind positionally to `@P1`, `@P2`, ... placeholders in the
/// statement text. A command without an explicit timeout falls back to the
/// connection's configured command timeout when executed.
///
/// # Example
///
/// ```rust
/// use mssql_helper::Command;
///
/// let command = Command::new("SELECT name FROM users WHERE id = @P1 AND active = @P2")
///     .param(42)
///     .param(true);
///
/// assert_eq!(command.params().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    sql: String,
    params: Vec<Value>,
    timeout: Option<Duration>,
}

impl Command {
    /// Create a new command from SQL text.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            timeout: None,
        }
    }

    /// Bind the next positional parameter.
    #[must_use]
    pub fn param(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Bind several positional parameters at once.
    #[must_use]
    pub fn params_from<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.params.extend(values.into_iter().map(Into::into));
        self
    }

    /// Set a per-command execution timeout, overriding the connection
    /// default.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Get the bound parameters.
    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Get the per-command timeout, if one was set.
    #[must_use]
    pub fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }

    /// Check that the command can be executed.
    pub fn validate(&self) -> Result<()> {
        if self.sql.trim().is_empty() {
            return Err(Error::Command("statement text is empty".to_string()));
        }
        if matches!(self.timeout, Some(t) if t.is_zero()) {
            return Err(Error::Command("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Borrow the parameters as the trait objects the client binds.
    pub(crate) fn client_params(&self) -> Vec<&dyn tiberius::ToSql> {
        self.params
            .iter()
            .map(|p| p as &dyn tiberius::ToSql)
            .collect()
    }
}
