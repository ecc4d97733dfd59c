//! # mssql-batch
//!
//! Splitting of SQL Server batch scripts on `GO` separator lines.
//!
//! SQL Server scripts commonly bundle several batches into one file, with a
//! line holding only the word `GO` between them. `GO` is not T-SQL; it is a
//! directive understood by client tools, so a script has to be partitioned
//! into individual batches before anything can be sent to the server. This
//! crate performs that partitioning and nothing else.
//!
//! The separator match is purely line-oriented: a line is a separator when
//! its content, ignoring surrounding horizontal whitespace, equals `GO`
//! case-insensitively. No SQL parsing takes place, so a `GO` line inside a
//! multi-line string literal or comment is still treated as a batch
//! boundary. The fragments are returned verbatim and are not checked for
//! syntactic validity.
//!
//! ## Example
//!
//! ```rust
//! use mssql_batch::split_statements;
//!
//! let script = "CREATE TABLE t (id INT)\nGO\nINSERT INTO t VALUES (1)\n";
//! let statements = split_statements(script);
//!
//! assert_eq!(statements.len(), 2);
//! assert_eq!(statements[0], "CREATE TABLE t (id INT)\n");
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
// Allow unwrap for the separator regex, which is a compile-time constant
#![allow(clippy::unwrap_used)]

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a batch separator line: the token `GO` on a line of its own,
/// case-insensitively, with optional surrounding whitespace. `\s` absorbs the
/// `\r` of CRLF line endings so both `\n` and `\r\n` delimited scripts split
/// identically.
static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?im)^\s*GO\s*$").unwrap());

/// Split a batch script into its individual statements.
///
/// Fragments between separator lines are returned in script order, with
/// their internal whitespace and line breaks preserved. Fragments that are
/// empty or consist entirely of whitespace (produced by leading, trailing,
/// or consecutive separators, or by an all-whitespace script) are dropped.
///
/// A script with no separator lines yields the whole input as a single
/// statement. A separator appearing as a substring of a longer line (for
/// example inside `'GO TEAM'`) is not a boundary; the entire trimmed line
/// must be the token.
///
/// The returned slices borrow from `batch`; a trailing statement with no
/// line break after it is still captured in full.
///
/// This function always succeeds. Validation of the surrounding call (null
/// or empty script arguments, connection state) belongs to the caller.
#[must_use]
pub fn split_statements(batch: &str) -> Vec<&str> {
    SEPARATOR
        .split(batch)
        .filter(|statement| !statement.trim().is_empty())
        .collect()
}
