//! # mssql-helper
//!
//! Thin convenience layer over [tiberius] for SQL Server: connection
//! strings, connections, parameterized commands, simple result containers,
//! CSV output, and `GO`-separated batch scripts.
//!
//! The helpers stay deliberately close to the underlying client. They add
//! argument validation, timeouts, and materialization into plain owned
//! containers; they do not pool connections, retry statements, or parse
//! SQL. Batch splitting lives in the sibling [`mssql_batch`] crate and is
//! re-exported here.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mssql_helper::{Command, Config, Connection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_connection_string(
//!         "Server=localhost;Database=test;User Id=sa;Password=Password123;\
//!          TrustServerCertificate=true;",
//!     )?;
//!     let mut conn = Connection::open(config).await?;
//!
//!     conn.execute_batch(
//!         "CREATE TABLE scores (name NVARCHAR(50), score INT)\n\
//!          GO\n\
//!          INSERT INTO scores VALUES ('alice', 10), ('bob', 7)\n",
//!     )
//!     .await?;
//!
//!     let rows = conn
//!         .query(&Command::new("SELECT name, score FROM scores WHERE score > @P1").param(5))
//!         .await?;
//!
//!     for row in &rows {
//!         println!("{:?} -> {:?}", row.get_by_name("name"), row.get_by_name("score"));
//!     }
//!
//!     conn.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! [tiberius]: https://docs.rs/tiberius

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod batch;
pub mod command;
pub mod config;
pub mod connection;
pub mod csv;
pub mod error;
pub mod rows;
pub mod transaction;
pub mod value;

// Re-export commonly used types
pub use command::Command;
pub use config::Config;
pub use connection::Connection;
pub use self::csv::{csv_string, write_csv};
pub use error::{Error, Result};
pub use mssql_batch::split_statements;
pub use rows::{ResultSet, Row};
pub use transaction::{IsolationLevel, Transaction};
pub use value::Value;
