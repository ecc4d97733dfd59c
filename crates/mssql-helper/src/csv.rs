//! CSV output for materialized query results.

use std::io::Write;

use crate::error::Result;
use crate::rows::ResultSet;

/// Write a result set as CSV.
///
/// The first record is the header row of column names, followed by one
/// record per row. NULL values render as empty fields; fields containing
/// delimiters, quotes, or line breaks are quoted by the writer. Binary
/// values render as lowercase hex.
pub fn write_csv<W: Write>(result: &ResultSet, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(result.columns())?;
    for row in result.rows() {
        writer.write_record(row.values().iter().map(ToString::to_string))?;
    }
    writer.flush()?;

    Ok(())
}

/// Render a result set as a CSV string.
pub fn csv_string(result: &ResultSet) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(result, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
