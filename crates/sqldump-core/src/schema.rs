//! Schema enumeration and server banner.

use crate::error::{DumpError, DumpResult};
use crate::executor::{ExecutorError, QueryExecutor};
use crate::identifiers::TableName;
use crate::queries::{SERVER_VERSION, SHOW_TABLES};

/// List the tables of the current database in the order the server returns them.
///
/// Errors from the executor are returned untouched. A NULL or empty name is
/// rejected as an integrity error.
pub fn list_tables<E>(executor: &mut E) -> DumpResult<Vec<TableName>>
where
    E: QueryExecutor + ?Sized,
{
    let rows = executor.query(SHOW_TABLES)?;
    let mut tables = Vec::new();

    for row in rows {
        let row = row?;
        let cell = row
            .into_iter()
            .next()
            .ok_or_else(|| ExecutorError::Scan("table listing returned an empty row".to_string()))?;
        tables.push(TableName::parse(cell.unwrap_or_default())?);
    }

    tracing::debug!(count = tables.len(), "Enumerated tables");
    Ok(tables)
}

/// Fetch the server version string; a NULL version reads as empty.
pub fn server_version<E>(executor: &mut E) -> DumpResult<String>
where
    E: QueryExecutor + ?Sized,
{
    let row = executor.query(SERVER_VERSION)?.first_row(SERVER_VERSION)?;
    match row.into_iter().next() {
        Some(version) => Ok(version.unwrap_or_default()),
        None => Err(DumpError::Executor(ExecutorError::Scan(
            "server version row has no columns".to_string(),
        ))),
    }
}
