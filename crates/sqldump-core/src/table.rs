//! Table descriptor builder.
//!
//! `SHOW CREATE TABLE` answers with four columns on some servers (name,
//! statement, client charset, collation) and two on others (name, statement).
//! Each accepted shape is a [`CreateTableProbe`]; the probes are tried richest
//! first and the first one matching the result's column count wins.

use crate::document::TableRecord;
use crate::error::{DumpError, DumpResult};
use crate::executor::{ExecutorError, QueryExecutor};
use crate::identifiers::TableName;
use crate::queries;
use crate::values;

/// One accepted shape of a `SHOW CREATE TABLE` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateTableProbe {
    pub columns: usize,
    pub name_column: usize,
    pub statement_column: usize,
}

impl CreateTableProbe {
    fn accepts(&self, column_count: usize) -> bool {
        column_count == self.columns
    }
}

/// Probes in the order they are attempted.
pub const CREATE_TABLE_PROBES: &[CreateTableProbe] = &[
    CreateTableProbe {
        columns: 4,
        name_column: 0,
        statement_column: 1,
    },
    CreateTableProbe {
        columns: 2,
        name_column: 0,
        statement_column: 1,
    },
];

/// Build the record for one table, with its rows when `include_rows` is set.
pub fn describe_table<E>(executor: &mut E, table: &TableName, include_rows: bool) -> DumpResult<TableRecord>
where
    E: QueryExecutor + ?Sized,
{
    let create_statement = create_statement(executor, table)?;
    let values = if include_rows {
        values::serialize_table(executor, table)?
    } else {
        String::new()
    };

    Ok(TableRecord::new(table.clone(), create_statement, values))
}

/// Fetch the creation statement, checking that the server echoed the same table.
pub fn create_statement<E>(executor: &mut E, table: &TableName) -> DumpResult<String>
where
    E: QueryExecutor + ?Sized,
{
    let sql = queries::show_create_table(table.as_str());
    let result = executor.query(&sql)?;
    let column_count = result.column_count();

    let probe = CREATE_TABLE_PROBES
        .iter()
        .find(|probe| probe.accepts(column_count))
        .ok_or_else(|| DumpError::UnrecognizedCreateTableShape {
            table: table.to_string(),
            columns: column_count,
        })?;

    let mut row = result.first_row(&sql)?;
    if row.len() != probe.columns {
        return Err(ExecutorError::Scan(format!(
            "SHOW CREATE TABLE row for {} has {} values, expected {}",
            table,
            row.len(),
            probe.columns
        ))
        .into());
    }

    let statement = row[probe.statement_column].take().unwrap_or_default();
    let returned = row[probe.name_column].take().unwrap_or_default();
    if returned != table.as_str() {
        tracing::error!(requested = %table, returned = %returned, "Introspected table name mismatch");
        return Err(DumpError::TableNameMismatch {
            requested: table.to_string(),
            returned,
        });
    }

    Ok(statement)
}
