//! # Mock Executor for Testing
//!
//! A [`QueryExecutor`] that answers from scripted responses and records every
//! statement it receives, so dump scenarios can be replayed without a server.

use sqldump_core::{ExecutorError, QueryExecutor, ResultSet, Row, queries};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Scripted answer to one statement.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Columns and rows returned successfully.
    Rows { columns: Vec<String>, rows: Vec<Row> },
    /// The statement fails outright.
    Failure(String),
    /// Rows stream normally, then the scan fails.
    ScanError {
        columns: Vec<String>,
        rows: Vec<Row>,
        message: String,
    },
}

/// An executor returning predefined responses keyed by exact SQL text.
///
/// Clones share call history and close state, so a test can keep a handle
/// after moving the executor into a dumper.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    responses: HashMap<String, MockResponse>,
    call_history: Arc<Mutex<Vec<String>>>,
    close_count: Arc<Mutex<usize>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `sql` with the given columns and rows.
    pub fn with_rows(mut self, sql: impl Into<String>, columns: &[&str], rows: Vec<Row>) -> Self {
        self.responses.insert(
            sql.into(),
            MockResponse::Rows {
                columns: to_strings(columns),
                rows,
            },
        );
        self
    }

    /// Fail `sql` with a query error.
    pub fn with_failure(mut self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses
            .insert(sql.into(), MockResponse::Failure(message.into()));
        self
    }

    /// Stream `rows` for `sql`, then fail with a scan error.
    pub fn with_scan_error(
        mut self,
        sql: impl Into<String>,
        columns: &[&str],
        rows: Vec<Row>,
        message: impl Into<String>,
    ) -> Self {
        self.responses.insert(
            sql.into(),
            MockResponse::ScanError {
                columns: to_strings(columns),
                rows,
                message: message.into(),
            },
        );
        self
    }

    /// Answer `SELECT version()`.
    pub fn with_server_version(self, version: &str) -> Self {
        self.with_rows(queries::SERVER_VERSION, &["version()"], vec![vec![text(version)]])
    }

    /// Answer `SHOW TABLES` with `names` in the given order.
    pub fn with_tables(self, names: &[&str]) -> Self {
        let rows = names.iter().map(|name| vec![text(name)]).collect();
        self.with_rows(queries::SHOW_TABLES, &["Tables_in_test"], rows)
    }

    /// Answer `SHOW CREATE TABLE` for `name` with the two-column shape.
    pub fn with_create_table(self, name: &str, statement: &str) -> Self {
        self.with_rows(
            queries::show_create_table(name),
            &["Table", "Create Table"],
            vec![vec![text(name), text(statement)]],
        )
    }

    /// Answer `SELECT *` for `name`.
    pub fn with_table_rows(self, name: &str, columns: &[&str], rows: Vec<Row>) -> Self {
        self.with_rows(queries::select_all(name), columns, rows)
    }

    /// Script a whole table: its creation statement and its rows.
    pub fn with_table(self, name: &str, statement: &str, columns: &[&str], rows: Vec<Row>) -> Self {
        self.with_create_table(name, statement)
            .with_table_rows(name, columns, rows)
    }

    /// Statements received so far, in order.
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_history.lock().unwrap().len()
    }

    /// Check if the executor received `sql`.
    pub fn was_called_with(&self, sql: &str) -> bool {
        self.call_history.lock().unwrap().iter().any(|s| s == sql)
    }

    /// Number of times `close` was called.
    pub fn close_count(&self) -> usize {
        *self.close_count.lock().unwrap()
    }
}

impl QueryExecutor for MockExecutor {
    fn query(&mut self, sql: &str) -> Result<ResultSet, ExecutorError> {
        self.call_history.lock().unwrap().push(sql.to_string());

        match self.responses.get(sql) {
            Some(MockResponse::Rows { columns, rows }) => {
                Ok(ResultSet::from_rows(columns.clone(), rows.clone()))
            }
            Some(MockResponse::Failure(message)) => Err(ExecutorError::Query {
                sql: sql.to_string(),
                message: message.clone(),
            }),
            Some(MockResponse::ScanError {
                columns,
                rows,
                message,
            }) => {
                let streamed = rows.clone().into_iter().map(Ok);
                let failure = std::iter::once(Err(ExecutorError::Scan(message.clone())));
                Ok(ResultSet::new(columns.clone(), streamed.chain(failure)))
            }
            None => Err(ExecutorError::Query {
                sql: sql.to_string(),
                message: "no mock response scripted".to_string(),
            }),
        }
    }

    fn close(&mut self) -> Result<(), ExecutorError> {
        *self.close_count.lock().unwrap() += 1;
        Ok(())
    }
}

/// Non-null text cell.
pub fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

/// Build a row from optional string slices.
pub fn row(cells: &[Option<&str>]) -> Row {
    cells.iter().map(|cell| cell.map(str::to_string)).collect()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
