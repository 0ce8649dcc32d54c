//! Query executor seam.
//!
//! The pipeline never talks to a driver directly. It issues SQL text through a
//! [`QueryExecutor`] and reads back a [`ResultSet`]: column names up front,
//! then rows of nullable text cells.

use std::fmt;

use thiserror::Error;

/// One scanned row: a nullable text slot per column, in column order.
pub type Row = Vec<Option<String>>;

/// Errors raised by an executor.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The statement was rejected or failed while running.
    #[error("query `{sql}` failed: {message}")]
    Query { sql: String, message: String },

    /// A single-row query returned nothing.
    #[error("query `{sql}` returned no rows")]
    NoRows { sql: String },

    /// A row could not be scanned into text slots.
    #[error("row scan failed: {0}")]
    Scan(String),

    /// The connection is unusable.
    #[error("connection error: {0}")]
    Connection(String),

    /// The executor was closed.
    #[error("executor is closed")]
    Closed,

    /// Driver error passed through as-is.
    #[error(transparent)]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Columns and rows produced by a single query.
pub struct ResultSet {
    columns: Vec<String>,
    rows: Box<dyn Iterator<Item = Result<Row, ExecutorError>>>,
}

impl ResultSet {
    /// Create a result set over a row source that may fail mid-stream.
    pub fn new<I>(columns: Vec<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = Result<Row, ExecutorError>>,
        I::IntoIter: 'static,
    {
        Self {
            columns,
            rows: Box::new(rows.into_iter()),
        }
    }

    /// Create a result set from rows already in memory.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self::new(columns, rows.into_iter().map(Ok))
    }

    /// A result set with neither columns nor rows.
    pub fn empty() -> Self {
        Self::from_rows(Vec::new(), Vec::new())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Scan the first row, failing with [`ExecutorError::NoRows`] when there is none.
    pub fn first_row(mut self, sql: &str) -> Result<Row, ExecutorError> {
        match self.rows.next() {
            Some(row) => row,
            None => Err(ExecutorError::NoRows {
                sql: sql.to_string(),
            }),
        }
    }
}

impl Iterator for ResultSet {
    type Item = Result<Row, ExecutorError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }
}

impl fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

/// An open connection able to run SQL text and return text rows.
///
/// Implementations are owned by the caller's [`Dumper`](crate::Dumper) and are
/// only released through [`QueryExecutor::close`].
pub trait QueryExecutor {
    /// Run one statement and return its result set.
    fn query(&mut self, sql: &str) -> Result<ResultSet, ExecutorError>;

    /// Release the underlying connection.
    fn close(&mut self) -> Result<(), ExecutorError> {
        Ok(())
    }
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &mut E {
    fn query(&mut self, sql: &str) -> Result<ResultSet, ExecutorError> {
        (**self).query(sql)
    }

    fn close(&mut self) -> Result<(), ExecutorError> {
        (**self).close()
    }
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for Box<E> {
    fn query(&mut self, sql: &str) -> Result<ResultSet, ExecutorError> {
        (**self).query(sql)
    }

    fn close(&mut self) -> Result<(), ExecutorError> {
        (**self).close()
    }
}
