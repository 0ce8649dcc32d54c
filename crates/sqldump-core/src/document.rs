//! In-memory dump model.
//!
//! A [`DocumentBuilder`] collects table records while the dump is being
//! extracted. Only [`DocumentBuilder::finish`] produces a [`Document`], and it
//! is the step that stamps the completion time, so a half-built dump has no
//! renderable form.

use serde::Serialize;

use crate::identifiers::TableName;

/// Version of the dump format written into the banner.
pub const DUMP_FORMAT_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// One table's creation statement and serialized rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRecord {
    name: TableName,
    create_statement: String,
    values: String,
}

impl TableRecord {
    pub fn new(name: TableName, create_statement: impl Into<String>, values: impl Into<String>) -> Self {
        Self {
            name,
            create_statement: create_statement.into(),
            values: values.into(),
        }
    }

    pub fn name(&self) -> &TableName {
        &self.name
    }

    pub fn create_statement(&self) -> &str {
        &self.create_statement
    }

    /// Comma-separated value tuples, empty when the table had no rows or
    /// row data was not requested.
    pub fn values(&self) -> &str {
        &self.values
    }

    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }
}

/// A fully extracted dump, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    dump_format_version: &'static str,
    server_version: String,
    tables: Vec<TableRecord>,
    completed_at: String,
    include_row_data: bool,
}

impl Document {
    pub fn dump_format_version(&self) -> &str {
        self.dump_format_version
    }

    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    /// Tables in enumeration order.
    pub fn tables(&self) -> &[TableRecord] {
        &self.tables
    }

    pub fn completed_at(&self) -> &str {
        &self.completed_at
    }

    pub fn include_row_data(&self) -> bool {
        self.include_row_data
    }
}

/// Accumulates table records for one dump invocation.
#[derive(Debug)]
pub struct DocumentBuilder {
    server_version: String,
    tables: Vec<TableRecord>,
    include_row_data: bool,
}

impl DocumentBuilder {
    pub fn new(server_version: impl Into<String>, include_row_data: bool) -> Self {
        Self {
            server_version: server_version.into(),
            tables: Vec::new(),
            include_row_data,
        }
    }

    /// Append a record; order of calls is the order of the dump.
    pub fn push(&mut self, record: TableRecord) {
        self.tables.push(record);
    }

    /// Seal the document with its completion timestamp.
    pub fn finish(self, completed_at: impl Into<String>) -> Document {
        Document {
            dump_format_version: DUMP_FORMAT_VERSION,
            server_version: self.server_version,
            tables: self.tables,
            completed_at: completed_at.into(),
            include_row_data: self.include_row_data,
        }
    }
}
