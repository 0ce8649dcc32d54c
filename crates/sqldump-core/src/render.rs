//! Dump assembler.
//!
//! A [`Document`] renders in one of two shapes. Both write the banner, a
//! structure section per table and the completion footer; the data shape
//! adds a `LOCK TABLES` / `INSERT` / `UNLOCK TABLES` section after each
//! table's structure.

use std::fmt::Write;

use crate::document::{Document, TableRecord};
use crate::error::DumpResult;

/// Name written into the dump banner.
pub const TOOL_NAME: &str = "sqldump";

/// Layout of a rendered dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    SchemaOnly,
    SchemaWithData,
}

impl DocumentShape {
    /// Pick the shape from the row-data flag.
    pub fn select(include_row_data: bool) -> Self {
        if include_row_data {
            DocumentShape::SchemaWithData
        } else {
            DocumentShape::SchemaOnly
        }
    }

    pub fn for_document(document: &Document) -> Self {
        Self::select(document.include_row_data())
    }

    /// Render the whole document into memory.
    pub fn render(self, document: &Document) -> DumpResult<String> {
        let mut out = String::new();
        write_banner(&mut out, document)?;
        for table in document.tables() {
            write_structure(&mut out, table)?;
            if self == DocumentShape::SchemaWithData {
                write_data(&mut out, table)?;
            }
        }
        write_footer(&mut out, document)?;
        Ok(out)
    }
}

/// Render with the shape the document asks for.
pub fn render(document: &Document) -> DumpResult<String> {
    DocumentShape::for_document(document).render(document)
}

fn write_banner(out: &mut String, document: &Document) -> std::fmt::Result {
    writeln!(out, "-- {} SQL Dump {}", TOOL_NAME, document.dump_format_version())?;
    writeln!(out, "--")?;
    writeln!(out, "-- ------------------------------------------------------")?;
    writeln!(out, "-- Server version  {}", document.server_version())
}

fn write_structure(out: &mut String, table: &TableRecord) -> std::fmt::Result {
    let name = table.name();
    writeln!(out)?;
    writeln!(out, "--")?;
    writeln!(out, "-- Table structure for table {name}")?;
    writeln!(out, "--")?;
    writeln!(out, "DROP TABLE IF EXISTS {name};")?;
    writeln!(out, "{};", table.create_statement())
}

fn write_data(out: &mut String, table: &TableRecord) -> std::fmt::Result {
    let name = table.name();
    writeln!(out)?;
    writeln!(out, "--")?;
    writeln!(out, "-- Dumping data for table {name}")?;
    writeln!(out, "--")?;
    writeln!(out, "LOCK TABLES {name} WRITE;")?;
    if table.has_values() {
        writeln!(out, "INSERT INTO {name} VALUES {};", table.values())?;
    }
    writeln!(out, "UNLOCK TABLES;")
}

fn write_footer(out: &mut String, document: &Document) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "-- Dump completed on {}", document.completed_at())
}
