//! # sqldump core
//!
//! Turns a live database into a replayable SQL text artifact.
//!
//! ## Pipeline
//!
//! - **[schema]**: lists tables and reads the server version
//! - **[table]**: fetches each table's creation statement and, optionally, its rows
//! - **[values]**: serializes rows into escaped SQL value tuples
//! - **[render]**: lays the collected [`Document`] out as SQL text
//! - **[Dumper]**: runs the above and writes a uniquely named artifact
//!
//! The database is reached through the [`QueryExecutor`] trait, so any driver
//! able to return rows of nullable text can back a dump.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sqldump_core::{Dumper, QueryExecutor};
//!
//! fn nightly<E: QueryExecutor>(executor: E) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut dumper = Dumper::register(executor, "/var/backups", "%Y%m%d", true)?;
//!     let path = dumper.dump()?;
//!     println!("dump written to {}", path.display());
//!     dumper.close()?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod document;
pub mod dumper;
pub mod error;
pub mod executor;
pub mod identifiers;
pub mod queries;
pub mod render;
pub mod schema;
pub mod table;
pub mod values;

pub use config::{ConfigError, DumperConfig, DumperConfigBuilder, WriteMode};
pub use document::{DUMP_FORMAT_VERSION, Document, DocumentBuilder, TableRecord};
pub use dumper::Dumper;
pub use error::{DumpError, DumpFailure, DumpResult};
pub use executor::{ExecutorError, QueryExecutor, ResultSet, Row};
pub use identifiers::TableName;
pub use render::DocumentShape;
