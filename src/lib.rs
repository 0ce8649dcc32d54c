//! # sqldump
//!
//! sqldump writes a portable SQL snapshot of a relational database: each
//! table's `DROP`/`CREATE` statements and, optionally, its rows as
//! `INSERT` statements wrapped in `LOCK TABLES`/`UNLOCK TABLES`.
//!
//! ## Core Components
//!
//! - **[Dumper]**: runs a dump and writes a uniquely named `.sql` artifact
//! - **[QueryExecutor]**: the seam to the database driver
//! - **[Document]**, **[TableRecord]**: the extracted dump before rendering
//! - **[DocumentShape]**: schema-only or schema-with-data layout
//! - **[DumperConfig]**: destination, naming, row data and write mode
//!
//! ## Feature Flags
//!
//! - `sqlite` (default): [`SqliteExecutor`] for dumping SQLite databases
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "sqlite")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sqldump::{Dumper, DumperConfigBuilder, SqliteExecutor, WriteMode};
//!
//! let config = DumperConfigBuilder::from_env()?
//!     .write_mode(WriteMode::Staged)
//!     .build()?;
//! let mut dumper = Dumper::new(SqliteExecutor::open("app.db")?, config)?;
//!
//! match dumper.dump() {
//!     Ok(path) => println!("dump written to {}", path.display()),
//!     Err(failure) => eprintln!("no usable dump at {}: {}", failure.path.display(), failure.source),
//! }
//! dumper.close()?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "sqlite"))]
//! # fn main() {}
//! ```

pub use sqldump_core::*;

#[cfg(feature = "sqlite")]
pub use sqldump_sqlite::{SqliteExecutor, SqliteExecutorError};
