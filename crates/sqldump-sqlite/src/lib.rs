//! # sqldump SQLite executor
//!
//! A [`QueryExecutor`](sqldump_core::QueryExecutor) backed by `rusqlite`, so a
//! SQLite database file can be dumped with the same pipeline used for MySQL
//! servers.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sqldump_core::Dumper;
//! use sqldump_sqlite::SqliteExecutor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = SqliteExecutor::open("app.db")?;
//! let mut dumper = Dumper::register(executor, "backups", "app-%Y%m%d", true)?;
//! let path = dumper.dump()?;
//! println!("wrote {}", path.display());
//! # Ok(())
//! # }
//! ```

mod executor;
mod statement;

pub use executor::{SqliteExecutor, SqliteExecutorError};
