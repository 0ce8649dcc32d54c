//! # sqldump Testing
//!
//! Utilities for exercising the dump pipeline without a database server.
//!
//! ```rust
//! use sqldump_testing::{MockExecutor, row};
//!
//! let executor = MockExecutor::new()
//!     .with_server_version("8.0.36")
//!     .with_tables(&["users"])
//!     .with_table("users", "CREATE TABLE users (id INT)", &["id"], vec![row(&[Some("1")])]);
//! assert_eq!(executor.call_count(), 0);
//! ```

pub mod mock_executor;

pub use mock_executor::{MockExecutor, MockResponse, row, text};
