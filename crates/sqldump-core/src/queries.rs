//! Statements the pipeline sends to the executor.

use crate::identifiers::quote_identifier;

/// Lists the tables of the current database.
pub const SHOW_TABLES: &str = "SHOW TABLES";

/// Reports the server version string.
pub const SERVER_VERSION: &str = "SELECT version()";

/// `SHOW CREATE TABLE` for one table.
pub fn show_create_table(table: &str) -> String {
    format!("SHOW CREATE TABLE {}", quote_identifier(table))
}

/// Selects every row of one table in server order.
pub fn select_all(table: &str) -> String {
    format!("SELECT * FROM {}", quote_identifier(table))
}
