//! [`QueryExecutor`] over a `rusqlite` connection.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Params, params};
use sqldump_core::{ExecutorError, QueryExecutor, ResultSet, Row};

use crate::statement::{Statement, classify, quote_sqlite_identifier};

/// Busy timeout applied to connections opened by this crate.
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Error type for opening a SQLite executor
#[derive(Debug, thiserror::Error)]
pub enum SqliteExecutorError {
    #[error("failed to open SQLite database {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to configure SQLite connection: {0}")]
    Configure(#[from] rusqlite::Error),
}

/// Answers the dump pipeline's statements from a SQLite database.
///
/// `SHOW TABLES`, `SHOW CREATE TABLE` and `SELECT version()` are served from
/// `sqlite_master` and `sqlite_version()`; other statements run as written.
/// Every cell is returned as text: integers and reals in their decimal form,
/// text and blobs as UTF-8. A cell holding other bytes fails the scan.
#[derive(Debug)]
pub struct SqliteExecutor {
    conn: Option<Connection>,
}

impl SqliteExecutor {
    /// Open an existing database file read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteExecutorError> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| SqliteExecutorError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        tracing::debug!(path = ?path, "Opened SQLite database for dumping");
        Ok(Self { conn: Some(conn) })
    }

    /// Wrap a connection the caller has already configured.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn: Some(conn) }
    }

    /// Borrow the open connection.
    pub fn connection(&self) -> Result<&Connection, ExecutorError> {
        self.conn.as_ref().ok_or(ExecutorError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }
}

impl QueryExecutor for SqliteExecutor {
    fn query(&mut self, sql: &str) -> Result<ResultSet, ExecutorError> {
        let conn = self.connection()?;

        match classify(sql) {
            Statement::ShowTables => run(
                conn,
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
                 ORDER BY rowid",
                [],
                Some(&["Tables_in_main"][..]),
            ),
            Statement::ServerVersion => {
                run(conn, "SELECT sqlite_version()", [], Some(&["version()"][..]))
            }
            Statement::ShowCreateTable(name) => {
                let result = run(
                    conn,
                    "SELECT name, sql FROM sqlite_master \
                     WHERE type IN ('table', 'view') AND name = ?1",
                    params![name],
                    Some(&["Table", "Create Table"][..]),
                )?;
                if result.is_empty() {
                    return Err(ExecutorError::Query {
                        sql: sql.to_string(),
                        message: format!("Table '{name}' doesn't exist"),
                    });
                }
                Ok(result)
            }
            Statement::SelectAll(name) => run(
                conn,
                &format!("SELECT * FROM {}", quote_sqlite_identifier(&name)),
                [],
                None,
            ),
            Statement::Passthrough(sql) => run(conn, sql, [], None),
        }
        .map(Collected::into_result_set)
    }

    fn close(&mut self) -> Result<(), ExecutorError> {
        let conn = self.conn.take().ok_or(ExecutorError::Closed)?;
        conn.close().map_err(|(_, e)| backend(e))?;
        tracing::debug!("Closed SQLite executor");
        Ok(())
    }
}

/// Rows read eagerly from a statement.
struct Collected {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Collected {
    fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn into_result_set(self) -> ResultSet {
        ResultSet::from_rows(self.columns, self.rows)
    }
}

fn run<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    columns: Option<&[&str]>,
) -> Result<Collected, ExecutorError> {
    let mut stmt = conn.prepare(sql).map_err(backend)?;
    let width = stmt.column_count();
    let columns: Vec<String> = match columns {
        Some(names) => names.iter().map(|name| name.to_string()).collect(),
        None => stmt.column_names().into_iter().map(String::from).collect(),
    };

    let mut rows = Vec::new();
    let mut cursor = stmt.query(params).map_err(backend)?;
    while let Some(row) = cursor.next().map_err(backend)? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            let value = row.get_ref(i).map_err(backend)?;
            let cell = text_cell(value).map_err(|e| {
                let column = columns.get(i).map_or("?", String::as_str);
                ExecutorError::Scan(format!(
                    "column {column} of row {} is not valid UTF-8: {e}",
                    rows.len() + 1
                ))
            })?;
            cells.push(cell);
        }
        rows.push(cells);
    }

    Ok(Collected { columns, rows })
}

/// Convert a cell to text. Bytes that are not valid UTF-8 cannot be carried
/// in a text row and are refused rather than replaced.
fn text_cell(value: ValueRef<'_>) -> Result<Option<String>, std::str::Utf8Error> {
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i.to_string())),
        ValueRef::Real(f) => Ok(Some(f.to_string())),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            std::str::from_utf8(bytes).map(|text| Some(text.to_string()))
        }
    }
}

fn backend(e: rusqlite::Error) -> ExecutorError {
    ExecutorError::Backend(Box::new(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqldump_core::queries;

    fn seeded() -> SqliteExecutor {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, score REAL);
             CREATE TABLE orders (id INTEGER, note BLOB);
             INSERT INTO users VALUES (1, 'ann', 1.5), (2, NULL, NULL);",
        )
        .unwrap();
        SqliteExecutor::from_connection(conn)
    }

    fn collect(set: ResultSet) -> (Vec<String>, Vec<Row>) {
        let columns = set.columns().to_vec();
        let rows = set.map(Result::unwrap).collect();
        (columns, rows)
    }

    #[test]
    fn test_show_tables_in_creation_order() {
        let mut executor = seeded();
        let (columns, rows) = collect(executor.query(queries::SHOW_TABLES).unwrap());
        assert_eq!(columns, ["Tables_in_main"]);
        assert_eq!(rows, vec![vec![Some("users".to_string())], vec![Some("orders".to_string())]]);
    }

    #[test]
    fn test_show_create_table_two_columns() {
        let mut executor = seeded();
        let (columns, rows) = collect(executor.query(&queries::show_create_table("orders")).unwrap());
        assert_eq!(columns.len(), 2);
        assert_eq!(rows[0][0].as_deref(), Some("orders"));
        assert_eq!(rows[0][1].as_deref(), Some("CREATE TABLE orders (id INTEGER, note BLOB)"));
    }

    #[test]
    fn test_show_create_table_unknown() {
        let mut executor = seeded();
        let err = executor.query(&queries::show_create_table("ghost")).unwrap_err();
        assert!(matches!(err, ExecutorError::Query { .. }));
    }

    #[test]
    fn test_utf8_blob_reads_as_text() {
        let mut executor = seeded();
        executor
            .connection()
            .unwrap()
            .execute("INSERT INTO orders VALUES (1, X'6869')", [])
            .unwrap();
        let (_, rows) = collect(executor.query(&queries::select_all("orders")).unwrap());
        assert_eq!(rows, vec![vec![Some("1".to_string()), Some("hi".to_string())]]);
    }

    #[test]
    fn test_non_utf8_blob_fails_the_scan() {
        let mut executor = seeded();
        executor
            .connection()
            .unwrap()
            .execute("INSERT INTO orders VALUES (1, X'FF00FE41')", [])
            .unwrap();
        let err = executor.query(&queries::select_all("orders")).unwrap_err();
        assert!(matches!(err, ExecutorError::Scan(ref message) if message.contains("note")));
    }

    #[test]
    fn test_select_all_renders_text_cells() {
        let mut executor = seeded();
        let (columns, rows) = collect(executor.query(&queries::select_all("users")).unwrap());
        assert_eq!(columns, ["id", "name", "score"]);
        assert_eq!(
            rows,
            vec![
                vec![Some("1".to_string()), Some("ann".to_string()), Some("1.5".to_string())],
                vec![Some("2".to_string()), None, None],
            ]
        );
    }

    #[test]
    fn test_server_version() {
        let mut executor = seeded();
        let row = executor
            .query(queries::SERVER_VERSION)
            .unwrap()
            .first_row(queries::SERVER_VERSION)
            .unwrap();
        assert!(row[0].as_deref().is_some_and(|v| v.starts_with('3')));
    }

    #[test]
    fn test_close_twice_and_query_after_close() {
        let mut executor = seeded();
        executor.close().unwrap();
        assert!(executor.is_closed());
        assert!(matches!(executor.query("SELECT 1"), Err(ExecutorError::Closed)));
        assert!(matches!(executor.close(), Err(ExecutorError::Closed)));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SqliteExecutor::open(dir.path().join("absent.db")).err().unwrap();
        assert!(matches!(err, SqliteExecutorError::Open { .. }));
    }
}
