//! Dumps of real SQLite database files.

use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use rusqlite::Connection;
use sqldump::{DumpError, Dumper, DumperConfig, ExecutorError, SqliteExecutor, WriteMode};
use tempfile::{TempDir, tempdir};

fn seed(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("shop.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT, balance REAL);
         CREATE TABLE orders (id INTEGER PRIMARY KEY, customer_id INTEGER, note TEXT);
         CREATE TABLE audit (id INTEGER);
         INSERT INTO customers VALUES (1, 'O''Brien', 12.5), (2, NULL, 0.25);
         INSERT INTO orders VALUES (10, 1, 'line one
line two');",
    )
    .unwrap();
    path
}

fn setup() -> (TempDir, TempDir, std::path::PathBuf) {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    let db = seed(data.path());
    (data, out, db)
}

#[test]
fn test_full_dump_of_sqlite_file() {
    let (_data, out, db) = setup();
    let executor = SqliteExecutor::open(&db).unwrap();
    let mut dumper = Dumper::register(executor, out.path(), "%Y-%m-%d_%H%M%S", true).unwrap();

    let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
    let path = dumper.dump_at(now).unwrap();
    assert_eq!(path, out.path().join("2026-10-16_093000.sql"));

    let dump = fs::read_to_string(&path).unwrap();
    assert!(dump.starts_with("-- sqldump SQL Dump v"));
    assert!(dump.contains("-- Server version  3."));

    let customers = dump.find("DROP TABLE IF EXISTS customers;").unwrap();
    let orders = dump.find("DROP TABLE IF EXISTS orders;").unwrap();
    let audit = dump.find("DROP TABLE IF EXISTS audit;").unwrap();
    assert!(customers < orders && orders < audit);

    assert!(dump.contains(
        "CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT, balance REAL);"
    ));
    assert!(dump.contains(r"INSERT INTO customers VALUES ('1','O\'Brien','12.5'),('2',null,'0.25');"));
    assert!(dump.contains(r"INSERT INTO orders VALUES ('10','1','line one\nline two');"));
    assert!(dump.contains("LOCK TABLES audit WRITE;\nUNLOCK TABLES;\n"));
    assert!(!dump.contains("INSERT INTO audit"));
    assert!(dump.trim_end().lines().last().unwrap().starts_with("-- Dump completed on "));

    dumper.close().unwrap();
}

#[test]
fn test_schema_only_staged_dump() {
    let (_data, out, db) = setup();
    let config = DumperConfig {
        write_mode: WriteMode::Staged,
        ..DumperConfig::new(out.path(), "schema", false)
    };
    let mut dumper = Dumper::new(SqliteExecutor::open(&db).unwrap(), config).unwrap();

    let dump = fs::read_to_string(dumper.dump().unwrap()).unwrap();
    assert_eq!(dump.matches("CREATE TABLE ").count(), 3);
    assert!(!dump.contains("LOCK TABLES"));
    assert!(!dump.contains("O\\'Brien"));
}

#[test]
fn test_dump_does_not_modify_source_database() {
    let (_data, out, db) = setup();
    let before = fs::read(&db).unwrap();

    let mut dumper =
        Dumper::register(SqliteExecutor::open(&db).unwrap(), out.path(), "ro", true).unwrap();
    dumper.dump().unwrap();
    dumper.close().unwrap();

    assert_eq!(fs::read(&db).unwrap(), before);
}

#[test]
fn test_second_dump_with_same_name_conflicts() {
    let (_data, out, db) = setup();
    let mut dumper =
        Dumper::register(SqliteExecutor::open(&db).unwrap(), out.path(), "fixed", true).unwrap();

    let first = dumper.dump().unwrap();
    let failure = dumper.dump().unwrap_err();
    assert_eq!(failure.path, first);
    assert!(matches!(failure.source, DumpError::DuplicateDump { ref name, .. } if name == "fixed"));
}

#[test]
fn test_closed_executor_reports_closed() {
    let (_data, out, db) = setup();
    let mut dumper =
        Dumper::register(SqliteExecutor::open(&db).unwrap(), out.path(), "gone", true).unwrap();
    dumper.close().unwrap();

    assert!(dumper.is_closed());
    let failure = dumper.dump().unwrap_err();
    assert!(matches!(failure.source, DumpError::Closed));
}

#[test]
fn test_empty_database_renders_banner_and_footer_only() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    let db = data.path().join("empty.db");
    Connection::open(&db)
        .unwrap()
        .execute_batch("PRAGMA user_version = 1;")
        .unwrap();

    let mut dumper =
        Dumper::register(SqliteExecutor::open(&db).unwrap(), out.path(), "empty", true).unwrap();
    let dump = fs::read_to_string(dumper.dump().unwrap()).unwrap();

    assert!(!dump.contains("DROP TABLE"));
    assert!(dump.contains("-- Dump completed on "));
}

#[test]
fn test_binary_blob_fails_dump_instead_of_corrupting() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    let db = data.path().join("bin.db");
    Connection::open(&db)
        .unwrap()
        .execute_batch("CREATE TABLE bin (b BLOB); INSERT INTO bin VALUES (X'FF00FE41');")
        .unwrap();

    let config = DumperConfig {
        write_mode: WriteMode::Staged,
        ..DumperConfig::new(out.path(), "bin", true)
    };
    let mut dumper = Dumper::new(SqliteExecutor::open(&db).unwrap(), config).unwrap();

    let failure = dumper.dump().unwrap_err();
    assert!(matches!(failure.source, DumpError::Executor(ExecutorError::Scan(_))));
    assert!(!failure.path.exists());
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_passthrough_errors_surface_as_backend_errors() {
    use sqldump::QueryExecutor;

    let (_data, _out, db) = setup();
    let mut executor = SqliteExecutor::open(&db).unwrap();
    let err = executor.query("SELECT * FROM missing WHERE 1").unwrap_err();
    assert!(matches!(err, ExecutorError::Backend(_)));
}
