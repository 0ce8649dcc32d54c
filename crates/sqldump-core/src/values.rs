//! Row serialization into SQL value tuples.
//!
//! Rows become `(v1,v2,...)` groups joined by single commas, e.g.
//! `('1','alice'),('2',null)`. NULL is the bare token `null`; every other
//! value is a single-quoted MySQL string literal with its special characters
//! escaped.

use crate::error::{DumpError, DumpResult};
use crate::executor::{ExecutorError, QueryExecutor, ResultSet};
use crate::identifiers::TableName;
use crate::queries;

/// Select every row of `table` and serialize it.
pub fn serialize_table<E>(executor: &mut E, table: &TableName) -> DumpResult<String>
where
    E: QueryExecutor + ?Sized,
{
    let rows = executor.query(&queries::select_all(table.as_str()))?;
    serialize_rows(table, rows)
}

/// Serialize an already-open result set.
///
/// Zero columns is an error; zero rows yields an empty string.
pub fn serialize_rows(table: &TableName, rows: ResultSet) -> DumpResult<String> {
    let width = rows.column_count();
    if width == 0 {
        return Err(DumpError::NoColumns {
            table: table.to_string(),
        });
    }

    let mut out = String::new();
    let mut count = 0usize;
    for row in rows {
        let row = row?;
        if row.len() != width {
            return Err(ExecutorError::Scan(format!(
                "row {} of {} has {} values, expected {}",
                count + 1,
                table,
                row.len(),
                width
            ))
            .into());
        }
        if count > 0 {
            out.push(',');
        }
        push_tuple(&mut out, &row);
        count += 1;
    }

    tracing::debug!(table = %table, rows = count, columns = width, "Serialized table rows");
    Ok(out)
}

/// Render one row as a parenthesized tuple.
pub fn render_tuple(row: &[Option<String>]) -> String {
    let mut out = String::new();
    push_tuple(&mut out, row);
    out
}

fn push_tuple(out: &mut String, row: &[Option<String>]) {
    out.push('(');
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        match cell {
            Some(value) => push_literal(out, value),
            None => out.push_str("null"),
        }
    }
    out.push(')');
}

/// Quote `value` as a MySQL string literal.
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    push_literal(&mut out, value);
    out
}

fn push_literal(out: &mut String, value: &str) {
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1a}' => out.push_str("\\Z"),
            c => out.push(c),
        }
    }
    out.push('\'');
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn table() -> TableName {
        TableName::parse("orders").unwrap()
    }

    fn cols(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{i}")).collect()
    }

    fn cell(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[rstest]
    #[case("plain", "'plain'")]
    #[case("", "''")]
    #[case("O'Brien", r"'O\'Brien'")]
    #[case(r"C:\tmp", r"'C:\\tmp'")]
    #[case("line\nbreak", r"'line\nbreak'")]
    #[case("cr\rhere", r"'cr\rhere'")]
    #[case("nul\0byte", r"'nul\0byte'")]
    #[case("ctrl\u{1a}z", r"'ctrl\Zz'")]
    #[case("'); DROP TABLE users; --", r"'\'); DROP TABLE users; --'")]
    fn test_quote_literal(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(quote_literal(raw), expected);
    }

    #[test]
    fn test_null_is_bare_token() {
        assert_eq!(render_tuple(&[cell("1"), None, cell("null")]), "('1',null,'null')");
    }

    #[test]
    fn test_zero_rows_serialize_to_empty_string() {
        let rows = ResultSet::from_rows(cols(2), Vec::new());
        assert_eq!(serialize_rows(&table(), rows).unwrap(), "");
    }

    #[test]
    fn test_zero_columns_is_an_error() {
        let rows = ResultSet::from_rows(Vec::new(), vec![vec![]]);
        let err = serialize_rows(&table(), rows).unwrap_err();
        assert!(matches!(err, DumpError::NoColumns { ref table } if table == "orders"));
    }

    #[test]
    fn test_tuples_joined_without_leading_or_trailing_comma() {
        let rows = ResultSet::from_rows(
            cols(2),
            vec![
                vec![cell("1"), cell("alice")],
                vec![cell("2"), None],
                vec![cell("3"), cell("carol")],
            ],
        );
        assert_eq!(
            serialize_rows(&table(), rows).unwrap(),
            "('1','alice'),('2',null),('3','carol')"
        );
    }

    #[test]
    fn test_row_width_mismatch_is_a_scan_error() {
        let rows = ResultSet::from_rows(cols(2), vec![vec![cell("1")]]);
        let err = serialize_rows(&table(), rows).unwrap_err();
        assert!(matches!(err, DumpError::Executor(ExecutorError::Scan(_))));
    }

    #[test]
    fn test_mid_stream_error_propagates() {
        let rows = ResultSet::new(
            cols(1),
            vec![
                Ok(vec![cell("1")]),
                Err(ExecutorError::Connection("lost".to_string())),
            ],
        );
        let err = serialize_rows(&table(), rows).unwrap_err();
        assert!(matches!(err, DumpError::Executor(ExecutorError::Connection(_))));
    }
}
