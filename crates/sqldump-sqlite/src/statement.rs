//! Recognition of the introspection statements issued by the dump pipeline.
//!
//! SQLite has no `SHOW` statements, so the executor maps the MySQL forms onto
//! `sqlite_master` lookups. Anything unrecognized is run verbatim.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Statement<'a> {
    ShowTables,
    ServerVersion,
    ShowCreateTable(String),
    SelectAll(String),
    Passthrough(&'a str),
}

pub(crate) fn classify(sql: &str) -> Statement<'_> {
    let trimmed = sql.trim().trim_end_matches(';').trim_end();

    if trimmed.eq_ignore_ascii_case("SHOW TABLES") {
        return Statement::ShowTables;
    }
    if trimmed.eq_ignore_ascii_case("SELECT version()") {
        return Statement::ServerVersion;
    }
    if let Some(name) =
        strip_prefix_ignore_case(trimmed, "SHOW CREATE TABLE ").and_then(parse_identifier)
    {
        return Statement::ShowCreateTable(name);
    }
    if let Some(name) =
        strip_prefix_ignore_case(trimmed, "SELECT * FROM ").and_then(parse_identifier)
    {
        return Statement::SelectAll(name);
    }
    Statement::Passthrough(sql)
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| s[prefix.len()..].trim_start())
}

/// Parse a single identifier, backtick-quoted or bare, spanning the whole input.
fn parse_identifier(s: &str) -> Option<String> {
    let Some(quoted) = s.strip_prefix('`') else {
        let bare = s.trim();
        let valid = !bare.is_empty() && !bare.contains(char::is_whitespace);
        return valid.then(|| bare.to_string());
    };

    let mut name = String::new();
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c != '`' {
            name.push(c);
            continue;
        }
        let rest = chars.as_str();
        if let Some(after) = rest.strip_prefix('`') {
            name.push('`');
            chars = after.chars();
        } else if rest.trim().is_empty() && !name.is_empty() {
            return Some(name);
        } else {
            return None;
        }
    }
    None
}

/// Quote an identifier for SQLite, doubling embedded double quotes.
pub(crate) fn quote_sqlite_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("SHOW TABLES", Statement::ShowTables)]
    #[case("  show tables; ", Statement::ShowTables)]
    #[case("SELECT version()", Statement::ServerVersion)]
    #[case("SHOW CREATE TABLE `users`", Statement::ShowCreateTable("users".to_string()))]
    #[case("show create table users", Statement::ShowCreateTable("users".to_string()))]
    #[case("SHOW CREATE TABLE `we``ird name`", Statement::ShowCreateTable("we`ird name".to_string()))]
    #[case("SELECT * FROM `orders`", Statement::SelectAll("orders".to_string()))]
    #[case("SELECT * FROM `a` WHERE 1", Statement::Passthrough("SELECT * FROM `a` WHERE 1"))]
    #[case("SELECT * FROM ``", Statement::Passthrough("SELECT * FROM ``"))]
    #[case("SELECT 1", Statement::Passthrough("SELECT 1"))]
    fn test_classify(#[case] sql: &str, #[case] expected: Statement<'static>) {
        assert_eq!(classify(sql), expected);
    }

    #[test]
    fn test_round_trips_core_quoting() {
        let sql = sqldump_core::queries::show_create_table("odd`name");
        assert_eq!(classify(&sql), Statement::ShowCreateTable("odd`name".to_string()));
    }

    #[test]
    fn test_sqlite_quoting() {
        assert_eq!(quote_sqlite_identifier("plain"), "\"plain\"");
        assert_eq!(quote_sqlite_identifier("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
