//! Validated table names.
//!
//! Names come straight from the server's table listing. A name must be
//! non-empty and free of NUL bytes; any other character is legal inside a
//! quoted MySQL identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DumpError;

/// Name of a table taken from the schema listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Parse and validate a table name.
    pub fn parse(name: impl Into<String>) -> Result<Self, DumpError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DumpError::InvalidTableName {
                name,
                reason: "table name cannot be empty",
            });
        }
        if name.contains('\0') {
            return Err(DumpError::InvalidTableName {
                name,
                reason: "table name contains a NUL byte",
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Backtick-quoted form for use inside statements sent to the server.
    pub fn quoted(&self) -> String {
        quote_identifier(&self.0)
    }
}

/// Quote an identifier with backticks, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('`');
    for c in name.chars() {
        if c == '`' {
            quoted.push('`');
        }
        quoted.push(c);
    }
    quoted.push('`');
    quoted
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TableName {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TableName {
    type Error = DumpError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TableName> for String {
    fn from(name: TableName) -> Self {
        name.0
    }
}

impl PartialEq<str> for TableName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TableName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("users", "`users`")]
    #[case("order items", "`order items`")]
    #[case("we`ird", "`we``ird`")]
    fn test_quoted_identifiers(#[case] raw: &str, #[case] expected: &str) {
        let name = TableName::parse(raw).unwrap();
        assert_eq!(name.quoted(), expected);
        assert_eq!(name.as_str(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("bad\0name")]
    fn test_rejects_invalid_names(#[case] raw: &str) {
        let err = TableName::parse(raw).unwrap_err();
        assert!(err.is_integrity_error());
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let name: TableName = serde_json::from_str("\"orders\"").unwrap();
        assert_eq!(name, "orders");
        assert!(serde_json::from_str::<TableName>("\"\"").is_err());
    }
}
