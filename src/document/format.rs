//! On-disk format glue.
//!
//! The file grammar is owned by the `toml` crate: a configuration file is a
//! TOML document whose top-level items are all tables of string values.
//! Anything else (top-level scalars, nested tables, non-string values) is
//! rejected at parse time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Section table: section name → key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct SectionTable(pub(crate) BTreeMap<String, BTreeMap<String, String>>);

/// Parse file contents into a section table.
pub(crate) fn parse(text: &str) -> Result<SectionTable, toml::de::Error> {
    toml::from_str(text)
}

/// Render a section table back to file contents.
pub(crate) fn render(table: &SectionTable) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_input() {
        let table = parse("").unwrap();
        assert!(table.0.is_empty());
    }

    #[test]
    fn test_parse_sections() {
        let table = parse("[server]\nhost = \"localhost\"\n\n[limits]\nrps = \"100\"\n").unwrap();
        assert_eq!(table.0.len(), 2);
        assert_eq!(table.0["server"]["host"], "localhost");
        assert_eq!(table.0["limits"]["rps"], "100");
    }

    #[test]
    fn test_rejects_non_string_values() {
        assert!(parse("[server]\nport = 8080\n").is_err());
    }

    #[test]
    fn test_rejects_top_level_keys() {
        assert!(parse("version = \"1\"\n").is_err());
    }

    #[test]
    fn test_render_escapes_awkward_values() {
        let mut table = SectionTable::default();
        table
            .0
            .entry("app".to_string())
            .or_default()
            .insert("motd".to_string(), "line one\nline \"two\"".to_string());

        let text = render(&table).unwrap();
        let reparsed = parse(&text).unwrap();
        assert_eq!(reparsed, table);
    }
}
