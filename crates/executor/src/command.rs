//! The prepared command handed to hooks and backends.
//!
//! A [`Command`] is created fresh for every execution call from the SQL
//! text and the resolved parameter list, tagged with the active transaction
//! if there is one, and dropped as soon as the call completes or fails.

use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlforge_core::{Parameter, Value};
use uuid::Uuid;

/// Longest parameter value rendering kept in an error snapshot.
pub const SNAPSHOT_VALUE_LIMIT: usize = 256;

/// Marker appended to truncated snapshot values.
const ELLIPSIS: &str = "...";

/// A single execution request, ready for the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// SQL text, exactly as supplied by the caller
    pub sql: String,
    /// Label of the connection the command runs on
    pub connection: String,
    /// Explicit parameters followed by inferred ones
    pub parameters: Vec<Parameter>,
    /// Id of the executor's active transaction, if any
    pub transaction: Option<Uuid>,
}

impl Command {
    pub fn new(sql: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            sql: sql.into(),
            connection: String::new(),
            parameters,
            transaction: None,
        }
    }

    pub fn on_connection(mut self, label: impl Into<String>) -> Self {
        self.connection = label.into();
        self
    }

    /// Attach the command to a transaction.
    pub fn in_transaction(mut self, id: Option<Uuid>) -> Self {
        self.transaction = id;
        self
    }

    /// Parameter by case-insensitive name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.is_named(name))
    }

    /// JSON array of `{"name", "value"}` objects describing the parameters.
    ///
    /// Values render as text, truncated to [`SNAPSHOT_VALUE_LIMIT`]
    /// characters followed by `...`; `Null` renders as JSON `null`. Quote
    /// characters inside values are escaped by the JSON encoding.
    pub fn parameter_snapshot(&self) -> String {
        let entries: Vec<serde_json::Value> = self
            .parameters
            .iter()
            .map(|p| {
                let value = match &p.value {
                    Value::Null => serde_json::Value::Null,
                    other => serde_json::Value::String(truncate(&other.to_string())),
                };
                json!({ "name": p.name(), "value": value })
            })
            .collect();
        serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string())
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= SNAPSHOT_VALUE_LIMIT {
        return text.to_string();
    }
    let mut out: String = text.chars().take(SNAPSHOT_VALUE_LIMIT).collect();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sqlforge_core::DbType;

    #[test]
    fn snapshot_truncates_long_values() {
        let long = "x".repeat(300);
        let cmd = Command::new(
            "SELECT @Body",
            vec![Parameter::new("Body", DbType::NVarChar, long)],
        );
        let snapshot: serde_json::Value = serde_json::from_str(&cmd.parameter_snapshot()).unwrap();
        let value = snapshot[0]["value"].as_str().unwrap();
        assert_eq!(value.len(), SNAPSHOT_VALUE_LIMIT + ELLIPSIS.len());
        assert!(value.ends_with("..."));
        assert_eq!(snapshot[0]["name"], "Body");
    }

    #[test]
    fn snapshot_keeps_value_at_limit() {
        let exact = "y".repeat(SNAPSHOT_VALUE_LIMIT);
        let cmd = Command::new("", vec![Parameter::new("P", DbType::NVarChar, exact.clone())]);
        assert!(cmd.parameter_snapshot().contains(&format!("\"{}\"", exact)));
    }

    #[test]
    fn snapshot_escapes_quotes() {
        let cmd = Command::new(
            "",
            vec![Parameter::new("Q", DbType::NVarChar, r#"say "hi""#)],
        );
        assert_eq!(
            cmd.parameter_snapshot(),
            r#"[{"name":"Q","value":"say \"hi\""}]"#
        );
    }

    #[test]
    fn snapshot_renders_null() {
        let cmd = Command::new("", vec![Parameter::new("N", DbType::Int, Value::Null)]);
        assert_eq!(cmd.parameter_snapshot(), r#"[{"name":"N","value":null}]"#);
    }

    proptest! {
        #[test]
        fn snapshot_is_valid_json_with_bounded_values(
            values in proptest::collection::vec(".{0,400}", 0..5)
        ) {
            let params: Vec<Parameter> = values
                .iter()
                .enumerate()
                .map(|(i, v)| Parameter::new(format!("P{}", i), DbType::NVarChar, v.as_str()))
                .collect();
            let cmd = Command::new("", params);

            let parsed: serde_json::Value = serde_json::from_str(&cmd.parameter_snapshot()).unwrap();
            let entries = parsed.as_array().unwrap();
            prop_assert_eq!(entries.len(), values.len());
            for (entry, original) in entries.iter().zip(&values) {
                let rendered = entry["value"].as_str().unwrap();
                prop_assert!(rendered.chars().count() <= SNAPSHOT_VALUE_LIMIT + ELLIPSIS.len());
                prop_assert!(original.starts_with(rendered.trim_end_matches(ELLIPSIS)));
            }
        }
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(SNAPSHOT_VALUE_LIMIT + 1);
        let out = truncate(&text);
        assert_eq!(out.chars().count(), SNAPSHOT_VALUE_LIMIT + 3);
    }
}
