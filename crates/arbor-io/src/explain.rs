//! Externally supplied free-text explanations for query rows.

use std::collections::BTreeMap;
use std::path::Path;

use arbor_tree::Row;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::IoError;
use crate::schema::read_json;

/// One explanation: the reason shown when every `when` field matches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExplanationRule {
    when: BTreeMap<String, String>,
    reason: String,
}

impl ExplanationRule {
    /// Return the reason text.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Return `true` if every condition equals the text form of the row's value.
    ///
    /// A rule with no conditions matches every row.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        self.when
            .iter()
            .all(|(field, expected)| row.get(field).is_some_and(|v| v.to_string() == *expected))
    }
}

/// Ordered explanation rules, loaded from JSON.
///
/// ```json
/// {
///   "rules": [
///     { "when": { "marks": ">=65", "income": "<100000" }, "reason": "..." },
///     { "when": {}, "reason": "fallback" }
///   ]
/// }
/// ```
///
/// The first matching rule wins, so more specific rules go first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExplanationTable {
    rules: Vec<ExplanationRule>,
}

impl ExplanationTable {
    /// Load a table from a JSON file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
    /// | [`IoError::Json`] | Malformed JSON or wrong shape |
    #[instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, IoError> {
        let table: Self = read_json(path)?;
        debug!(n_rules = table.rules.len(), "explanation table loaded");
        Ok(table)
    }

    /// Return the reason of the first rule matching `row`.
    #[must_use]
    pub fn explain(&self, row: &Row) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(row))
            .map(ExplanationRule::reason)
    }

    /// Return the rules in order.
    #[must_use]
    pub fn rules(&self) -> &[ExplanationRule] {
        &self.rules
    }
}
