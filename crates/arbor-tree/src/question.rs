//! Binary feature tests used to partition rows.

use std::fmt;

use crate::dataset::Row;
use crate::error::{RowLocation, TreeError};
use crate::value::{Value, ValueKind};

/// A (feature, reference value) test.
///
/// The reference value's kind picks the comparison: numeric questions ask
/// `value ≥ reference`, categorical questions ask `value = reference`.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    feature: String,
    value: Value,
}

impl Question {
    /// Create a question about `feature` with the given reference value.
    pub fn new(feature: impl Into<String>, value: Value) -> Self {
        Self {
            feature: feature.into(),
            value,
        }
    }

    /// Return the feature name this question reads.
    #[must_use]
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Return the reference value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Return the kind of value this question compares.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// Return the comparison symbol used when rendering.
    #[must_use]
    pub fn operator(&self) -> &'static str {
        match self.kind() {
            ValueKind::Numeric => "≥",
            ValueKind::Categorical => "=",
        }
    }

    /// Compare a single value against the reference.
    ///
    /// Returns `None` when `value` is of a different kind than the reference.
    #[must_use]
    pub fn answer(&self, value: &Value) -> Option<bool> {
        match (&self.value, value) {
            (Value::Numeric(reference), Value::Numeric(v)) => Some(v >= reference),
            (Value::Categorical(reference), Value::Categorical(v)) => Some(v == reference),
            _ => None,
        }
    }

    /// Ask this question of a query row.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`TreeError::MissingField`] | `row` has no value for the feature |
    /// | [`TreeError::TypeMismatch`] | the row's value is of the other kind |
    pub fn matches(&self, row: &Row) -> Result<bool, TreeError> {
        let value = row.get(&self.feature).ok_or_else(|| TreeError::MissingField {
            field: self.feature.clone(),
            location: RowLocation::Query,
        })?;
        self.answer(value).ok_or_else(|| TreeError::TypeMismatch {
            field: self.feature.clone(),
            expected: self.kind(),
            got: value.kind(),
            location: RowLocation::Query,
        })
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Is {} {} {}", self.feature, self.operator(), self.value)
    }
}
