//! Typed feature values and class labels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a feature, fixed per feature by the [`Schema`](crate::Schema).
///
/// The kind selects the comparison a [`Question`](crate::Question) uses:
/// `≥` for numeric features, equality for categorical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Real-valued feature compared with `≥`.
    Numeric,
    /// Label-valued feature compared with `=`.
    Categorical,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Numeric => f.write_str("numeric"),
            ValueKind::Categorical => f.write_str("categorical"),
        }
    }
}

/// A single cell of a row.
///
/// Deserializes from JSON untagged: numbers become [`Value::Numeric`],
/// strings become [`Value::Categorical`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A real number.
    Numeric(f64),
    /// A category name.
    Categorical(String),
}

impl Value {
    /// Return the kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Numeric(_) => ValueKind::Numeric,
            Value::Categorical(_) => ValueKind::Categorical,
        }
    }

    /// Return the number, if this is a numeric value.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Numeric(v) => Some(*v),
            Value::Categorical(_) => None,
        }
    }

    /// Return the category name, if this is a categorical value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Numeric(_) => None,
            Value::Categorical(s) => Some(s),
        }
    }

    /// Hashable identity used to collect distinct column values.
    pub(crate) fn key(&self) -> ValueKey<'_> {
        match self {
            // Fold -0.0 onto 0.0 so both compare as one distinct value.
            Value::Numeric(v) if *v == 0.0 => ValueKey::Numeric(0.0f64.to_bits()),
            Value::Numeric(v) => ValueKey::Numeric(v.to_bits()),
            Value::Categorical(s) => ValueKey::Categorical(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numeric(v) => write!(f, "{v}"),
            Value::Categorical(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Numeric(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Numeric(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Categorical(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Categorical(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey<'a> {
    Numeric(u64),
    Categorical(&'a str),
}

/// The class of a training row: the text form of its class-field value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassLabel(String);

impl ClassLabel {
    /// Create a class label from its name.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Return the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Value> for ClassLabel {
    fn from(value: &Value) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for ClassLabel {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
