use std::fmt;

use crate::value::ValueKind;

/// Where an offending value was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLocation {
    /// A training row, by zero-based position in the dataset.
    Training {
        /// The zero-based index of the row.
        index: usize,
    },
    /// The row passed to a classify call.
    Query,
}

impl fmt::Display for RowLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLocation::Training { index } => write!(f, "training row {index}"),
            RowLocation::Query => write!(f, "query row"),
        }
    }
}

/// Errors from tree construction and classification.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// Returned when the training dataset has zero rows.
    #[error("training dataset has zero rows")]
    EmptyDataset,

    /// Returned when the schema declares no feature fields.
    #[error("schema declares zero feature fields")]
    ZeroFeatures,

    /// Returned when the schema lists the same feature name twice.
    #[error("feature \"{name}\" is declared more than once")]
    DuplicateFeature {
        /// The repeated feature name.
        name: String,
    },

    /// Returned when the class field is also listed as a feature.
    #[error("class field \"{name}\" cannot also be a feature")]
    ClassFieldIsFeature {
        /// The class field name.
        name: String,
    },

    /// Returned when a row has no value for a field the operation needs.
    #[error("{location} has no value for field \"{field}\"")]
    MissingField {
        /// The missing field name.
        field: String,
        /// The row that lacks the field.
        location: RowLocation,
    },

    /// Returned when a value's kind differs from the kind declared for its feature.
    #[error("{location}: field \"{field}\" expects a {expected} value, got {got}")]
    TypeMismatch {
        /// The offending field name.
        field: String,
        /// The kind declared in the schema.
        expected: ValueKind,
        /// The kind actually supplied.
        got: ValueKind,
        /// The row holding the value.
        location: RowLocation,
    },

    /// Returned when a numeric value is NaN or infinite.
    #[error("{location}: field \"{field}\" holds a non-finite number")]
    NonFiniteValue {
        /// The offending field name.
        field: String,
        /// The row holding the value.
        location: RowLocation,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_row() {
        let err = TreeError::MissingField {
            field: "income".into(),
            location: RowLocation::Training { index: 4 },
        };
        assert_eq!(err.to_string(), "training row 4 has no value for field \"income\"");
    }

    #[test]
    fn type_mismatch_message_names_kinds() {
        let err = TreeError::TypeMismatch {
            field: "marks".into(),
            expected: ValueKind::Numeric,
            got: ValueKind::Categorical,
            location: RowLocation::Query,
        };
        assert_eq!(
            err.to_string(),
            "query row: field \"marks\" expects a numeric value, got categorical"
        );
    }
}
