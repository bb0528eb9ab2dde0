//! Rows and the validated, column-major training dataset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TreeConfig;
use crate::error::{RowLocation, TreeError};
use crate::node::FeatureIndex;
use crate::schema::{FeatureSpec, Schema};
use crate::split::{BestSplit, ClassCounts, find_best_split};
use crate::value::{ClassLabel, Value};

/// A mapping from field name to value.
///
/// Used both for training rows (which carry the class field) and for query
/// rows passed to [`DecisionTree::classify`](crate::DecisionTree::classify).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field, returning the previous value if there was one.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Return the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Check one feature value against its declared kind.
pub(crate) fn check_value(
    spec: &FeatureSpec,
    value: &Value,
    location: RowLocation,
) -> Result<(), TreeError> {
    if value.kind() != spec.kind() {
        return Err(TreeError::TypeMismatch {
            field: spec.name().to_string(),
            expected: spec.kind(),
            got: value.kind(),
            location,
        });
    }
    if let Value::Numeric(v) = value
        && !v.is_finite()
    {
        return Err(TreeError::NonFiniteValue {
            field: spec.name().to_string(),
            location,
        });
    }
    Ok(())
}

/// An immutable, validated training set.
///
/// Values are stored column-major (`columns[feature][row]`) with one class
/// label per row, so the split search can scan a feature without touching
/// the others.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Schema,
    columns: Vec<Vec<Value>>,
    labels: Vec<ClassLabel>,
}

impl Dataset {
    /// Validate `rows` against `schema` and store them column-major.
    ///
    /// Fields not named by the schema are ignored.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`TreeError::EmptyDataset`] | `rows` is empty |
    /// | [`TreeError::MissingField`] | a row lacks a feature or the class field |
    /// | [`TreeError::TypeMismatch`] | a feature value's kind differs from the schema |
    /// | [`TreeError::NonFiniteValue`] | a numeric feature or class value is NaN or infinite |
    pub fn new(schema: Schema, rows: &[Row]) -> Result<Self, TreeError> {
        if rows.is_empty() {
            return Err(TreeError::EmptyDataset);
        }

        let mut columns: Vec<Vec<Value>> = (0..schema.n_features())
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();
        let mut labels = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            let location = RowLocation::Training { index };
            for (column, spec) in columns.iter_mut().zip(schema.features()) {
                let value = row.get(spec.name()).ok_or_else(|| TreeError::MissingField {
                    field: spec.name().to_string(),
                    location,
                })?;
                check_value(spec, value, location)?;
                column.push(value.clone());
            }

            let class = row
                .get(schema.class_field())
                .ok_or_else(|| TreeError::MissingField {
                    field: schema.class_field().to_string(),
                    location,
                })?;
            if let Value::Numeric(v) = class
                && !v.is_finite()
            {
                return Err(TreeError::NonFiniteValue {
                    field: schema.class_field().to_string(),
                    location,
                });
            }
            labels.push(ClassLabel::from(class));
        }

        debug!(
            n_rows = labels.len(),
            n_features = schema.n_features(),
            "dataset validated"
        );

        Ok(Self {
            schema,
            columns,
            labels,
        })
    }

    /// Return the schema the rows were validated against.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Return the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }

    /// Return all values of one feature, in row order.
    #[must_use]
    pub fn column(&self, feature: FeatureIndex) -> &[Value] {
        &self.columns[feature.index()]
    }

    pub(crate) fn columns(&self) -> &[Vec<Value>] {
        &self.columns
    }

    /// Return the class label of every row, in row order.
    #[must_use]
    pub fn labels(&self) -> &[ClassLabel] {
        &self.labels
    }

    /// Count class labels over the whole dataset.
    #[must_use]
    pub fn class_counts(&self) -> ClassCounts {
        self.labels.iter().cloned().collect()
    }

    /// Search every feature and distinct value for the best root split.
    ///
    /// Returns a zero gain when no candidate reduces impurity; see
    /// [`BestSplit`].
    #[must_use]
    pub fn best_split(&self, config: &TreeConfig) -> BestSplit {
        let indices: Vec<usize> = (0..self.n_rows()).collect();
        find_best_split(self, &indices, config.criterion(), config.tie_break())
    }
}
