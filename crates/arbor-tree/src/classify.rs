//! Classification of query rows against a fitted tree.

use std::collections::BTreeMap;
use std::fmt;

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::Serialize;

use crate::dataset::{Row, check_value};
use crate::error::{RowLocation, TreeError};
use crate::node::{Leaf, Node, NodeIndex};
use crate::tree::DecisionTree;
use crate::value::ClassLabel;

/// A share of a leaf's training rows, in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Percentage(f64);

impl Percentage {
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the percentage as a number in `[0, 100]`.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Class label to percentage, ordered by label.
///
/// Only classes seen at the leaf appear; the values sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Probabilities(BTreeMap<ClassLabel, Percentage>);

impl Probabilities {
    /// Return the percentage for `label`, if that class reached the leaf.
    #[must_use]
    pub fn get(&self, label: &ClassLabel) -> Option<Percentage> {
        self.0.get(label).copied()
    }

    /// Iterate `(label, percentage)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&ClassLabel, Percentage)> {
        self.0.iter().map(|(label, &p)| (label, p))
    }

    /// Return the number of classes present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if no class is present. Never the case for a leaf's output.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the class with the highest percentage.
    ///
    /// Ties go to the smallest label.
    #[must_use]
    pub fn predicted_class(&self) -> Option<&ClassLabel> {
        self.0
            .iter()
            .fold(None, |best: Option<(&ClassLabel, f64)>, (label, p)| match best {
                Some((_, top)) if top >= p.value() => best,
                _ => Some((label, p.value())),
            })
            .map(|(label, _)| label)
    }

    /// Return the top-k classes sorted by descending percentage.
    #[must_use]
    pub fn top_k(&self, k: usize) -> Vec<(ClassLabel, Percentage)> {
        let mut ranked: Vec<(ClassLabel, Percentage)> =
            self.0.iter().map(|(l, &p)| (l.clone(), p)).collect();
        // Stable sort keeps label order among equal percentages.
        ranked.sort_by(|a, b| b.1.value().total_cmp(&a.1.value()));
        ranked.truncate(k);
        ranked
    }
}

impl FromIterator<(ClassLabel, Percentage)> for Probabilities {
    fn from_iter<I: IntoIterator<Item = (ClassLabel, Percentage)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Probabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (label, p)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{label}: {p}")?;
        }
        f.write_str("}")
    }
}

impl DecisionTree {
    /// Return the class percentages of the leaf `row` falls into.
    ///
    /// Starting at the root, each decision node's question is asked of the
    /// row and traversal follows the true or false branch. Fields the row
    /// carries that the schema does not name are ignored; a categorical
    /// value never seen in training simply fails every equality test.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`TreeError::TypeMismatch`] | a schema feature in `row` has the wrong kind |
    /// | [`TreeError::NonFiniteValue`] | a numeric schema feature in `row` is NaN or infinite |
    /// | [`TreeError::MissingField`] | `row` lacks a feature asked about on its path |
    pub fn classify(&self, row: &Row) -> Result<Probabilities, TreeError> {
        Ok(self.leaf_for(row)?.percentage_probabilities())
    }

    /// Return the most likely class for `row`.
    ///
    /// # Errors
    ///
    /// Same as [`DecisionTree::classify`].
    pub fn predict(&self, row: &Row) -> Result<ClassLabel, TreeError> {
        let probs = self.classify(row)?;
        Ok(probs
            .predicted_class()
            .cloned()
            .unwrap_or_else(|| unreachable!("leaf class counts are never empty")))
    }

    /// Classify a batch of rows in parallel.
    ///
    /// Every row is classified before errors are inspected, so the outcome
    /// does not depend on thread scheduling.
    ///
    /// # Errors
    ///
    /// Returns the error of the lowest-index failing row, as for
    /// [`DecisionTree::classify`].
    pub fn classify_batch(&self, rows: &[Row]) -> Result<Vec<Probabilities>, TreeError> {
        let results: Vec<Result<Probabilities, TreeError>> =
            rows.into_par_iter().map(|row| self.classify(row)).collect();
        results.into_iter().collect()
    }

    /// Walk from the root to the leaf that `row` reaches.
    ///
    /// # Errors
    ///
    /// Same as [`DecisionTree::classify`].
    pub fn leaf_for(&self, row: &Row) -> Result<&Leaf, TreeError> {
        for spec in self.schema.features() {
            if let Some(value) = row.get(spec.name()) {
                check_value(spec, value, RowLocation::Query)?;
            }
        }

        let mut idx = NodeIndex::ROOT;
        loop {
            match self.node(idx) {
                Node::Leaf(leaf) => return Ok(leaf),
                Node::Decision {
                    question,
                    true_branch,
                    false_branch,
                    ..
                } => {
                    idx = if question.matches(row)? {
                        *true_branch
                    } else {
                        *false_branch
                    };
                }
            }
        }
    }
}
