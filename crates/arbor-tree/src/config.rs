//! Configuration builder for tree induction.

use crate::dataset::{Dataset, Row};
use crate::error::TreeError;
use crate::schema::Schema;
use crate::split::{SplitCriterion, TieBreak};
use crate::tree::DecisionTree;

/// Configuration for growing a decision tree.
///
/// Construct via [`TreeConfig::new`], then chain `with_*` methods.
/// Trees always grow until every leaf is pure or no question reduces
/// impurity; there is no depth limit and no pruning.
///
/// # Defaults
///
/// | Parameter   | Default    |
/// |-------------|------------|
/// | `criterion` | `Gini`     |
/// | `tie_break` | `LastWins` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeConfig {
    pub(crate) criterion: SplitCriterion,
    pub(crate) tie_break: TieBreak,
}

impl TreeConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            criterion: SplitCriterion::Gini,
            tie_break: TieBreak::LastWins,
        }
    }

    // --- Setters ---

    /// Set the impurity criterion.
    #[must_use]
    pub fn with_criterion(mut self, criterion: SplitCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set how equal-gain candidates are resolved.
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    // --- Getters ---

    /// Return the impurity criterion.
    #[must_use]
    pub fn criterion(&self) -> SplitCriterion {
        self.criterion
    }

    /// Return the tie-break rule.
    #[must_use]
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Grow a tree over a validated dataset.
    ///
    /// The tree keeps the schema and the class counts that reach each leaf,
    /// not the rows themselves.
    #[must_use]
    pub fn fit(&self, dataset: &Dataset) -> DecisionTree {
        crate::tree::grow(self, dataset)
    }

    /// Validate `rows` against `schema`, then grow a tree.
    ///
    /// # Errors
    ///
    /// Any error from [`Dataset::new`]: [`TreeError::EmptyDataset`],
    /// [`TreeError::MissingField`], [`TreeError::TypeMismatch`] or
    /// [`TreeError::NonFiniteValue`].
    pub fn fit_rows(&self, schema: Schema, rows: &[Row]) -> Result<DecisionTree, TreeError> {
        let dataset = Dataset::new(schema, rows)?;
        Ok(self.fit(&dataset))
    }
}
