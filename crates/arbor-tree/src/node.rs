use std::fmt;

use crate::classify::{Percentage, Probabilities};
use crate::question::Question;
use crate::split::ClassCounts;

/// Zero-based position of a feature in the [`Schema`](crate::Schema).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureIndex(usize);

impl FeatureIndex {
    /// Create a new feature index from a zero-based column position.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based feature column index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FeatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index into a `Vec<Node>` arena, identifying a specific node in a decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// The root of every tree.
    pub const ROOT: NodeIndex = NodeIndex(0);

    /// Create a new node index from a zero-based arena position.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Criterion-agnostic impurity value (Gini or Entropy).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Impurity(f64);

impl Impurity {
    /// Create a new impurity value.
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw impurity value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Impurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// Terminal node: the class counts of the training rows that reached it.
///
/// The counts are never empty and every count is at least 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    class_counts: ClassCounts,
    impurity: Impurity,
}

impl Leaf {
    pub(crate) fn new(class_counts: ClassCounts, impurity: Impurity) -> Self {
        debug_assert!(!class_counts.is_empty(), "leaf class counts must not be empty");
        Self {
            class_counts,
            impurity,
        }
    }

    /// Return the per-class row counts.
    #[must_use]
    pub fn class_counts(&self) -> &ClassCounts {
        &self.class_counts
    }

    /// Return the number of training rows that reached this leaf.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.class_counts.total()
    }

    /// Return the impurity of this leaf's rows.
    #[must_use]
    pub fn impurity(&self) -> Impurity {
        self.impurity
    }

    /// Return `count / total × 100` for every class present at this leaf.
    ///
    /// No smoothing: classes that never reached the leaf are absent, and a
    /// pure leaf reports exactly 100 for its class.
    #[must_use]
    pub fn percentage_probabilities(&self) -> Probabilities {
        let total = self.class_counts.total() as f64;
        self.class_counts
            .iter()
            .map(|(label, count)| {
                (label.clone(), Percentage::new(count as f64 / total * 100.0))
            })
            .collect()
    }
}

/// A node in a decision tree arena.
///
/// Trees are stored as `Vec<Node>` where children are referenced by
/// [`NodeIndex`] rather than pointers, with the root at [`NodeIndex::ROOT`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An interior node asking one question.
    Decision {
        /// The test applied to rows at this node.
        question: Question,
        /// Child for rows that answer yes.
        true_branch: NodeIndex,
        /// Child for rows that answer no.
        false_branch: NodeIndex,
        /// Impurity at this node before splitting.
        impurity: Impurity,
        /// Number of training rows that reached this node.
        n_samples: usize,
        /// Information gain of the chosen question.
        gain: f64,
    },
    /// A terminal leaf node.
    Leaf(Leaf),
}

impl Node {
    /// Return the impurity at this node (before splitting for decision nodes).
    #[must_use]
    pub fn impurity(&self) -> Impurity {
        match self {
            Node::Decision { impurity, .. } => *impurity,
            Node::Leaf(leaf) => leaf.impurity(),
        }
    }

    /// Return the number of training rows that reached this node.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        match self {
            Node::Decision { n_samples, .. } => *n_samples,
            Node::Leaf(leaf) => leaf.n_samples(),
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
}
