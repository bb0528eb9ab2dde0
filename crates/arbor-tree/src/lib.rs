//! CART decision trees: build, classify, render.
//!
//! Grows a binary classification tree from labeled rows with a greedy
//! impurity-minimizing search (Gini by default, Entropy optional), then
//! walks novel rows down to a leaf and reports the share of training rows
//! of each class that ended there.
//!
//! ```
//! use arbor_tree::{FeatureSpec, Row, Schema, build};
//!
//! let schema = Schema::new("completed", vec![FeatureSpec::categorical("marks")])?;
//! let rows = vec![
//!     Row::new().with("marks", ">=65").with("completed", "Yes"),
//!     Row::new().with("marks", "<65").with("completed", "No"),
//! ];
//! let tree = build(schema, &rows)?;
//!
//! let probs = tree.classify(&Row::new().with("marks", ">=65"))?;
//! assert_eq!(probs.to_string(), "{Yes: 100%}");
//! # Ok::<(), arbor_tree::TreeError>(())
//! ```

mod classify;
mod config;
mod dataset;
mod error;
mod importance;
mod node;
mod question;
mod render;
mod schema;
mod split;
mod tree;
mod value;

pub use classify::{Percentage, Probabilities};
pub use config::TreeConfig;
pub use dataset::{Dataset, Row};
pub use error::{RowLocation, TreeError};
pub use importance::RankedFeature;
pub use node::{FeatureIndex, Impurity, Leaf, Node, NodeIndex};
pub use question::Question;
pub use render::DEFAULT_INDENT;
pub use schema::{FeatureSpec, Schema};
pub use split::{BestSplit, ClassCounts, SplitCriterion, TieBreak};
pub use tree::{DecisionTree, build};
pub use value::{ClassLabel, Value, ValueKind};
