//! Human-readable text rendering of a fitted tree.

use std::fmt;

use crate::node::{Node, NodeIndex};
use crate::tree::DecisionTree;

/// Indent unit used by [`DecisionTree::render`] and `Display`.
pub const DEFAULT_INDENT: &str = "  ";

impl DecisionTree {
    /// Render the tree as text, one line per question, branch marker and leaf.
    ///
    /// ```text
    /// Is f = high
    /// --> True:
    ///   Predict: {No: 20%, Yes: 80%}
    /// --> False:
    ///   Predict: {No: 100%}
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        self.render_lines(DEFAULT_INDENT).join("\n")
    }

    /// Render the tree line by line, nesting each branch by `indent`.
    #[must_use]
    pub fn render_lines(&self, indent: &str) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.n_nodes() * 2);
        self.render_node(NodeIndex::ROOT, indent, String::new(), &mut lines);
        lines
    }

    fn render_node(&self, idx: NodeIndex, unit: &str, prefix: String, lines: &mut Vec<String>) {
        match self.node(idx) {
            Node::Leaf(leaf) => {
                lines.push(format!("{prefix}Predict: {}", leaf.percentage_probabilities()));
            }
            Node::Decision {
                question,
                true_branch,
                false_branch,
                ..
            } => {
                lines.push(format!("{prefix}{question}"));
                let nested = format!("{prefix}{unit}");

                lines.push(format!("{prefix}--> True:"));
                self.render_node(*true_branch, unit, nested.clone(), lines);

                lines.push(format!("{prefix}--> False:"));
                self.render_node(*false_branch, unit, nested, lines);
            }
        }
    }
}

impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
