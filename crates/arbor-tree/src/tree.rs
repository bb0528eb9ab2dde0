use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::{
    TreeError,
    config::TreeConfig,
    dataset::{Dataset, Row},
    node::{Leaf, Node, NodeIndex},
    schema::Schema,
    split::{ClassCounts, find_best_split, partition},
};

/// Build a tree with the default [`TreeConfig`].
///
/// # Errors
///
/// | Variant | When |
/// |---|---|
/// | [`TreeError::EmptyDataset`] | `rows` is empty |
/// | [`TreeError::MissingField`] | a row lacks a feature or the class field |
/// | [`TreeError::TypeMismatch`] | a feature value's kind differs from the schema |
/// | [`TreeError::NonFiniteValue`] | a numeric value is NaN or infinite |
pub fn build(schema: Schema, rows: &[Row]) -> Result<DecisionTree, TreeError> {
    TreeConfig::new().fit_rows(schema, rows)
}

#[instrument(skip_all, fields(n_rows = dataset.n_rows(), criterion = ?config.criterion))]
pub(crate) fn grow(config: &TreeConfig, dataset: &Dataset) -> DecisionTree {
    let indices: Vec<usize> = (0..dataset.n_rows()).collect();
    let mut arena: Vec<Node> = Vec::new();

    let root = build_tree(dataset, &indices, config, 0, &mut arena);
    debug_assert_eq!(root, NodeIndex::ROOT);

    let tree = DecisionTree {
        nodes: arena,
        schema: dataset.schema().clone(),
        n_samples: dataset.n_rows(),
    };

    debug!(
        n_nodes = tree.n_nodes(),
        n_leaves = tree.n_leaves(),
        depth = tree.depth(),
        "decision tree built"
    );

    tree
}

/// Recursively build the arena-based decision tree.
///
/// Returns the [`NodeIndex`] of the node just created in `arena`. Every
/// accepted split leaves both sides non-empty and strictly smaller than
/// `indices`, so recursion depth is bounded by the number of rows.
fn build_tree(
    dataset: &Dataset,
    indices: &[usize],
    config: &TreeConfig,
    depth: usize,
    arena: &mut Vec<Node>,
) -> NodeIndex {
    let labels = dataset.labels();
    let class_counts: ClassCounts = indices.iter().map(|&i| labels[i].clone()).collect();
    let impurity = config.criterion.impurity(&class_counts);

    let split = find_best_split(dataset, indices, config.criterion, config.tie_break);
    let gain = split.gain();

    let (feature, question) = match split.into_candidate() {
        Some(candidate) if gain > 0.0 => candidate,
        _ => {
            let idx = arena.len();
            arena.push(Node::Leaf(Leaf::new(class_counts, impurity)));
            return NodeIndex::new(idx);
        }
    };

    debug!(depth, n_samples = indices.len(), %question, gain, "splitting node");

    let (true_rows, false_rows) = partition(dataset.column(feature), indices, &question);

    // Arena pattern: reserve index, recurse, then overwrite with the decision.
    let node_idx = arena.len();
    arena.push(Node::Leaf(Leaf::new(class_counts, impurity)));

    let true_branch = build_tree(dataset, &true_rows, config, depth + 1, arena);
    let false_branch = build_tree(dataset, &false_rows, config, depth + 1, arena);

    arena[node_idx] = Node::Decision {
        question,
        true_branch,
        false_branch,
        impurity,
        n_samples: indices.len(),
        gain,
    };

    NodeIndex::new(node_idx)
}

/// A fitted decision tree.
///
/// Stored as an arena-based `Vec<Node>` with index references, root first.
/// Immutable once built: classification and rendering only borrow it, so a
/// shared reference can be used from many threads at once.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) schema: Schema,
    pub(crate) n_samples: usize,
}

impl DecisionTree {
    /// Return the root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[NodeIndex::ROOT.index()]
    }

    /// Return the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` did not come from this tree.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.index()]
    }

    /// Return all nodes in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the schema the tree was trained with.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Return the number of training rows.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Return the total number of nodes in the tree (both decisions and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the maximum depth of the tree.
    ///
    /// A single-node tree (just a root leaf) has depth 0.
    /// Uses an iterative BFS approach.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0usize;
        let mut queue = VecDeque::new();
        queue.push_back((NodeIndex::ROOT, 0usize));

        while let Some((idx, d)) = queue.pop_front() {
            match self.node(idx) {
                Node::Leaf(_) => max_depth = max_depth.max(d),
                Node::Decision {
                    true_branch,
                    false_branch,
                    ..
                } => {
                    queue.push_back((*true_branch, d + 1));
                    queue.push_back((*false_branch, d + 1));
                }
            }
        }

        max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FeatureSpec;
    use crate::value::{ClassLabel, Value};

    fn schema(features: Vec<FeatureSpec>) -> Schema {
        Schema::new("c", features).unwrap()
    }

    #[test]
    fn empty_dataset_error() {
        let err = build(schema(vec![FeatureSpec::numeric("x")]), &[]).unwrap_err();
        assert_eq!(err, TreeError::EmptyDataset);
    }

    #[test]
    fn pure_dataset_single_leaf() {
        let rows: Vec<Row> = [1.0, 2.0, 3.0]
            .iter()
            .map(|&x| Row::new().with("x", x).with("c", "only"))
            .collect();
        let tree = build(schema(vec![FeatureSpec::numeric("x")]), &rows).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.n_leaves(), 1);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn root_is_first_in_arena() {
        let rows: Vec<Row> = [1.0, 2.0, 3.0, 10.0, 11.0, 12.0]
            .iter()
            .enumerate()
            .map(|(i, &x)| Row::new().with("x", x).with("c", if i < 3 { "a" } else { "b" }))
            .collect();
        let tree = build(schema(vec![FeatureSpec::numeric("x")]), &rows).unwrap();

        let Node::Decision {
            question,
            true_branch,
            false_branch,
            n_samples,
            ..
        } = tree.root()
        else {
            panic!("root should split");
        };
        assert_eq!(question.value(), &Value::from(10.0));
        assert_eq!(*n_samples, 6);

        let Node::Leaf(yes) = tree.node(*true_branch) else {
            panic!("true branch should be a leaf");
        };
        assert_eq!(yes.class_counts().get(&ClassLabel::from("b")), 3);
        let Node::Leaf(no) = tree.node(*false_branch) else {
            panic!("false branch should be a leaf");
        };
        assert_eq!(no.class_counts().get(&ClassLabel::from("a")), 3);
    }

    #[test]
    fn xor_needs_depth_2() {
        let rows = vec![
            Row::new().with("p", "0").with("q", "0").with("c", "even"),
            Row::new().with("p", "0").with("q", "1").with("c", "odd"),
            Row::new().with("p", "1").with("q", "0").with("c", "odd"),
            Row::new().with("p", "1").with("q", "1").with("c", "even"),
        ];
        let tree = build(
            schema(vec![FeatureSpec::categorical("p"), FeatureSpec::categorical("q")]),
            &rows,
        )
        .unwrap();
        // No single question reduces Gini on XOR, so the root is a leaf.
        assert_eq!(tree.n_nodes(), 1);
    }

    #[test]
    fn leaf_counts_cover_every_row() {
        let rows: Vec<Row> = (0..20)
            .map(|i| {
                Row::new()
                    .with("x", f64::from(i % 7))
                    .with("g", if i % 3 == 0 { "p" } else { "q" })
                    .with("c", if i % 2 == 0 { "a" } else { "b" })
            })
            .collect();
        let tree = build(
            schema(vec![FeatureSpec::numeric("x"), FeatureSpec::categorical("g")]),
            &rows,
        )
        .unwrap();

        let total: usize = tree
            .nodes()
            .iter()
            .filter_map(|n| match n {
                Node::Leaf(leaf) => Some(leaf.n_samples()),
                Node::Decision { .. } => None,
            })
            .sum();
        assert_eq!(total, 20);
        assert!(tree.depth() <= 20);
        assert_eq!(tree.n_samples(), 20);
    }

    #[test]
    fn decision_children_are_smaller() {
        let rows: Vec<Row> = (0..12)
            .map(|i| Row::new().with("x", f64::from(i)).with("c", if i % 4 == 0 { "a" } else { "b" }))
            .collect();
        let tree = build(schema(vec![FeatureSpec::numeric("x")]), &rows).unwrap();
        for node in tree.nodes() {
            if let Node::Decision {
                true_branch,
                false_branch,
                n_samples,
                gain,
                ..
            } = node
            {
                let t = tree.node(*true_branch).n_samples();
                let f = tree.node(*false_branch).n_samples();
                assert!(t > 0 && f > 0);
                assert_eq!(t + f, *n_samples);
                assert!(*gain > 0.0);
            }
        }
    }
}
