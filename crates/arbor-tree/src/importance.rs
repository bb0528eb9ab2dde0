//! Mean-decrease-in-impurity feature importance.

use serde::Serialize;

use crate::node::Node;
use crate::tree::DecisionTree;

/// A ranked feature with name, importance score, and rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFeature {
    /// Feature name.
    pub name: String,
    /// Normalized importance score (sums to 1.0 across all features).
    pub importance: f64,
    /// 1-based rank (1 = most important).
    pub rank: usize,
}

impl DecisionTree {
    /// Compute Mean Decrease in Impurity (MDI) feature importances.
    ///
    /// Each decision node contributes `n_samples × gain` to its feature; the
    /// totals are normalized to sum to 1.0, sorted descending and ranked.
    /// Equal scores keep schema order. A root-only tree scores every
    /// feature 0.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<RankedFeature> {
        let features = self.schema.features();
        let mut totals = vec![0.0f64; features.len()];

        for node in &self.nodes {
            if let Node::Decision {
                question,
                n_samples,
                gain,
                ..
            } = node
                && let Some(pos) = self.schema.position(question.feature())
            {
                totals[pos.index()] += *n_samples as f64 * gain;
            }
        }

        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            totals.iter_mut().for_each(|v| *v /= sum);
        }

        let mut ranked: Vec<RankedFeature> = features
            .iter()
            .zip(totals)
            .map(|(spec, importance)| RankedFeature {
                name: spec.name().to_string(),
                importance,
                rank: 0, // will be set after sorting
            })
            .collect();

        ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));

        for (i, feat) in ranked.iter_mut().enumerate() {
            feat.rank = i + 1;
        }

        ranked
    }
}

#[cfg(test)]
mod tests {
    use crate::dataset::Row;
    use crate::schema::{FeatureSpec, Schema};
    use crate::tree::build;

    fn schema() -> Schema {
        Schema::new(
            "c",
            vec![FeatureSpec::categorical("noise"), FeatureSpec::numeric("signal")],
        )
        .unwrap()
    }

    #[test]
    fn informative_feature_ranks_first() {
        let rows: Vec<Row> = (0..8)
            .map(|i| {
                Row::new()
                    .with("noise", "same")
                    .with("signal", f64::from(i))
                    .with("c", if i < 4 { "a" } else { "b" })
            })
            .collect();
        let ranked = build(schema(), &rows).unwrap().feature_importances();

        assert_eq!(ranked[0].name, "signal");
        assert_eq!(ranked[0].rank, 1);
        assert!((ranked[0].importance - 1.0).abs() < 1e-12);
        assert_eq!(ranked[1].importance, 0.0);
        let sum: f64 = ranked.iter().map(|f| f.importance).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_leaf_scores_zero() {
        let rows = vec![Row::new().with("noise", "x").with("signal", 1.0).with("c", "a"); 4];
        let ranked = build(schema(), &rows).unwrap().feature_importances();
        assert!(ranked.iter().all(|f| f.importance == 0.0));
        let names: Vec<&str> = ranked.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["noise", "signal"]);
    }
}
