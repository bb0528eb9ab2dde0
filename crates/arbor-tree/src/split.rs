use std::collections::{BTreeMap, HashSet};

use crate::dataset::Dataset;
use crate::node::{FeatureIndex, Impurity};
use crate::question::Question;
use crate::value::{ClassLabel, Value};

/// Per-class row counts, ordered by class label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassCounts {
    counts: BTreeMap<ClassLabel, usize>,
    total: usize,
}

impl ClassCounts {
    /// Create an empty count map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one row of class `label`.
    pub fn add(&mut self, label: ClassLabel) {
        *self.counts.entry(label).or_insert(0) += 1;
        self.total += 1;
    }

    /// Return the count for `label`, zero if it never occurred.
    #[must_use]
    pub fn get(&self, label: &ClassLabel) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Return the number of rows counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Return the number of distinct classes observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Return `true` if no rows were counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate `(label, count)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&ClassLabel, usize)> {
        self.counts.iter().map(|(label, &count)| (label, count))
    }

    /// Return `true` if both row-sets hold every class in the same proportion.
    ///
    /// Compares `count / total` by cross-multiplying in integers, so the answer
    /// is exact. Two empty sets share a mix; an empty and a non-empty set don't.
    #[must_use]
    pub fn same_mix(&self, other: &ClassCounts) -> bool {
        if self.total == 0 || other.total == 0 {
            return self.total == other.total;
        }
        let (n, m) = (self.total as u128, other.total as u128);
        self.counts
            .keys()
            .chain(other.counts.keys())
            .all(|label| self.get(label) as u128 * m == other.get(label) as u128 * n)
    }
}

impl FromIterator<ClassLabel> for ClassCounts {
    fn from_iter<I: IntoIterator<Item = ClassLabel>>(iter: I) -> Self {
        let mut counts = ClassCounts::new();
        for label in iter {
            counts.add(label);
        }
        counts
    }
}

/// Criterion for measuring the quality of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitCriterion {
    /// Gini impurity: 1 - Σ(p_i²)
    #[default]
    Gini,
    /// Information entropy: -Σ(p_i · ln(p_i))
    Entropy,
}

impl SplitCriterion {
    /// Compute the impurity of a row-set from its class counts.
    ///
    /// Returns [`Impurity::new(0.0)`] for empty counts. Callers never pass an
    /// empty row-set: the split search discards empty partitions first.
    ///
    /// For `Gini`: `1 - Σ(p_i²)` where `p_i = count_i / total`, in `[0, 1 - 1/k]`.
    /// For `Entropy`: `-Σ(p_i · ln(p_i))`.
    #[must_use]
    pub fn impurity(&self, counts: &ClassCounts) -> Impurity {
        if counts.total() == 0 {
            return Impurity::new(0.0);
        }
        let n = counts.total() as f64;
        let value = match self {
            SplitCriterion::Gini => {
                let sum_sq: f64 = counts
                    .iter()
                    .map(|(_, c)| {
                        let p = c as f64 / n;
                        p * p
                    })
                    .sum();
                1.0 - sum_sq
            }
            SplitCriterion::Entropy => -counts
                .iter()
                .map(|(_, c)| {
                    let p = c as f64 / n;
                    p * p.ln()
                })
                .sum::<f64>(),
        };
        Impurity::new(value)
    }

    /// Reduction in impurity from splitting a parent into `left` and `right`.
    ///
    /// `parent - w·I(left) - (1 - w)·I(right)` with `w = |left| / (|left| + |right|)`.
    /// Never negative for a bipartition of the parent's rows.
    ///
    /// Both criteria are strictly concave, so the gain is zero exactly when
    /// `left` and `right` share one class mix. That case is decided with
    /// [`ClassCounts::same_mix`] and returns `0.0`, keeping rounding noise
    /// out of the leaf decision.
    #[must_use]
    pub fn information_gain(
        &self,
        left: &ClassCounts,
        right: &ClassCounts,
        parent: Impurity,
    ) -> f64 {
        if left.same_mix(right) {
            return 0.0;
        }
        let weight = left.total() as f64 / (left.total() + right.total()) as f64;
        parent.value()
            - weight * self.impurity(left).value()
            - (1.0 - weight) * self.impurity(right).value()
    }
}

/// Which candidate wins when two splits have equal gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Replace the best on `gain >= best`: the last equal candidate wins.
    #[default]
    LastWins,
    /// Replace the best only on `gain > best`: the first equal candidate wins.
    FirstWins,
}

impl TieBreak {
    fn replaces(self, gain: f64, best: f64) -> bool {
        match self {
            TieBreak::LastWins => gain >= best,
            TieBreak::FirstWins => gain > best,
        }
    }
}

/// Outcome of the split search over one row-set.
///
/// `gain` starts at 0 and only a candidate that the [`TieBreak`] rule
/// accepts replaces it, so a zero gain means no split reduces impurity.
/// Under [`TieBreak::LastWins`] a zero-gain candidate may still be recorded
/// as the question; the builder ignores it.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSplit {
    gain: f64,
    candidate: Option<(FeatureIndex, Question)>,
}

impl BestSplit {
    /// Return the best information gain found.
    #[must_use]
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Return the question achieving [`gain`](Self::gain), if any was recorded.
    #[must_use]
    pub fn question(&self) -> Option<&Question> {
        self.candidate.as_ref().map(|(_, q)| q)
    }

    /// Return the schema position of the question's feature.
    #[must_use]
    pub fn feature(&self) -> Option<FeatureIndex> {
        self.candidate.as_ref().map(|(f, _)| *f)
    }

    /// Return `true` if the split reduces impurity and should be taken.
    #[must_use]
    pub fn is_useful(&self) -> bool {
        self.gain > 0.0 && self.candidate.is_some()
    }

    pub(crate) fn into_candidate(self) -> Option<(FeatureIndex, Question)> {
        self.candidate
    }
}

/// Distinct values of `column` over `indices`, in order of first appearance.
pub(crate) fn distinct_values<'a>(column: &'a [Value], indices: &[usize]) -> Vec<&'a Value> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for &i in indices {
        let value = &column[i];
        if seen.insert(value.key()) {
            values.push(value);
        }
    }
    values
}

/// Split `indices` into rows that answer `question` with yes and with no.
pub(crate) fn partition(
    column: &[Value],
    indices: &[usize],
    question: &Question,
) -> (Vec<usize>, Vec<usize>) {
    indices
        .iter()
        .partition(|&&i| question.answer(&column[i]) == Some(true))
}

/// Find the question with the highest information gain over `indices`.
///
/// Visits features in schema order and, within a feature, distinct values in
/// order of first appearance. Candidates with an empty side are discarded.
/// Ties are resolved by `tie_break`.
pub(crate) fn find_best_split(
    dataset: &Dataset,
    indices: &[usize],
    criterion: SplitCriterion,
    tie_break: TieBreak,
) -> BestSplit {
    let labels = dataset.labels();
    let parent_counts: ClassCounts = indices.iter().map(|&i| labels[i].clone()).collect();
    let parent_impurity = criterion.impurity(&parent_counts);

    let mut best = BestSplit {
        gain: 0.0,
        candidate: None,
    };

    for (feat_idx, (column, spec)) in dataset
        .columns()
        .iter()
        .zip(dataset.schema().features())
        .enumerate()
    {
        for value in distinct_values(column, indices) {
            let question = Question::new(spec.name(), value.clone());

            let mut true_counts = ClassCounts::new();
            let mut false_counts = ClassCounts::new();
            for &i in indices {
                if question.answer(&column[i]) == Some(true) {
                    true_counts.add(labels[i].clone());
                } else {
                    false_counts.add(labels[i].clone());
                }
            }

            // A split that does not divide the rows is no split at all.
            if true_counts.is_empty() || false_counts.is_empty() {
                continue;
            }

            let gain = criterion.information_gain(&true_counts, &false_counts, parent_impurity);
            if tie_break.replaces(gain, best.gain) {
                best = BestSplit {
                    gain,
                    candidate: Some((FeatureIndex::new(feat_idx), question)),
                };
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Row;
    use crate::schema::{FeatureSpec, Schema};

    fn counts(pairs: &[(&str, usize)]) -> ClassCounts {
        pairs
            .iter()
            .flat_map(|&(label, n)| std::iter::repeat_n(ClassLabel::from(label), n))
            .collect()
    }

    fn dataset(features: Vec<FeatureSpec>, rows: Vec<Row>) -> Dataset {
        Dataset::new(Schema::new("c", features).unwrap(), &rows).unwrap()
    }

    // --- Impurity ---

    #[test]
    fn gini_pure() {
        let imp = SplitCriterion::Gini.impurity(&counts(&[("a", 10)]));
        assert!((imp.value() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn gini_binary_balanced() {
        let imp = SplitCriterion::Gini.impurity(&counts(&[("a", 5), ("b", 5)]));
        assert!((imp.value() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn gini_three_class_uniform() {
        let imp = SplitCriterion::Gini.impurity(&counts(&[("a", 100), ("b", 100), ("c", 100)]));
        assert!((imp.value() - (1.0 - 3.0 * (1.0 / 3.0_f64).powi(2))).abs() < 1e-10);
    }

    #[test]
    fn entropy_binary_balanced() {
        let imp = SplitCriterion::Entropy.impurity(&counts(&[("a", 5), ("b", 5)]));
        assert!((imp.value() - 2.0_f64.ln()).abs() < 1e-10);
    }

    #[test]
    fn class_counts_order_by_label() {
        let c = counts(&[("Yes", 2), ("No", 1), ("Maybe", 3)]);
        let labels: Vec<&str> = c.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Maybe", "No", "Yes"]);
        assert_eq!(c.total(), 6);
        assert_eq!(c.get(&ClassLabel::from("Absent")), 0);
    }

    // --- Information gain ---

    #[test]
    fn perfect_split_recovers_parent_impurity() {
        let parent = SplitCriterion::Gini.impurity(&counts(&[("a", 3), ("b", 3)]));
        let gain = SplitCriterion::Gini.information_gain(
            &counts(&[("a", 3)]),
            &counts(&[("b", 3)]),
            parent,
        );
        assert!((gain - 0.5).abs() < 1e-12);
    }

    #[test]
    fn useless_split_has_zero_gain() {
        let parent = SplitCriterion::Gini.impurity(&counts(&[("a", 2), ("b", 2)]));
        let gain = SplitCriterion::Gini.information_gain(
            &counts(&[("a", 1), ("b", 1)]),
            &counts(&[("a", 1), ("b", 1)]),
            parent,
        );
        assert!(gain.abs() < 1e-12);
    }

    #[test]
    fn proportional_sides_have_exactly_zero_gain() {
        // 6:8 and 3:4 round to a tiny positive gain in floating point.
        let left = counts(&[("a", 6), ("b", 8)]);
        let right = counts(&[("a", 3), ("b", 4)]);
        assert!(left.same_mix(&right));

        let parent = SplitCriterion::Gini.impurity(&counts(&[("a", 9), ("b", 12)]));
        assert_eq!(
            SplitCriterion::Gini.information_gain(&left, &right, parent),
            0.0
        );
        let parent = SplitCriterion::Entropy.impurity(&counts(&[("a", 9), ("b", 12)]));
        assert_eq!(
            SplitCriterion::Entropy.information_gain(&left, &right, parent),
            0.0
        );
    }

    #[test]
    fn same_mix_compares_every_class() {
        let c = counts(&[("a", 2), ("b", 2)]);
        assert!(c.same_mix(&counts(&[("a", 5), ("b", 5)])));
        assert!(!c.same_mix(&counts(&[("a", 2), ("b", 2), ("c", 1)])));
        assert!(!c.same_mix(&counts(&[("a", 2), ("b", 3)])));
        assert!(!c.same_mix(&ClassCounts::new()));
    }

    // --- Search ---

    #[test]
    fn distinct_values_keep_first_appearance() {
        let column = vec![
            Value::from("b"),
            Value::from("a"),
            Value::from("b"),
            Value::from("c"),
        ];
        let found = distinct_values(&column, &[0, 1, 2, 3]);
        assert_eq!(found, vec![&column[0], &column[1], &column[3]]);
        let subset = distinct_values(&column, &[3, 2]);
        assert_eq!(subset, vec![&column[3], &column[2]]);
    }

    #[test]
    fn partition_numeric_uses_threshold() {
        let column = vec![Value::from(1.0), Value::from(5.0), Value::from(3.0)];
        let (yes, no) = partition(&column, &[0, 1, 2], &Question::new("x", Value::from(3.0)));
        assert_eq!(yes, vec![1, 2]);
        assert_eq!(no, vec![0]);
    }

    #[test]
    fn separable_data_finds_correct_split() {
        let rows = [1.0, 2.0, 3.0, 10.0, 11.0, 12.0]
            .iter()
            .enumerate()
            .map(|(i, &x)| Row::new().with("x", x).with("c", if i < 3 { "a" } else { "b" }))
            .collect();
        let ds = dataset(vec![FeatureSpec::numeric("x")], rows);
        let split = find_best_split(&ds, &[0, 1, 2, 3, 4, 5], SplitCriterion::Gini, TieBreak::LastWins);

        assert!(split.is_useful());
        assert!((split.gain() - 0.5).abs() < 1e-12);
        assert_eq!(split.question(), Some(&Question::new("x", Value::from(10.0))));
        assert_eq!(split.feature().map(FeatureIndex::index), Some(0));
    }

    #[test]
    fn constant_feature_yields_no_split() {
        let rows = ["a", "a", "b", "b"]
            .iter()
            .map(|&c| Row::new().with("f", "same").with("c", c))
            .collect();
        let ds = dataset(vec![FeatureSpec::categorical("f")], rows);
        let split = find_best_split(&ds, &[0, 1, 2, 3], SplitCriterion::Gini, TieBreak::LastWins);
        assert_eq!(split.gain(), 0.0);
        assert!(split.question().is_none());
    }

    #[test]
    fn last_equal_candidate_wins_by_default() {
        // Both features separate the classes perfectly.
        let rows = vec![
            Row::new().with("f", "p").with("g", "u").with("c", "a"),
            Row::new().with("f", "q").with("g", "v").with("c", "b"),
        ];
        let ds = dataset(
            vec![FeatureSpec::categorical("f"), FeatureSpec::categorical("g")],
            rows,
        );

        let last = find_best_split(&ds, &[0, 1], SplitCriterion::Gini, TieBreak::LastWins);
        assert_eq!(last.question(), Some(&Question::new("g", Value::from("v"))));

        let first = find_best_split(&ds, &[0, 1], SplitCriterion::Gini, TieBreak::FirstWins);
        assert_eq!(first.question(), Some(&Question::new("f", Value::from("p"))));
        assert!((first.gain() - last.gain()).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_gain_candidate_recorded_only_when_last_wins() {
        let rows = vec![
            Row::new().with("f", "p").with("c", "a"),
            Row::new().with("f", "p").with("c", "b"),
            Row::new().with("f", "q").with("c", "a"),
            Row::new().with("f", "q").with("c", "b"),
        ];
        let ds = dataset(vec![FeatureSpec::categorical("f")], rows);
        let indices = [0, 1, 2, 3];

        let last = find_best_split(&ds, &indices, SplitCriterion::Gini, TieBreak::LastWins);
        assert_eq!(last.gain(), 0.0);
        assert!(last.question().is_some());
        assert!(!last.is_useful());

        let first = find_best_split(&ds, &indices, SplitCriterion::Gini, TieBreak::FirstWins);
        assert!(first.question().is_none());
    }
}
