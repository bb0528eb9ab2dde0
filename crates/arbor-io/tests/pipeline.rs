//! End-to-end integration tests: schema + rows on disk -> tree -> classify / explain.

use std::path::{Path, PathBuf};

use arbor_io::{ExplanationTable, RowReader, load_schema, parse_query};
use arbor_tree::{ClassLabel, build};

/// Path to the test fixture directory.
fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn dropout_tree_renders() {
    let schema = load_schema(&fixture_path("dropout_schema.json")).expect("schema fixture");
    let rows = RowReader::new(&fixture_path("dropout_rows.csv"), &schema)
        .read()
        .expect("rows fixture");
    assert_eq!(rows.len(), 82);

    let tree = build(schema, &rows).unwrap();
    let expected = "\
Is marks = >=65
--> True:
  Is income = >=100000
  --> True:
    Predict: {No: 11.11111111111111%, Yes: 88.88888888888889%}
  --> False:
    Predict: {No: 53.333333333333336%, Yes: 46.666666666666664%}
--> False:
  Is income = >100000
  --> True:
    Predict: {No: 50%, Yes: 50%}
  --> False:
    Is income = <100000
    --> True:
      Predict: {No: 100%}
    --> False:
      Predict: {No: 75%, Yes: 25%}";
    assert_eq!(tree.render(), expected);
    assert_eq!(tree.n_leaves(), 5);
    assert_eq!(tree.depth(), 3);
}

#[test]
fn dropout_query_with_explanation() {
    let schema = load_schema(&fixture_path("dropout_schema.json")).unwrap();
    let rows = RowReader::new(&fixture_path("dropout_rows.csv"), &schema)
        .read()
        .unwrap();
    let tree = build(schema.clone(), &rows).unwrap();
    let explanations = ExplanationTable::load(&fixture_path("dropout_explanations.json")).unwrap();

    let strong = parse_query(["marks=>=65", "income=>=100000"], &schema).unwrap();
    assert_eq!(tree.predict(&strong).unwrap(), ClassLabel::from("Yes"));
    assert_eq!(explanations.explain(&strong), Some("N/A"));

    let weak = parse_query(["marks=<65", "income=<100000"], &schema).unwrap();
    let probs = tree.classify(&weak).unwrap();
    assert_eq!(probs.to_string(), "{No: 100%}");
    assert_eq!(
        explanations.explain(&weak),
        Some("Low B.Tech marks as well as low income. So, it is difficult for you to get success in that domain.")
    );
}

#[test]
fn dropout_explanations_cover_each_marks_income_case() {
    let schema = load_schema(&fixture_path("dropout_schema.json")).unwrap();
    let explanations = ExplanationTable::load(&fixture_path("dropout_explanations.json")).unwrap();

    let cases = [
        (["marks=>=65", "income=>=100000"], "N/A"),
        (
            ["marks=>=65", "income=<100000"],
            "You have low mount of Income. If you joins the college with this income, then it is very much difficult for you to complete your course.",
        ),
        (
            ["marks=<65", "income=>=100000"],
            "Low B.Tech marks in that domain,It is difficult for you to get success in that domain.",
        ),
        (
            ["marks=<65", "income=<100000"],
            "Low B.Tech marks as well as low income. So, it is difficult for you to get success in that domain.",
        ),
    ];
    for (query, reason) in cases {
        let row = parse_query(query, &schema).unwrap();
        assert_eq!(explanations.explain(&row), Some(reason), "{query:?}");
    }
}

#[test]
fn numeric_json_rows_and_csv_queries() {
    let schema = load_schema(&fixture_path("study_schema.json")).unwrap();
    let rows = RowReader::new(&fixture_path("study_rows.json"), &schema)
        .read()
        .unwrap();
    let tree = build(schema.clone(), &rows).unwrap();

    assert_eq!(
        tree.render_lines("  "),
        [
            "Is hours ≥ 5",
            "--> True:",
            "  Predict: {yes: 100%}",
            "--> False:",
            "  Predict: {no: 100%}",
        ]
    );

    let queries = RowReader::new(&fixture_path("study_queries.csv"), &schema)
        .queries()
        .read()
        .unwrap();
    let predicted: Vec<ClassLabel> = tree
        .classify_batch(&queries)
        .unwrap()
        .iter()
        .filter_map(|p| p.predicted_class().cloned())
        .collect();
    assert_eq!(predicted, vec![ClassLabel::from("no"), ClassLabel::from("yes")]);

    let ranked = tree.feature_importances();
    assert_eq!(ranked[0].name, "hours");
}
