use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use arbor_io::{ExplanationTable, RowReader, load_schema, parse_query};
use arbor_tree::{
    ClassLabel, DecisionTree, Node, Probabilities, RankedFeature, Row, SplitCriterion, TieBreak,
    TreeConfig,
};

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Build, render and query Gini decision trees over tabular data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for batch classification (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Training inputs and tree-growing parameters shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct TreeArgs {
    /// Path to the training rows (.csv or .json)
    #[arg(long)]
    data: PathBuf,

    /// Path to the JSON schema naming the class field and typed features
    #[arg(long)]
    schema: PathBuf,

    /// Impurity criterion: "gini" or "entropy"
    #[arg(long, default_value = "gini")]
    criterion: String,

    /// Equal-gain resolution: "last" (last candidate wins) or "first"
    #[arg(long, default_value = "last")]
    tie_break: String,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tree as indented text
    Render {
        #[command(flatten)]
        tree: TreeArgs,

        /// Spaces per nesting level
        #[arg(long, default_value_t = 2)]
        indent: usize,
    },

    /// Print tree statistics and feature importances as JSON
    Summary {
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Classify query rows and print class percentages as JSON
    Classify {
        #[command(flatten)]
        tree: TreeArgs,

        /// A feature assignment `field=value` (repeat for each feature)
        #[arg(long = "query", conflicts_with = "queries", required_unless_present = "queries")]
        query: Vec<String>,

        /// Path to a file of query rows (.csv or .json); the class column is optional
        #[arg(long)]
        queries: Option<PathBuf>,

        /// Path to a JSON explanation table matched against each query row
        #[arg(long)]
        explanations: Option<PathBuf>,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct SummaryOutput {
    n_rows: usize,
    n_features: usize,
    n_nodes: usize,
    n_leaves: usize,
    depth: usize,
    class_counts: BTreeMap<ClassLabel, usize>,
    importances: Vec<RankedFeature>,
}

#[derive(Serialize)]
struct ClassifyOutput {
    n_queries: usize,
    results: Vec<QueryOutput>,
}

#[derive(Serialize)]
struct QueryOutput {
    query: Row,
    predicted: Option<ClassLabel>,
    probabilities: Probabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
}

fn parse_criterion(s: &str) -> Result<SplitCriterion> {
    match s {
        "gini" => Ok(SplitCriterion::Gini),
        "entropy" => Ok(SplitCriterion::Entropy),
        other => anyhow::bail!("unknown criterion: {other} (expected gini or entropy)"),
    }
}

fn parse_tie_break(s: &str) -> Result<TieBreak> {
    match s {
        "last" => Ok(TieBreak::LastWins),
        "first" => Ok(TieBreak::FirstWins),
        other => anyhow::bail!("unknown tie-break: {other} (expected last or first)"),
    }
}

/// Load schema and rows, then grow the tree.
fn grow_tree(args: &TreeArgs) -> Result<DecisionTree> {
    let config = TreeConfig::new()
        .with_criterion(parse_criterion(&args.criterion)?)
        .with_tie_break(parse_tie_break(&args.tie_break)?);

    let schema = load_schema(&args.schema).context("failed to read schema")?;
    let rows = RowReader::new(&args.data, &schema)
        .read()
        .context("failed to read training rows")?;

    let tree = config
        .fit_rows(schema, &rows)
        .context("failed to build decision tree")?;
    info!(
        n_rows = tree.n_samples(),
        n_nodes = tree.n_nodes(),
        depth = tree.depth(),
        "decision tree built"
    );
    Ok(tree)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Render { tree, indent } => {
            let tree = grow_tree(&tree)?;
            let unit = " ".repeat(indent);
            for line in tree.render_lines(&unit) {
                println!("{line}");
            }
        }

        Command::Summary { tree } => {
            let tree = grow_tree(&tree)?;

            let mut class_counts = BTreeMap::new();
            for node in tree.nodes() {
                if let Node::Leaf(leaf) = node {
                    for (label, count) in leaf.class_counts().iter() {
                        *class_counts.entry(label.clone()).or_insert(0) += count;
                    }
                }
            }

            let output = SummaryOutput {
                n_rows: tree.n_samples(),
                n_features: tree.schema().n_features(),
                n_nodes: tree.n_nodes(),
                n_leaves: tree.n_leaves(),
                depth: tree.depth(),
                class_counts,
                importances: tree.feature_importances(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Classify {
            tree,
            query,
            queries,
            explanations,
        } => {
            let tree = grow_tree(&tree)?;

            let rows = match queries {
                Some(path) => RowReader::new(&path, tree.schema())
                    .queries()
                    .read()
                    .context("failed to read query rows")?,
                None => vec![
                    parse_query(query.iter().map(String::as_str), tree.schema())
                        .context("failed to parse query")?,
                ],
            };

            let explanations = explanations
                .map(|path| ExplanationTable::load(&path))
                .transpose()
                .context("failed to read explanation table")?;

            let probabilities = tree
                .classify_batch(&rows)
                .context("classification failed")?;
            info!(n_queries = rows.len(), "queries classified");

            let results = rows
                .into_iter()
                .zip(probabilities)
                .map(|(row, probs)| QueryOutput {
                    explanation: explanations
                        .as_ref()
                        .and_then(|table| table.explain(&row))
                        .map(String::from),
                    predicted: probs.predicted_class().cloned(),
                    probabilities: probs,
                    query: row,
                })
                .collect::<Vec<_>>();

            let output = ClassifyOutput {
                n_queries: results.len(),
                results,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
