//! Schema, row, query and explanation loading for arbor decision trees.

mod error;
mod explain;
mod query;
mod reader;
mod schema;

pub use error::{IoError, QueryProblem};
pub use explain::{ExplanationRule, ExplanationTable};
pub use query::{parse_assignment, parse_query};
pub use reader::{RowFormat, RowReader};
pub use schema::load_schema;
