//! I/O error types for arbor-io.

use std::path::PathBuf;

/// Errors from reading schemas, rows, queries and explanation tables.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a JSON file is malformed or does not match the expected shape.
    ///
    /// Schema validation failures (no features, duplicates, class field
    /// listed as a feature) surface here too.
    #[error("invalid JSON in {path}")]
    Json {
        /// Path to the JSON file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when the file extension is neither `.csv` nor `.json`.
    #[error("unsupported row format for {path}: expected a .csv or .json file")]
    UnsupportedFormat {
        /// Path with the unrecognized extension.
        path: PathBuf,
    },

    /// Returned when the file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the data file.
        path: PathBuf,
    },

    /// Returned when a column the schema requires is absent from the CSV header.
    #[error("missing column \"{column}\" in {path}")]
    MissingColumn {
        /// Path to the CSV file.
        path: PathBuf,
        /// Name of the absent column.
        column: String,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a numeric cell is NaN, Inf, or not a float at all.
    #[error("invalid number in {path}: row {row_index}, column \"{column}\", raw value \"{raw}\"")]
    InvalidNumber {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Column name.
        column: String,
        /// The raw string value that failed to parse.
        raw: String,
    },

    /// Returned when a `field=value` query assignment cannot be used.
    #[error("invalid query \"{input}\": {reason}")]
    InvalidQuery {
        /// The assignment as given.
        input: String,
        /// What is wrong with it.
        reason: QueryProblem,
    },
}

/// Why a `field=value` assignment was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueryProblem {
    /// No `=` separates field and value.
    #[error("expected field=value")]
    MissingEquals,
    /// The field is not a feature of the schema.
    #[error("unknown feature")]
    UnknownFeature,
    /// The feature is numeric but the value is not a finite number.
    #[error("value is not a finite number")]
    NotANumber,
}
