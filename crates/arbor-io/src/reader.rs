//! Row reader for CSV and JSON files, typed by a [`Schema`].

use std::path::{Path, PathBuf};

use arbor_tree::{Row, Schema, Value, ValueKind};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::schema::read_json;

/// On-disk layout of a row file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFormat {
    /// `.csv`: header row, one record per row.
    Csv,
    /// `.json`: an array of objects mapping field name to number or string.
    Json,
}

impl RowFormat {
    /// Pick the format from the file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnsupportedFormat`] for any extension other than
    /// `csv` or `json`.
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Ok(RowFormat::Csv),
            Some("json") => Ok(RowFormat::Json),
            _ => Err(IoError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Reads rows from a CSV or JSON file.
///
/// CSV cells are typed by the schema: numeric features are parsed as
/// finite floats, categorical features and the class field are kept as
/// text. Columns the schema does not name are ignored. JSON rows keep the
/// JSON type of each value (numbers are numeric, strings categorical) and
/// are checked against the schema when the tree is built.
///
/// By default every feature column and the class column must be present.
/// [`RowReader::queries`] drops the class column requirement for files of
/// rows to classify.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::UnsupportedFormat`] | Extension is neither `.csv` nor `.json` |
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::Json`] | Malformed JSON, or not an array of flat objects |
/// | [`IoError::MissingColumn`] | CSV header lacks a required column |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::InvalidNumber`] | Numeric cell is NaN, Inf, or unparseable float |
/// | [`IoError::EmptyDataset`] | Zero data rows |
pub struct RowReader<'a> {
    path: PathBuf,
    schema: &'a Schema,
    require_class: bool,
}

impl<'a> RowReader<'a> {
    /// Create a new reader for the given file path.
    pub fn new(path: &Path, schema: &'a Schema) -> Self {
        Self {
            path: path.to_path_buf(),
            schema,
            require_class: true,
        }
    }

    /// Read query rows: the class column may be absent.
    #[must_use]
    pub fn queries(mut self) -> Self {
        self.require_class = false;
        self
    }

    /// Read and type every row of the file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Vec<Row>, IoError> {
        let rows = match RowFormat::from_path(&self.path)? {
            RowFormat::Csv => self.read_csv()?,
            RowFormat::Json => read_json::<Vec<Row>>(&self.path)?,
        };

        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(n_rows = rows.len(), "rows loaded");
        Ok(rows)
    }

    fn read_csv(&self) -> Result<Vec<Row>, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) lets the InconsistentRowLength check fire instead of
        // a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");

        let column = |name: &str| header.iter().position(|h| h == name);

        // (column position, field name, kind) for every field to read.
        let mut fields: Vec<(usize, &str, ValueKind)> =
            Vec::with_capacity(self.schema.n_features() + 1);
        for spec in self.schema.features() {
            let pos = column(spec.name()).ok_or_else(|| IoError::MissingColumn {
                path: self.path.clone(),
                column: spec.name().to_string(),
            })?;
            fields.push((pos, spec.name(), spec.kind()));
        }
        let class_field = self.schema.class_field();
        match column(class_field) {
            Some(pos) => fields.push((pos, class_field, ValueKind::Categorical)),
            None if self.require_class => {
                return Err(IoError::MissingColumn {
                    path: self.path.clone(),
                    column: class_field.to_string(),
                });
            }
            None => {}
        }

        let mut rows = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let mut row = Row::new();
            for &(pos, name, kind) in &fields {
                let raw = record.get(pos).unwrap_or("");
                let value = match kind {
                    ValueKind::Categorical => Value::from(raw),
                    ValueKind::Numeric => match raw.parse::<f64>() {
                        Ok(v) if v.is_finite() => Value::Numeric(v),
                        _ => {
                            return Err(IoError::InvalidNumber {
                                path: self.path.clone(),
                                row_index,
                                column: name.to_string(),
                                raw: raw.to_string(),
                            });
                        }
                    },
                };
                row.insert(name, value);
            }
            rows.push(row);
        }

        Ok(rows)
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
