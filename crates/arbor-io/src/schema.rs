//! JSON schema loading.

use std::path::Path;

use arbor_tree::Schema;
use serde::de::DeserializeOwned;
use tracing::{info, instrument};

use crate::IoError;

/// Load a [`Schema`] from a JSON file.
///
/// ```json
/// {
///   "class_field": "completed",
///   "features": [
///     { "name": "marks", "kind": "categorical" },
///     { "name": "income", "kind": "numeric" }
///   ]
/// }
/// ```
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::Json`] | Malformed JSON, unknown kind, or an invalid schema |
#[instrument(fields(path = %path.display()))]
pub fn load_schema(path: &Path) -> Result<Schema, IoError> {
    let schema: Schema = read_json(path)?;
    info!(
        class_field = schema.class_field(),
        n_features = schema.n_features(),
        "schema loaded"
    );
    Ok(schema)
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, IoError> {
    let text = std::fs::read_to_string(path).map_err(|e| IoError::FileNotFound {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| IoError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}
