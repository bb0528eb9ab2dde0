//! `field=value` query parsing.

use arbor_tree::{Row, Schema, Value, ValueKind};

use crate::IoError;
use crate::error::QueryProblem;

/// Parse one `field=value` assignment, typing the value by the schema.
///
/// The field must be a feature of `schema`. Whitespace around the field
/// and the value is trimmed; everything after the first `=` is the value,
/// so categorical values such as `>=65` parse as written (`marks=>=65`).
///
/// # Errors
///
/// Returns [`IoError::InvalidQuery`] with the [`QueryProblem`] when the
/// `=` is missing, the field is not a feature, or a numeric feature is
/// given something other than a finite number.
pub fn parse_assignment(input: &str, schema: &Schema) -> Result<(String, Value), IoError> {
    let invalid = |reason| IoError::InvalidQuery {
        input: input.to_string(),
        reason,
    };

    let (field, raw) = input
        .split_once('=')
        .ok_or_else(|| invalid(QueryProblem::MissingEquals))?;
    let (field, raw) = (field.trim(), raw.trim());

    let value = match schema.kind_of(field) {
        None => return Err(invalid(QueryProblem::UnknownFeature)),
        Some(ValueKind::Categorical) => Value::from(raw),
        Some(ValueKind::Numeric) => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Value::Numeric(v),
            _ => return Err(invalid(QueryProblem::NotANumber)),
        },
    };
    Ok((field.to_string(), value))
}

/// Parse a list of assignments into one query row. Later assignments to
/// the same field replace earlier ones.
///
/// # Errors
///
/// The first error from [`parse_assignment`].
pub fn parse_query<'s, I>(assignments: I, schema: &Schema) -> Result<Row, IoError>
where
    I: IntoIterator<Item = &'s str>,
{
    let mut row = Row::new();
    for input in assignments {
        let (field, value) = parse_assignment(input, schema)?;
        row.insert(field, value);
    }
    Ok(row)
}
