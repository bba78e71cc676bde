//! Column summary statistics over a loaded [`Dataset`].

use std::cmp::Ordering;

use super::error::DataError;
use super::model::{ColumnKind, Dataset, Value};

/// Non-null cells of `column`, or the reason there are none to summarise.
fn present_values<'a>(dataset: &'a Dataset, column: &str) -> Result<Vec<&'a Value>, DataError> {
    let cells = dataset
        .column(column)
        .ok_or_else(|| DataError::column_not_found(column))?;

    let values: Vec<&Value> = cells.filter(|v| !v.is_null()).collect();
    if values.is_empty() {
        return Err(DataError::empty_column(column));
    }
    Ok(values)
}

/// Arithmetic mean of the non-null cells in `column`.
pub fn calculate_column_mean(dataset: &Dataset, column: &str) -> Result<f64, DataError> {
    let values = present_values(dataset, column)?;

    let numbers = values
        .iter()
        .map(|v| v.as_f64())
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| DataError::NonNumericColumn {
            column: column.to_string(),
        })?;

    let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
    log::debug!("mean of {column} over {} values = {mean}", numbers.len());
    Ok(mean)
}

/// Largest non-null cell in `column`.
///
/// Numeric columns compare on the number line and return the winning cell
/// unchanged (an integer column yields an `Integer`). String columns compare
/// lexicographically, boolean columns with `false < true`.
pub fn find_column_max(dataset: &Dataset, column: &str) -> Result<Value, DataError> {
    let values = present_values(dataset, column)?;

    let kind = ColumnKind::of(values.iter().copied());
    let comparable = match kind {
        ColumnKind::Integer | ColumnKind::Float | ColumnKind::Bool => true,
        // Text is comparable only when every cell really is a string.
        ColumnKind::Text => values.iter().all(|v| matches!(v, Value::String(_))),
        ColumnKind::Empty => false,
    };
    if !comparable {
        return Err(DataError::IncomparableValues {
            column: column.to_string(),
        });
    }

    let max = values
        .into_iter()
        .max_by(|a, b| compare_cells(a, b))
        .cloned()
        .ok_or_else(|| DataError::empty_column(column))?;
    log::debug!("max of {column} = {max}");
    Ok(max)
}

/// Order two cells of a column already known to be comparable.
fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
    }
}
