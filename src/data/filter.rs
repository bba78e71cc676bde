use super::error::DataError;
use super::model::{Dataset, Value};

/// Row cap used when the caller has no preference.
pub const DEFAULT_FILTER_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Exact-match filter on a categorical column
// ---------------------------------------------------------------------------

/// Return indices of rows whose `column` cell equals `value`, in row order.
///
/// Matching follows [`Value::matches`]: integers and floats compare
/// numerically and a null cell never matches.
pub fn matching_indices(
    dataset: &Dataset,
    column: &str,
    value: &Value,
) -> Result<Vec<usize>, DataError> {
    let idx = dataset
        .column_index(column)
        .ok_or_else(|| DataError::column_not_found(column))?;

    Ok(dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.get(idx).matches(value))
        .map(|(i, _)| i)
        .collect())
}

/// Keep the first `limit` rows (in original order) whose `column` equals
/// `value`. No match yields an empty dataset with the same columns.
pub fn filter_by_category(
    dataset: &Dataset,
    column: &str,
    value: &Value,
    limit: usize,
) -> Result<Dataset, DataError> {
    let indices = matching_indices(dataset, column, value)?;
    log::debug!(
        "filter {column} == {value}: {} of {} rows match, keeping at most {limit}",
        indices.len(),
        dataset.len()
    );

    let mut filtered = dataset.empty_like();
    filtered.rows = indices
        .into_iter()
        .take(limit)
        .map(|i| dataset.rows[i].clone())
        .collect();
    Ok(filtered)
}
