use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::pretty::pretty_format_batches;

use super::model::{ColumnKind, Dataset, Value};

// ---------------------------------------------------------------------------
// Dataset → Arrow RecordBatch
// ---------------------------------------------------------------------------

/// Convert a dataset into a single Arrow batch, one typed array per column.
pub fn to_record_batch(dataset: &Dataset) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(dataset.width());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(dataset.width());

    for (idx, name) in dataset.column_names.iter().enumerate() {
        let (data_type, array) = column_array(dataset, idx);
        fields.push(Field::new(name, data_type, true));
        arrays.push(array);
    }

    let options = RecordBatchOptions::new().with_row_count(Some(dataset.len()));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)
        .context("building record batch")
}

fn column_array(dataset: &Dataset, idx: usize) -> (DataType, ArrayRef) {
    let cells = || dataset.column_at(idx);
    match dataset.column_kind(idx) {
        ColumnKind::Integer => {
            let values: Vec<Option<i64>> = cells()
                .map(|v| match v {
                    Value::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect();
            (DataType::Int64, Arc::new(Int64Array::from(values)) as ArrayRef)
        }
        ColumnKind::Float => {
            let values: Vec<Option<f64>> = cells().map(Value::as_f64).collect();
            (DataType::Float64, Arc::new(Float64Array::from(values)) as ArrayRef)
        }
        ColumnKind::Bool => {
            let values: Vec<Option<bool>> = cells()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            (DataType::Boolean, Arc::new(BooleanArray::from(values)) as ArrayRef)
        }
        ColumnKind::Text | ColumnKind::Empty => {
            let values: Vec<Option<String>> = cells()
                .map(|v| (!v.is_null()).then(|| v.to_string()))
                .collect();
            (DataType::Utf8, Arc::new(StringArray::from(values)) as ArrayRef)
        }
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// Render the dataset as a bordered text grid for terminal output.
pub fn render(dataset: &Dataset) -> Result<String> {
    let batch = to_record_batch(dataset)?;
    let table = pretty_format_batches(&[batch]).context("formatting preview")?;
    Ok(table.to_string())
}
