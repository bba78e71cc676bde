use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use url::Url;

use super::error::DataError;
use super::model::{ColumnKind, Dataset, Row, Value};

/// Cell texts treated as missing, as pandas' `read_csv` does by default.
const NA_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a URL or a local path.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – Parquet file with scalar columns
/// * `.json`            – `[{ "col": value, ... }, ...]`
/// * anything else      – CSV with a header row
///
/// Fetch and parse problems are reported as [`DataError::LoadFailure`]; a
/// table that parses but has no rows is [`DataError::EmptyData`].
pub fn load_data(location: &str) -> Result<Dataset, DataError> {
    log::info!("Loading dataset from {location}");

    let dataset = read_location(location).map_err(|source| DataError::LoadFailure {
        location: location.to_string(),
        source,
    })?;

    if dataset.is_empty() {
        return Err(DataError::EmptyData);
    }
    log::info!(
        "Loaded {} rows x {} columns from {location}",
        dataset.len(),
        dataset.width()
    );
    Ok(dataset)
}

fn read_location(location: &str) -> Result<Dataset> {
    let source = Source::parse(location)?;
    let format = Format::from_path(source.path());
    log::debug!("{location}: reading as {format:?}");

    let data = source.fetch()?;
    match format {
        Format::Csv => parse_csv(&data),
        Format::Json => parse_json(&data),
        Format::Parquet => parse_parquet(data),
    }
}

// ---------------------------------------------------------------------------
// Where the table lives
// ---------------------------------------------------------------------------

enum Source {
    Remote(Url),
    Local(PathBuf),
}

impl Source {
    fn parse(location: &str) -> Result<Self> {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Source::Remote(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Source::Local)
                .map_err(|()| anyhow::anyhow!("invalid file URL: {location}")),
            // Relative paths fail to parse; Windows drive letters parse as a
            // one-letter scheme. Both are filesystem paths.
            _ => Ok(Source::Local(PathBuf::from(location))),
        }
    }

    /// Path component used for format detection.
    fn path(&self) -> &Path {
        match self {
            Source::Remote(url) => Path::new(url.path()),
            Source::Local(path) => path.as_path(),
        }
    }

    fn fetch(&self) -> Result<Bytes> {
        match self {
            Source::Remote(url) => {
                let response = reqwest::blocking::get(url.clone())
                    .with_context(|| format!("requesting {url}"))?
                    .error_for_status()
                    .with_context(|| format!("fetching {url}"))?;
                response.bytes().context("reading response body")
            }
            Source::Local(path) => std::fs::read(path)
                .map(Bytes::from)
                .with_context(|| format!("reading {}", path.display())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
    Parquet,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "parquet" | "pq" => Format::Parquet,
            "json" => Format::Json,
            _ => Format::Csv,
        }
    }
}

/// Turn column-major cells into rows.
fn rows_from_columns(columns: Vec<Vec<Value>>, n_rows: usize) -> Vec<Vec<Value>> {
    let mut rows = vec![Vec::with_capacity(columns.len()); n_rows];
    for column in columns {
        for (row, value) in rows.iter_mut().zip(column) {
            row.push(value);
        }
    }
    rows
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Each column gets a single inferred kind (see [`infer_column`]).
fn parse_csv(data: &[u8]) -> Result<Dataset> {
    // Short rows are allowed and padded with nulls; long rows are rejected.
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let records = reader
        .records()
        .enumerate()
        .map(|(row_no, result)| {
            let record = result.with_context(|| format!("CSV row {row_no}"))?;
            if record.len() > headers.len() {
                bail!(
                    "CSV row {row_no}: {} fields but the header has {}",
                    record.len(),
                    headers.len()
                );
            }
            Ok(record)
        })
        .collect::<Result<Vec<_>>>()?;

    let columns: Vec<Vec<Value>> = (0..headers.len())
        .map(|idx| {
            let cells: Vec<&str> = records.iter().map(|r| r.get(idx).unwrap_or("")).collect();
            let values = infer_column(&cells);
            log::debug!("column {}: {:?}", headers[idx], ColumnKind::of(&values));
            values
        })
        .collect();

    let rows = rows_from_columns(columns, records.len())
        .into_iter()
        .map(Row::new)
        .collect();
    Ok(Dataset::new(headers, rows))
}

/// Float cell, with NaN in any spelling (`-nan`, `NAN`, ...) counted as missing.
fn float_value(f: f64) -> Value {
    if f.is_nan() {
        Value::Null
    } else {
        Value::Float(f)
    }
}

fn is_missing(cell: &str) -> bool {
    NA_MARKERS.contains(&cell)
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Pick one kind for the whole column: integer, then float, then boolean,
/// falling back to strings. Missing markers become `Null` whatever the kind.
fn infer_column(cells: &[&str]) -> Vec<Value> {
    let present = || cells.iter().copied().filter(|c| !is_missing(c));

    let kind = if present().all(|c| c.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if present().all(|c| c.parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else if present().all(|c| parse_bool(c).is_some()) {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    };

    cells
        .iter()
        .map(|&cell| {
            if is_missing(cell) {
                return Value::Null;
            }
            let parsed = match kind {
                ColumnKind::Integer => cell.parse().ok().map(Value::Integer),
                ColumnKind::Float => cell.parse().ok().map(float_value),
                ColumnKind::Bool => parse_bool(cell).map(Value::Bool),
                ColumnKind::Text | ColumnKind::Empty => None,
            };
            parsed.unwrap_or_else(|| Value::String(cell.to_string()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "sepal_length": 5.1, "species": "setosa" },
///   ...
/// ]
/// ```
///
/// Columns appear in first-seen key order; absent keys become `Null`.
fn parse_json(data: &[u8]) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_slice(data).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut column_names: Vec<String> = Vec::new();
    for obj in &records {
        for key in obj.keys() {
            if !column_names.contains(key) {
                column_names.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .map(|obj| {
            Row::new(
                column_names
                    .iter()
                    .map(|col| obj.get(col).map_or(Value::Null, json_to_value))
                    .collect(),
            )
        })
        .collect();

    Ok(Dataset::new(column_names, rows))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet table with scalar columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Column types without a direct `Value`
/// counterpart are kept as their Arrow display string.
fn parse_parquet(data: Bytes) -> Result<Dataset> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(data).context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch
            .columns()
            .iter()
            .zip(&column_names)
            .map(|(col, name)| column_values(col).with_context(|| format!("column '{name}'")))
            .collect::<Result<Vec<_>>>()?;

        rows.extend(
            rows_from_columns(columns, batch.num_rows())
                .into_iter()
                .map(Row::new),
        );
    }

    Ok(Dataset::new(column_names, rows))
}

/// Extract every cell of an Arrow column as a [`Value`].
fn column_values(col: &ArrayRef) -> Result<Vec<Value>> {
    let values = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .context("expected StringArray")?
            .iter()
            .map(|v| v.map_or(Value::Null, Value::from))
            .collect(),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .context("expected LargeStringArray")?
            .iter()
            .map(|v| v.map_or(Value::Null, Value::from))
            .collect(),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .context("expected Int32Array")?
            .iter()
            .map(|v| v.map_or(Value::Null, |i| Value::Integer(i as i64)))
            .collect(),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .context("expected Int64Array")?
            .iter()
            .map(|v| v.map_or(Value::Null, Value::Integer))
            .collect(),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .context("expected Float32Array")?
            .iter()
            .map(|v| v.map_or(Value::Null, |f| float_value(f as f64)))
            .collect(),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .context("expected Float64Array")?
            .iter()
            .map(|v| v.map_or(Value::Null, float_value))
            .collect(),
        DataType::Boolean => col
            .as_boolean_opt()
            .context("expected BooleanArray")?
            .iter()
            .map(|v| v.map_or(Value::Null, Value::Bool))
            .collect(),
        other => {
            log::debug!("keeping {other:?} column as display strings");
            (0..col.len())
                .map(|row| {
                    if col.is_null(row) {
                        Ok(Value::Null)
                    } else {
                        array_value_to_string(col.as_ref(), row)
                            .map(Value::String)
                            .with_context(|| format!("formatting row {row}"))
                    }
                })
                .collect::<Result<Vec<_>>>()?
        }
    };
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::NamedTempFile;

    use crate::data::stats::{calculate_column_mean, find_column_max};

    const IRIS_HEAD: &str = "\
sepal_length,sepal_width,petal_length,petal_width,species
5.1,3.5,1.4,0.2,setosa
4.9,3.0,1.4,0.2,setosa
7.0,3.2,4.7,1.4,versicolor
6.3,3.3,6.0,2.5,virginica
";

    fn temp_file(suffix: &str, contents: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(contents).expect("write temp file");
        file.flush().expect("flush temp file");
        file
    }

    fn location(file: &NamedTempFile) -> String {
        file.path().to_string_lossy().into_owned()
    }

    #[test]
    fn loads_csv_with_inferred_columns() {
        let file = temp_file(".csv", IRIS_HEAD.as_bytes());
        let ds = load_data(&location(&file)).unwrap();

        assert_eq!(ds.len(), 4);
        assert_eq!(
            ds.column_names,
            vec!["sepal_length", "sepal_width", "petal_length", "petal_width", "species"]
        );
        assert_eq!(ds.rows[0].values[0], Value::Float(5.1));
        assert_eq!(ds.rows[3].values[4], Value::from("virginica"));
        assert_eq!(ds.column_kind(3), ColumnKind::Float);
        assert_eq!(ds.column_kind(4), ColumnKind::Text);
    }

    #[test]
    fn csv_inference_handles_missing_and_integer_columns() {
        let file = temp_file(
            ".csv",
            b"id,score,flag,label\n1,2.5,true,a\n2,NA,False,\n3,4,true,7\n",
        );
        let ds = load_data(&location(&file)).unwrap();

        let ids: Vec<_> = ds.column("id").unwrap().cloned().collect();
        assert_eq!(ids, vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);

        let scores: Vec<_> = ds.column("score").unwrap().cloned().collect();
        assert_eq!(scores, vec![Value::Float(2.5), Value::Null, Value::Float(4.0)]);

        let flags: Vec<_> = ds.column("flag").unwrap().cloned().collect();
        assert_eq!(
            flags,
            vec![Value::Bool(true), Value::Bool(false), Value::Bool(true)]
        );

        // A numeric-looking cell in a text column stays a string.
        let labels: Vec<_> = ds.column("label").unwrap().cloned().collect();
        assert_eq!(labels, vec![Value::from("a"), Value::Null, Value::from("7")]);
    }

    #[test]
    fn header_only_csv_is_empty_data() {
        let file = temp_file(".csv", b"sepal_length,species\n");
        assert!(matches!(
            load_data(&location(&file)),
            Err(DataError::EmptyData)
        ));
    }

    #[test]
    fn blank_file_is_empty_data() {
        let file = temp_file(".csv", b"");
        assert!(matches!(
            load_data(&location(&file)),
            Err(DataError::EmptyData)
        ));
    }

    #[test]
    fn overlong_csv_row_is_load_failure() {
        let file = temp_file(".csv", b"a,b\n1,2\n3,4,5\n");
        let err = load_data(&location(&file)).unwrap_err();
        assert!(matches!(err, DataError::LoadFailure { .. }));
        assert!(err.to_string().starts_with("Failed to load data from"));
    }

    #[test]
    fn short_csv_rows_are_padded_with_null() {
        let file = temp_file(".csv", b"a,b,c\n1,2,x\n3\n");
        let ds = load_data(&location(&file)).unwrap();
        assert_eq!(
            ds.rows[1].values,
            vec![Value::Integer(3), Value::Null, Value::Null]
        );
        assert_eq!(calculate_column_mean(&ds, "b").unwrap(), 2.0);
    }

    #[test]
    fn nan_spellings_are_missing_values() {
        let file = temp_file(".csv", b"x\n1.5\n-nan\n2.5\nNAN\n+nan\n");
        let ds = load_data(&location(&file)).unwrap();

        let xs: Vec<_> = ds.column("x").unwrap().cloned().collect();
        assert_eq!(
            xs,
            vec![
                Value::Float(1.5),
                Value::Null,
                Value::Float(2.5),
                Value::Null,
                Value::Null
            ]
        );
        assert_eq!(calculate_column_mean(&ds, "x").unwrap(), 2.0);
        assert_eq!(find_column_max(&ds, "x").unwrap(), Value::Float(2.5));
    }

    #[test]
    fn missing_file_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = load_data(&path.to_string_lossy()).unwrap_err();
        match err {
            DataError::LoadFailure { location, .. } => {
                assert_eq!(location, path.to_string_lossy())
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unreachable_url_is_load_failure() {
        // Nothing listens on port 9 locally, so the connection is refused.
        let err = load_data("http://127.0.0.1:9/iris.csv").unwrap_err();
        assert!(matches!(err, DataError::LoadFailure { .. }));
    }

    #[test]
    fn file_url_is_read_from_disk() {
        let file = temp_file(".csv", IRIS_HEAD.as_bytes());
        let url = Url::from_file_path(file.path()).unwrap();
        let ds = load_data(url.as_str()).unwrap();
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn loads_json_records() {
        let json = r#"[
            {"sepal_length": 5.1, "count": 3, "species": "setosa"},
            {"sepal_length": 7.0, "species": "versicolor", "extra": true}
        ]"#;
        let file = temp_file(".json", json.as_bytes());
        let ds = load_data(&location(&file)).unwrap();

        assert_eq!(ds.column_names, vec!["sepal_length", "count", "species", "extra"]);
        assert_eq!(
            ds.rows[1].values,
            vec![
                Value::Float(7.0),
                Value::Null,
                Value::from("versicolor"),
                Value::Bool(true)
            ]
        );
    }

    #[test]
    fn empty_json_array_is_empty_data() {
        let file = temp_file(".json", b"[]");
        assert!(matches!(
            load_data(&location(&file)),
            Err(DataError::EmptyData)
        ));
    }

    #[test]
    fn non_array_json_is_load_failure() {
        let file = temp_file(".json", br#"{"species": "setosa"}"#);
        assert!(matches!(
            load_data(&location(&file)),
            Err(DataError::LoadFailure { .. })
        ));
    }

    #[test]
    fn loads_parquet_table() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("sepal_length", DataType::Float64, true),
            Field::new("count", DataType::Int64, false),
            Field::new("species", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![Some(5.1), None])),
                Arc::new(Int64Array::from(vec![3, 4])),
                Arc::new(StringArray::from(vec![Some("setosa"), Some("virginica")])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .unwrap();
        let handle = file.as_file().try_clone().unwrap();
        let mut writer = ArrowWriter::try_new(handle, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_data(&location(&file)).unwrap();
        assert_eq!(ds.column_names, vec!["sepal_length", "count", "species"]);
        assert_eq!(
            ds.rows[0].values,
            vec![Value::Float(5.1), Value::Integer(3), Value::from("setosa")]
        );
        assert_eq!(ds.rows[1].values[0], Value::Null);
    }

    #[test]
    fn parquet_nan_floats_are_missing_values() {
        let schema = Arc::new(Schema::new(vec![Field::new("x", DataType::Float64, true)]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(Float64Array::from(vec![1.0, f64::NAN, 3.0]))],
        )
        .unwrap();

        let file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .unwrap();
        let handle = file.as_file().try_clone().unwrap();
        let mut writer = ArrowWriter::try_new(handle, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_data(&location(&file)).unwrap();
        assert_eq!(ds.rows[1].values, vec![Value::Null]);
        assert_eq!(calculate_column_mean(&ds, "x").unwrap(), 2.0);
        assert_eq!(find_column_max(&ds, "x").unwrap(), Value::Float(3.0));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(Format::from_path(Path::new("a/b.PARQUET")), Format::Parquet);
        assert_eq!(Format::from_path(Path::new("b.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("iris.csv")), Format::Csv);
        assert_eq!(Format::from_path(Path::new("no_extension")), Format::Csv);
    }
}
