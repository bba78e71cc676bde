use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell in a dataset column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            // Debug keeps the trailing ".0" on whole floats.
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Value {
    /// Interpret the value as an `f64` when it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view used for matching, with `true`/`false` as 1/0.
    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => self.as_f64(),
        }
    }

    /// Cell equality as a dataframe sees it: integers, floats and booleans
    /// compare numerically (`true == 1`), and `Null` never matches anything,
    /// itself included.
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => false,
            _ => match (self.as_number(), other.as_number()) {
                (Some(x), Some(y)) => x == y,
                _ => self == other,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnKind – the logical type of a whole column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    /// Floats, or integers mixed with floats.
    Float,
    Bool,
    /// Strings, or any mix that is not purely numeric / boolean.
    Text,
    /// Every cell is null (or there are no rows).
    Empty,
}

impl ColumnKind {
    /// Fold the non-null cells of a column into a single kind.
    pub fn of<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        values
            .into_iter()
            .fold(ColumnKind::Empty, |kind, value| {
                use ColumnKind::*;
                match (kind, value) {
                    (_, Value::Null) => kind,
                    (Empty, Value::Integer(_)) => Integer,
                    (Empty, Value::Float(_)) => Float,
                    (Empty, Value::Bool(_)) => Bool,
                    (Integer, Value::Integer(_)) => Integer,
                    (Integer | Float, Value::Integer(_) | Value::Float(_)) => Float,
                    (Bool, Value::Bool(_)) => Bool,
                    _ => Text,
                }
            })
    }
}

// ---------------------------------------------------------------------------
// Row – one record of the dataset
// ---------------------------------------------------------------------------

/// One record, with cells aligned to `Dataset::column_names`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    /// Cell at `index`, `Null` when the row is shorter than the schema.
    pub fn get(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An in-memory table: ordered column names and ordered rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Column names in source order.
    pub column_names: Vec<String>,
    /// All rows in source order.
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset, padding short rows with `Null` so every row lines
    /// up with the schema.
    pub fn new(column_names: Vec<String>, rows: Vec<Row>) -> Self {
        let width = column_names.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.values.resize(width, Value::Null);
                row
            })
            .collect();
        Dataset { column_names, rows }
    }

    /// An empty dataset sharing this dataset's schema.
    pub fn empty_like(&self) -> Self {
        Dataset {
            column_names: self.column_names.clone(),
            rows: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.column_names.len()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == column)
    }

    /// Iterate over the cells of one column, in row order.
    pub fn column(&self, column: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(column)?;
        Some(self.column_at(idx))
    }

    pub fn column_at(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| row.get(index))
    }

    pub fn column_kind(&self, index: usize) -> ColumnKind {
        ColumnKind::of(self.column_at(index))
    }
}
