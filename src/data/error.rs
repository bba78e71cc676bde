use thiserror::Error;

/// Failures surfaced by the tabular utilities.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to load data from {location}")]
    LoadFailure {
        location: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Loaded data is empty")]
    EmptyData,
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },
    #[error("Column '{column}' contains no data")]
    EmptyColumn { column: String },
    #[error("Column '{column}' contains non-numeric data")]
    NonNumericColumn { column: String },
    #[error("Column '{column}' mixes values that cannot be compared")]
    IncomparableValues { column: String },
}

impl DataError {
    pub(crate) fn column_not_found(column: &str) -> Self {
        DataError::ColumnNotFound {
            column: column.to_string(),
        }
    }

    pub(crate) fn empty_column(column: &str) -> Self {
        DataError::EmptyColumn {
            column: column.to_string(),
        }
    }
}
