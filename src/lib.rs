//! Clean Stats - numeric and tabular summary utilities.
//!
//! * [`numbers`]: random integer sequences, their average and maximum.
//! * [`data`]: load a table (CSV / JSON / Parquet, local or over HTTP),
//!   summarise a column and filter rows by category.

pub mod data;
pub mod numbers;
