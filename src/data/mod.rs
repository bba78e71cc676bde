/// Tabular layer: core types, loading, statistics, filtering and preview.
///
/// Architecture:
/// ```text
///  URL / path (.csv / .json / .parquet)
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  fetch + parse → Dataset (EmptyData if no rows)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  column names, Vec<Row> of Value cells
///   └──────────┘
///     │      │
///     ▼      ▼
///  ┌──────┐ ┌────────┐
///  │stats │ │ filter │  column mean / max, exact-match rows (≤ limit)
///  └──────┘ └────────┘
///               │
///               ▼
///          ┌─────────┐
///          │ preview │  Arrow RecordBatch → text grid
///          └─────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod preview;
pub mod stats;

pub use error::DataError;
pub use filter::{filter_by_category, DEFAULT_FILTER_LIMIT};
pub use loader::load_data;
pub use model::{ColumnKind, Dataset, Row, Value};
pub use stats::{calculate_column_mean, find_column_max};
