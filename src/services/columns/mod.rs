pub mod analyzer;
pub mod processor;
pub mod types;
pub mod utils;

pub use analyzer::{describe, describe_columns, ColumnAnalyzer};
pub use processor::{create_dataframe, ColumnKind};
pub use types::{Cell, ColumnMap, Dataset};
