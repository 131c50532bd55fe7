//! Column-level summaries for quick exploration of an unfamiliar table.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use error::{AppError, Result};
pub use models::{ColumnSummary, Description};
pub use services::columns::{describe, describe_columns, Cell, ColumnAnalyzer, ColumnMap, Dataset};
