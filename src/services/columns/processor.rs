use polars::prelude::*;

use super::types::{days_from_date, Cell, ColumnMap};
use crate::error::{AppError, Result};

/// Label given to columns that hold several kinds of values.
pub const OBJECT_DTYPE: &str = "object";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Empty,
    Boolean,
    Integer,
    Float,
    Date,
    Datetime,
    Text,
    Mixed,
}

/// A mapped column after typing. `cells` are the values the column holds:
/// the input cells, with ints widened to floats in float columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedColumn {
    pub name: String,
    pub kind: ColumnKind,
    pub dtype: DataType,
    pub cells: Vec<Cell>,
}

impl TypedColumn {
    pub fn new(name: String, values: Vec<Cell>) -> Self {
        let kind = detect_column_type(&values);
        let dtype = native_dtype(kind, &values);
        let cells = match kind {
            ColumnKind::Float => values
                .into_iter()
                .map(|v| match v {
                    Cell::Int(i) => Cell::Float(i as f64),
                    other => other,
                })
                .collect(),
            _ => values,
        };

        Self {
            name,
            kind,
            dtype,
            cells,
        }
    }

    pub fn data_type_label(&self) -> String {
        match self.kind {
            ColumnKind::Mixed => OBJECT_DTYPE.to_string(),
            _ => self.dtype.to_string(),
        }
    }

    /// Mixed columns have no native polars dtype here and are stored as the
    /// string form of each cell.
    pub fn to_series(&self) -> Result<Series> {
        build_series(&self.name, &self.cells, &self.dtype)
    }
}

/// Checks that every key holds the same number of values and types each
/// column. Returns the row count alongside the columns in key order.
pub fn type_columns(columns: ColumnMap) -> Result<(usize, Vec<TypedColumn>)> {
    let row_count = columns.iter().next().map_or(0, |(_, values)| values.len());
    let ragged = columns
        .iter()
        .find(|(_, values)| values.len() != row_count);
    if let Some((name, values)) = ragged {
        return Err(AppError::InvalidInput(format!(
            "All columns must have the same length: column '{}' has {} values, expected {}",
            name,
            values.len(),
            row_count
        )));
    }

    tracing::debug!(
        "Typing {} mapped columns of {} rows",
        columns.len(),
        row_count
    );

    let typed = columns
        .into_iter()
        .map(|(name, values)| TypedColumn::new(name, values))
        .collect();
    Ok((row_count, typed))
}

/// Builds a frame whose columns follow the mapping's key order.
pub fn create_dataframe(columns: ColumnMap) -> Result<DataFrame> {
    let (_, typed) = type_columns(columns)?;
    let series = typed
        .iter()
        .map(TypedColumn::to_series)
        .collect::<Result<Vec<_>>>()?;

    DataFrame::new(series)
        .map_err(|e| AppError::InvalidInput(format!("Failed to create DataFrame: {}", e)))
}

/// Picks the narrowest native type that holds every non-missing cell.
pub fn detect_column_type(values: &[Cell]) -> ColumnKind {
    let (mut bools, mut ints, mut floats, mut texts) = (0, 0, 0, 0);
    let (mut dates, mut datetimes, mut total) = (0, 0, 0);
    let any_float = values.iter().any(|v| matches!(v, Cell::Float(_)));

    for value in values.iter().filter(|v| !v.is_missing()) {
        total += 1;
        match value {
            Cell::Bool(_) => bools += 1,
            Cell::Int(_) => ints += 1,
            Cell::Float(_) => floats += 1,
            Cell::Text(_) => texts += 1,
            Cell::Date(_) => dates += 1,
            Cell::Datetime(_) => datetimes += 1,
            Cell::Null => {}
        }
    }

    match () {
        // NaN cells still make a float column
        _ if total == 0 && any_float => ColumnKind::Float,
        _ if total == 0 => ColumnKind::Empty,
        _ if bools == total => ColumnKind::Boolean,
        _ if ints == total && !any_float => ColumnKind::Integer,
        _ if ints + floats == total => ColumnKind::Float,
        _ if texts == total => ColumnKind::Text,
        _ if dates == total => ColumnKind::Date,
        _ if datetimes == total => ColumnKind::Datetime,
        _ => ColumnKind::Mixed,
    }
}

fn native_dtype(kind: ColumnKind, values: &[Cell]) -> DataType {
    match kind {
        ColumnKind::Empty => DataType::Null,
        ColumnKind::Boolean => DataType::Boolean,
        ColumnKind::Integer => DataType::Int64,
        ColumnKind::Float => DataType::Float64,
        ColumnKind::Date => DataType::Date,
        ColumnKind::Datetime => DataType::Datetime(datetime_unit(values), None),
        ColumnKind::Text | ColumnKind::Mixed => DataType::String,
    }
}

/// Nanoseconds unless a value falls outside the i64 nanosecond range
/// (roughly 1677..2262).
fn datetime_unit(values: &[Cell]) -> TimeUnit {
    let fits_nanos = values.iter().all(|v| match v {
        Cell::Datetime(dt) => dt.and_utc().timestamp_nanos_opt().is_some(),
        _ => true,
    });
    if fits_nanos {
        TimeUnit::Nanoseconds
    } else {
        TimeUnit::Microseconds
    }
}

fn build_series(name: &str, cells: &[Cell], dtype: &DataType) -> Result<Series> {
    let series = match dtype {
        DataType::Null => Series::full_null(name, cells.len(), &DataType::Null),
        DataType::Boolean => {
            let bools: Vec<Option<bool>> = cells
                .iter()
                .map(|v| match v {
                    Cell::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            Series::new(name, bools)
        }
        DataType::Int64 => {
            let ints: Vec<Option<i64>> = cells
                .iter()
                .map(|v| match v {
                    Cell::Int(i) => Some(*i),
                    _ => None,
                })
                .collect();
            Series::new(name, ints)
        }
        DataType::Float64 => {
            let nums: Vec<Option<f64>> = cells
                .iter()
                .map(|v| match v {
                    Cell::Float(f) if !f.is_nan() => Some(*f),
                    _ => None,
                })
                .collect();
            Series::new(name, nums)
        }
        DataType::Date => {
            let days: Vec<Option<i32>> = cells
                .iter()
                .map(|v| match v {
                    Cell::Date(d) => Some(days_from_date(d)),
                    _ => None,
                })
                .collect();
            Series::new(name, days).cast(&DataType::Date)?
        }
        DataType::Datetime(unit, _) => {
            let ticks: Vec<Option<i64>> = cells
                .iter()
                .map(|v| match v {
                    Cell::Datetime(dt) => match unit {
                        TimeUnit::Nanoseconds => dt.and_utc().timestamp_nanos_opt(),
                        TimeUnit::Microseconds => Some(dt.and_utc().timestamp_micros()),
                        TimeUnit::Milliseconds => Some(dt.and_utc().timestamp_millis()),
                    },
                    _ => None,
                })
                .collect();
            Series::new(name, ticks).cast(dtype)?
        }
        _ => {
            let strings: Vec<Option<String>> = cells
                .iter()
                .map(|v| if v.is_missing() { None } else { Some(v.to_string()) })
                .collect();
            Series::new(name, strings)
        }
    };

    Ok(series)
}
