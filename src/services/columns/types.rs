use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::{AnyValue, DataFrame, TimeUnit};
use serde::Serialize;
use serde_json::Value;

use super::processor::create_dataframe;
use crate::error::{AppError, Result};

/// Days between 0001-01-01 and 1970-01-01 in the proleptic Gregorian calendar.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A single table cell. Missing is always explicit: `Null`, or a NaN float
/// coming from a native DataFrame column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Datetime(NaiveDateTime),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn from_any_value(value: AnyValue<'_>) -> Cell {
        match value {
            AnyValue::Null => Cell::Null,
            AnyValue::Boolean(b) => Cell::Bool(b),
            AnyValue::Int32(v) => Cell::Int(v.into()),
            AnyValue::Int64(v) => Cell::Int(v),
            AnyValue::UInt32(v) => Cell::Int(v.into()),
            AnyValue::UInt64(v) => i64::try_from(v)
                .map(Cell::Int)
                .unwrap_or_else(|_| Cell::Text(v.to_string())),
            AnyValue::Float32(v) => Cell::Float(v.into()),
            AnyValue::Float64(v) => Cell::Float(v),
            AnyValue::String(s) => Cell::Text(s.to_string()),
            AnyValue::Date(days) => match date_from_days(days) {
                Some(date) => Cell::Date(date),
                None => Cell::Int(days.into()),
            },
            AnyValue::Datetime(v, unit, _) => match datetime_from_timestamp(v, unit) {
                Some(dt) => Cell::Datetime(dt),
                None => Cell::Int(v),
            },
            // narrow integer widths only exist behind extra polars dtype features
            other if other.dtype().is_integer() => other
                .extract::<i64>()
                .map(Cell::Int)
                .unwrap_or_else(|| Cell::Text(other.to_string())),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "null"),
            // capitalized, so a `true` cell and a "True" text cell collapse
            Cell::Bool(true) => write!(f, "True"),
            Cell::Bool(false) => write!(f, "False"),
            Cell::Int(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" on whole floats
            Cell::Float(v) => write!(f, "{:?}", v),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Date(d) => write!(f, "{}", d),
            Cell::Datetime(dt) => write!(f, "{}", dt),
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Cell::Int(i),
                (None, Some(f)) => Cell::Float(f),
                (None, None) => Cell::Text(n.to_string()),
            },
            Value::String(s) => Cell::Text(s),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Int(value.into())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::Datetime(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Null, Into::into)
    }
}

pub fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

pub fn days_from_date(date: &NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn datetime_from_timestamp(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let (ticks_per_second, nanos_per_tick) = match unit {
        TimeUnit::Nanoseconds => (1_000_000_000, 1),
        TimeUnit::Microseconds => (1_000_000, 1_000),
        TimeUnit::Milliseconds => (1_000, 1_000_000),
    };
    let secs = value.div_euclid(ticks_per_second);
    let nanos = u32::try_from(value.rem_euclid(ticks_per_second) * nanos_per_tick).ok()?;
    DateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
}

/// Ordered mapping from column name to its values. Keys keep insertion order;
/// inserting an existing key replaces its values in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    entries: Vec<(String, Vec<Cell>)>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K, I, V>(&mut self, key: K, values: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Cell>,
    {
        let key = key.into();
        let values: Vec<Cell> = values.into_iter().map(Into::into).collect();
        match self.entries.iter().position(|(name, _)| *name == key) {
            Some(idx) => self.entries[idx].1 = values,
            None => self.entries.push((key, values)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[Cell]> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Cell])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Parses a JSON object whose members are arrays, e.g. `{"a": [1, null]}`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(AppError::InvalidInput(format!(
                    "Expected a JSON object of columns, got {}",
                    json_kind(&other)
                )))
            }
        };

        let mut columns = ColumnMap::new();
        for (key, values) in object {
            match values {
                Value::Array(values) => columns.insert(key, values),
                other => {
                    return Err(AppError::InvalidInput(format!(
                        "Column '{}' must be a JSON array, got {}",
                        key,
                        json_kind(&other)
                    )))
                }
            }
        }
        Ok(columns)
    }

    pub fn into_frame(self) -> Result<DataFrame> {
        create_dataframe(self)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<K, I, V> FromIterator<(K, I)> for ColumnMap
where
    K: Into<String>,
    I: IntoIterator<Item = V>,
    V: Into<Cell>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut columns = ColumnMap::new();
        for (key, values) in iter {
            columns.insert(key, values);
        }
        columns
    }
}

impl IntoIterator for ColumnMap {
    type Item = (String, Vec<Cell>);
    type IntoIter = std::vec::IntoIter<(String, Vec<Cell>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Input accepted by the summarizer: a native frame, or a mapping that is
/// coerced into one first.
#[derive(Debug, Clone)]
pub enum Dataset {
    Frame(DataFrame),
    Mapping(ColumnMap),
}

impl Dataset {
    pub fn into_frame(self) -> Result<DataFrame> {
        match self {
            Dataset::Frame(df) => Ok(df),
            Dataset::Mapping(columns) => columns.into_frame(),
        }
    }
}

impl From<DataFrame> for Dataset {
    fn from(df: DataFrame) -> Self {
        Dataset::Frame(df)
    }
}

impl From<ColumnMap> for Dataset {
    fn from(columns: ColumnMap) -> Self {
        Dataset::Mapping(columns)
    }
}
