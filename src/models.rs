use polars::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::services::columns::utils::format_na;
use crate::services::columns::Cell;

pub const COLUMN_NAME: &str = "column name";
pub const DATA_TYPE: &str = "data type";
pub const NB_UNIQUE: &str = "nb unique values";
pub const NB_NA: &str = "nb NA values";
pub const VALUE_SAMPLE: &str = "value sample";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column_name: String,
    pub data_type: String,
    pub nb_unique: usize,
    pub na_count: usize,
    pub na_percent: u64,
    pub value_sample: Option<Cell>,
}

impl ColumnSummary {
    /// Missing count with its share of rows, e.g. `1 (33%)`.
    pub fn nb_na(&self) -> String {
        format_na(self.na_count, self.na_percent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnSummary>,
}

impl Description {
    pub fn get(&self, column_name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column_name == column_name)
    }

    /// One row per described column. Samples are rendered as text since a
    /// column's samples may differ in type.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let names: Vec<&str> = self.columns.iter().map(|c| c.column_name.as_str()).collect();
        let types: Vec<&str> = self.columns.iter().map(|c| c.data_type.as_str()).collect();
        let uniques: Vec<u64> = self.columns.iter().map(|c| c.nb_unique as u64).collect();
        let nas: Vec<String> = self.columns.iter().map(ColumnSummary::nb_na).collect();
        let samples: Vec<Option<String>> = self
            .columns
            .iter()
            .map(|c| c.value_sample.as_ref().map(ToString::to_string))
            .collect();

        let df = DataFrame::new(vec![
            Series::new(COLUMN_NAME, names),
            Series::new(DATA_TYPE, types),
            Series::new(NB_UNIQUE, uniques),
            Series::new(NB_NA, nas),
            Series::new(VALUE_SAMPLE, samples),
        ])?;
        Ok(df)
    }
}
