use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::processor::type_columns;
use super::types::{Cell, ColumnMap, Dataset};
use super::utils::{count_unique, na_percentage, series_cells};
use crate::config::Config;
use crate::error::Result;
use crate::models::{ColumnSummary, Description};

/// Summarizes every column of a table: native dtype, distinct count, missing
/// count and one random non-missing value.
#[derive(Debug, Clone, Default)]
pub struct ColumnAnalyzer {
    sample_seed: Option<u64>,
}

impl ColumnAnalyzer {
    pub fn new(config: &Config) -> Self {
        Self {
            sample_seed: config.sample_seed,
        }
    }

    /// Accepts either a frame or a column mapping. Mappings are typed column
    /// by column and keep their own cells, so mixed columns sample real inputs.
    pub fn analyze(&self, dataset: impl Into<Dataset>) -> Result<Description> {
        match dataset.into() {
            Dataset::Frame(df) => self.analyze_frame(&df),
            Dataset::Mapping(columns) => self.analyze_mapping(columns),
        }
    }

    pub fn analyze_frame(&self, df: &DataFrame) -> Result<Description> {
        let start = std::time::Instant::now();
        let (row_count, column_count) = df.shape();
        tracing::debug!("Describing {} columns over {} rows", column_count, row_count);

        let mut rng = self.sampler();
        let columns = df
            .get_columns()
            .iter()
            .map(|series| -> Result<ColumnSummary> {
                let cells = series_cells(series)?;
                Ok(summarize_column(
                    series.name(),
                    series.dtype().to_string(),
                    &cells,
                    row_count,
                    &mut rng,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(finish(row_count, columns, start))
    }

    pub fn analyze_mapping(&self, columns: ColumnMap) -> Result<Description> {
        let start = std::time::Instant::now();
        let (row_count, typed) = type_columns(columns)?;
        tracing::debug!("Describing {} mapped columns over {} rows", typed.len(), row_count);

        let mut rng = self.sampler();
        let columns = typed
            .iter()
            .map(|column| {
                summarize_column(
                    &column.name,
                    column.data_type_label(),
                    &column.cells,
                    row_count,
                    &mut rng,
                )
            })
            .collect();

        Ok(finish(row_count, columns, start))
    }

    fn sampler(&self) -> StdRng {
        match self.sample_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn summarize_column(
    name: &str,
    data_type: String,
    cells: &[Cell],
    row_count: usize,
    rng: &mut StdRng,
) -> ColumnSummary {
    let present: Vec<&Cell> = cells.iter().filter(|v| !v.is_missing()).collect();
    let na_count = cells.len() - present.len();

    let value_sample = match present.choose(rng) {
        Some(value) => Some((*value).clone()),
        None => {
            tracing::debug!("Column {} has no non-missing values to sample", name);
            None
        }
    };

    ColumnSummary {
        column_name: name.to_string(),
        data_type,
        nb_unique: count_unique(present.iter().copied()),
        na_count,
        na_percent: na_percentage(na_count, row_count),
        value_sample,
    }
}

fn finish(
    row_count: usize,
    columns: Vec<ColumnSummary>,
    start: std::time::Instant,
) -> Description {
    let column_count = columns.len();
    println!("{}", report_line(row_count, column_count));
    tracing::info!(
        "Described {} rows x {} columns in {:?}",
        row_count,
        column_count,
        start.elapsed()
    );

    Description {
        row_count,
        column_count,
        columns,
    }
}

/// Shape line printed once per description.
pub fn report_line(row_count: usize, column_count: usize) -> String {
    format!(
        "Number of rows: {}\t Number of columns: {}",
        row_count, column_count
    )
}

/// Describes a frame or a column mapping with an unseeded sampler.
pub fn describe(input: impl Into<Dataset>) -> Result<Description> {
    ColumnAnalyzer::default().analyze(input)
}

/// Describes a frame with an unseeded sampler.
pub fn describe_columns(df: &DataFrame) -> Result<Description> {
    ColumnAnalyzer::default().analyze_frame(df)
}
