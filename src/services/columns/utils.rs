use std::collections::HashSet;

use polars::prelude::Series;

use super::types::Cell;
use crate::error::Result;

/// Reads every cell of a series, row by row.
pub fn series_cells(series: &Series) -> Result<Vec<Cell>> {
    let mut cells = Vec::with_capacity(series.len());
    for idx in 0..series.len() {
        cells.push(Cell::from_any_value(series.get(idx)?));
    }
    Ok(cells)
}

/// Distinct count over the string form of each cell, so `1` and `"1"` collapse
/// while `1` and `1.0` stay apart.
pub fn count_unique<'a, I>(values: I) -> usize
where
    I: IntoIterator<Item = &'a Cell>,
{
    values
        .into_iter()
        .map(|value| value.to_string())
        .collect::<HashSet<_>>()
        .len()
}

/// Share of missing rows as a whole percentage, rounding halves to even.
/// An empty table reports 0.
pub fn na_percentage(na_count: usize, row_count: usize) -> u64 {
    if row_count == 0 {
        return 0;
    }
    (na_count as f64 / row_count as f64 * 100.0).round_ties_even() as u64
}

pub fn format_na(na_count: usize, na_percent: u64) -> String {
    format!("{} ({}%)", na_count, na_percent)
}
