use chrono::NaiveDate;
use datatools::config::Config;
use datatools::models::{COLUMN_NAME, NB_NA, NB_UNIQUE, VALUE_SAMPLE};
use datatools::{describe, AppError, Cell, ColumnAnalyzer, ColumnMap, Result};
use polars::prelude::*;

#[test]
fn test_describe_json_mapping() -> Result<()> {
    let columns = ColumnMap::from_json(
        r#"{
            "city": ["Lyon", "Paris", null, "Lyon"],
            "price": [1, 2.5, null, 1],
            "active": [true, false, true, null],
            "note": [null, null, null, null]
        }"#,
    )?;
    let description = describe(columns)?;

    assert_eq!((description.row_count, description.column_count), (4, 4));
    let names: Vec<&str> = description.columns.iter().map(|c| c.column_name.as_str()).collect();
    assert_eq!(names, vec!["city", "price", "active", "note"]);

    let city = description.get("city").expect("city described");
    assert_eq!(city.data_type, "str");
    assert_eq!(city.nb_unique, 2);
    assert_eq!(city.nb_na(), "1 (25%)");

    let price = description.get("price").expect("price described");
    assert_eq!(price.data_type, "f64");
    assert_eq!(price.nb_unique, 2);
    assert!(matches!(price.value_sample, Some(Cell::Float(v)) if v == 1.0 || v == 2.5));

    let active = description.get("active").expect("active described");
    assert_eq!(active.data_type, "bool");
    assert_eq!(active.nb_unique, 2);

    let note = description.get("note").expect("note described");
    assert_eq!(note.data_type, "null");
    assert_eq!(note.nb_unique, 0);
    assert_eq!(note.nb_na(), "4 (100%)");
    assert!(note.value_sample.is_none());
    Ok(())
}

#[test]
fn test_describe_temporal_columns() -> Result<()> {
    let first = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let second = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

    let mut columns = ColumnMap::new();
    columns.insert("day", [Some(first), None, Some(second)]);
    columns.insert(
        "seen_at",
        [
            Some(first.and_hms_opt(9, 30, 0).unwrap()),
            Some(second.and_hms_opt(18, 0, 0).unwrap()),
            None,
        ],
    );

    let description = ColumnAnalyzer::new(&Config::with_seed(5)).analyze(columns)?;

    let day = &description.columns[0];
    assert_eq!(day.data_type, "date");
    assert!(matches!(day.value_sample, Some(Cell::Date(d)) if d == first || d == second));

    let seen_at = &description.columns[1];
    assert!(seen_at.data_type.starts_with("datetime"));
    assert_eq!(seen_at.nb_na(), "1 (33%)");
    assert!(matches!(seen_at.value_sample, Some(Cell::Datetime(_))));
    Ok(())
}

#[test]
fn test_mixed_mapping_column_keeps_its_cells() -> Result<()> {
    let mut columns = ColumnMap::new();
    columns.insert(
        "mixed",
        [Cell::Int(1), Cell::from("1"), Cell::Float(1.0), Cell::Null],
    );
    columns.insert("flags", [Cell::Bool(true), Cell::from("True"), Cell::Int(7)]);

    let description = describe(columns)?;

    let mixed = &description.columns[0];
    assert_eq!(mixed.data_type, "object");
    // "1" and 1 share a string form, 1.0 does not
    assert_eq!(mixed.nb_unique, 2);
    assert_eq!(mixed.nb_na(), "1 (25%)");
    let sample = mixed.value_sample.clone().expect("mixed has values");
    assert!([Cell::Int(1), Cell::from("1"), Cell::Float(1.0)].contains(&sample));

    let flags = &description.columns[1];
    assert_eq!(flags.data_type, "object");
    // true and "True" share a string form
    assert_eq!(flags.nb_unique, 2);
    Ok(())
}

#[test]
fn test_ragged_mapping_is_rejected() {
    let columns = ColumnMap::from_json(r#"{"a": [1, 2], "b": [1]}"#).expect("valid json");
    let err = describe(columns).unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[test]
fn test_empty_mapping() -> Result<()> {
    let description = describe(ColumnMap::new())?;
    assert_eq!((description.row_count, description.column_count), (0, 0));
    assert!(description.columns.is_empty());
    assert_eq!(description.to_dataframe()?.height(), 0);
    Ok(())
}

#[test]
fn test_result_table() -> Result<()> {
    let df = DataFrame::new(vec![
        Series::new("col1", &["a", "b", "c"]),
        Series::new("col2", &[Some(1i64), Some(2), None]),
    ])?;
    let table = describe(df)?.to_dataframe()?;

    assert_eq!(table.shape(), (2, 5));
    assert_eq!(table.column(COLUMN_NAME)?.get(1)?, AnyValue::String("col2"));
    assert_eq!(table.column(NB_UNIQUE)?.get(0)?, AnyValue::UInt64(3));
    assert_eq!(table.column(NB_NA)?.get(1)?, AnyValue::String("1 (33%)"));
    assert_eq!(table.column(VALUE_SAMPLE)?.null_count(), 0);
    Ok(())
}
