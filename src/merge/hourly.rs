//! Collapses sub-daily observations into one record per day.

use crate::merge::columns::prepare_table;
use crate::merge::error::MergeError;
use crate::types::source::DATE_COLUMN;
use crate::utils::is_numeric;
use log::debug;
use polars::prelude::*;

/// Averages every numeric column of `hourly` per date.
///
/// The date column may hold dates or sub-day timestamps; timestamps are
/// truncated to their day before grouping. Non-numeric columns are dropped.
/// The output has exactly one row per distinct date, sorted by date. A day
/// whose values of a column are all missing gets a null for that column and
/// is kept.
///
/// # Errors
///
/// Returns [`MergeError::MissingColumn`] if `hourly` has no `date` column and
/// [`MergeError::UnsupportedDateType`] if it cannot be read as a date.
pub fn aggregate_hourly(hourly: DataFrame) -> Result<DataFrame, MergeError> {
    let hourly = prepare_table(hourly, "hourly")?;

    let mut means = Vec::new();
    let mut dropped = Vec::new();
    for column in hourly.get_columns() {
        if column.name().as_str() == DATE_COLUMN {
            continue;
        }
        if is_numeric(column.dtype()) {
            means.push(col(column.name().as_str()).mean());
        } else {
            dropped.push(column.name().to_string());
        }
    }
    if !dropped.is_empty() {
        debug!("Dropping non-numeric hourly columns {:?}", dropped);
    }

    let rows = hourly.height();
    let daily = hourly
        .lazy()
        .group_by([col(DATE_COLUMN)])
        .agg(means)
        .sort([DATE_COLUMN], SortMultipleOptions::default())
        .collect()?;
    debug!("Aggregated {} hourly rows into {} days", rows, daily.height());
    Ok(daily)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use polars::df;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_one_row_per_distinct_date() -> Result<(), Box<dyn std::error::Error>> {
        let hourly = df!(
            "date" => [at(2, 0), at(1, 0), at(1, 12), at(2, 6), at(3, 23)],
            "temp" => [Some(4.0), Some(1.0), Some(3.0), Some(6.0), None],
            "relative_humidity" => [80i64, 60, 70, 90, 50],
            "station" => ["a", "a", "a", "a", "a"]
        )?;

        let daily = aggregate_hourly(hourly)?;

        assert_eq!(daily.height(), 3);
        assert!(daily.column("station").is_err());
        let temp = daily.column("temp")?.f64()?;
        assert_eq!(temp.get(0), Some(2.0));
        assert_eq!(temp.get(1), Some(5.0));
        assert_eq!(temp.get(2), None);
        let humidity = daily.column("relative_humidity")?.f64()?;
        assert_eq!(humidity.get(0), Some(65.0));
        assert_eq!(humidity.get(2), Some(50.0));
        Ok(())
    }

    #[test]
    fn test_nan_is_ignored_in_mean() -> Result<(), Box<dyn std::error::Error>> {
        let hourly = df!(
            "date" => [at(1, 0), at(1, 1), at(1, 2)],
            "wind_speed" => [2.0, f64::NAN, 4.0]
        )?;

        let daily = aggregate_hourly(hourly)?;

        assert_eq!(daily.column("wind_speed")?.f64()?.get(0), Some(3.0));
        Ok(())
    }

    #[test]
    fn test_float32_nan_is_ignored_in_mean() -> Result<(), Box<dyn std::error::Error>> {
        let hourly = df!(
            "date" => [at(1, 0), at(1, 1), at(1, 2)],
            "temp" => [2.0f32, f32::NAN, 4.0]
        )?;

        let daily = aggregate_hourly(hourly)?;

        let temp = daily.column("temp")?.cast(&DataType::Float64)?;
        assert_eq!(temp.f64()?.get(0), Some(3.0));
        Ok(())
    }

    #[test]
    fn test_small_integer_columns_are_averaged() -> Result<(), Box<dyn std::error::Error>> {
        let hourly = df!(
            "date" => [at(1, 0), at(1, 12), at(2, 0)],
            "cloud_cover" => [2i16, 4, 7],
            "weather_code" => [1u8, 3, 5]
        )?;

        let daily = aggregate_hourly(hourly)?;

        let cloud_cover = daily.column("cloud_cover")?.cast(&DataType::Float64)?;
        assert_eq!(cloud_cover.f64()?.get(0), Some(3.0));
        assert_eq!(cloud_cover.f64()?.get(1), Some(7.0));
        let weather_code = daily.column("weather_code")?.cast(&DataType::Float64)?;
        assert_eq!(weather_code.f64()?.get(0), Some(2.0));
        Ok(())
    }

    #[test]
    fn test_missing_date_column_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let hourly = df!("temp" => [1.0])?;
        assert!(matches!(
            aggregate_hourly(hourly),
            Err(MergeError::MissingColumn { .. })
        ));
        Ok(())
    }
}
