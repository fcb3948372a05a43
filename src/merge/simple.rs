//! Merge strategy for single-table daily sources.

use crate::merge::columns::{drop_if_present, prepare_table, select_present, sort_by_date};
use crate::merge::error::MergeError;
use crate::merge::MergedWeather;
use crate::types::source::SourceConfig;
use crate::utils::has_column;
use log::warn;
use polars::prelude::*;

pub const AVERAGE_TEMPERATURE: &str = "average_temperature";
pub const MAXIMUM_TEMPERATURE: &str = "maximum_temperature";
pub const MINIMUM_TEMPERATURE: &str = "minimum_temperature";

const WIND_COLUMNS: [&str; 3] = ["wind_gust", "wind_direction", "wind_speed"];

pub(crate) fn merge_simple(daily: DataFrame, config: &SourceConfig) -> Result<MergedWeather, MergeError> {
    let daily = prepare_table(daily, "daily")?;
    let daily = select_present(daily, &config.daily_columns, "daily")?;
    let daily = derive_average_temperature(daily)?;
    let daily = drop_if_present(daily, &WIND_COLUMNS)?;
    let daily = sort_by_date(daily)?;
    MergedWeather::finish(daily, config)
}

/// Creates `average_temperature` as the midpoint of the daily extremes, or
/// fills its gaps with that midpoint when the column already exists.
///
/// Without both extremes the table is returned unchanged.
pub(crate) fn derive_average_temperature(df: DataFrame) -> PolarsResult<DataFrame> {
    if !has_column(&df, MAXIMUM_TEMPERATURE) || !has_column(&df, MINIMUM_TEMPERATURE) {
        warn!(
            "Cannot derive {}: '{}' or '{}' is missing",
            AVERAGE_TEMPERATURE, MAXIMUM_TEMPERATURE, MINIMUM_TEMPERATURE
        );
        return Ok(df);
    }
    let midpoint = (col(MAXIMUM_TEMPERATURE) + col(MINIMUM_TEMPERATURE)) / lit(2.0);
    let average = if has_column(&df, AVERAGE_TEMPERATURE) {
        col(AVERAGE_TEMPERATURE).fill_null(midpoint)
    } else {
        midpoint
    };
    df.lazy()
        .with_column(average.alias(AVERAGE_TEMPERATURE))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::columns::SEASON_COLUMN;
    use crate::types::source::SourceKind;
    use crate::utils::column_names;
    use chrono::NaiveDate;
    use polars::df;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
    }

    #[test]
    fn test_average_temperature_is_derived_when_absent() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "date" => [day(1), day(2)],
            "maximum_temperature" => [20.0, 30.0],
            "minimum_temperature" => [10.0, 10.0]
        )?;

        let derived = derive_average_temperature(df)?;
        let average = derived.column(AVERAGE_TEMPERATURE)?.f64()?;

        assert_eq!(average.get(0), Some(15.0));
        assert_eq!(average.get(1), Some(20.0));
        Ok(())
    }

    #[test]
    fn test_average_temperature_gaps_are_filled() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "date" => [day(1), day(2)],
            "average_temperature" => [Some(18.0), None],
            "maximum_temperature" => [20.0, 30.0],
            "minimum_temperature" => [10.0, 10.0]
        )?;

        let derived = derive_average_temperature(df)?;
        let average = derived.column(AVERAGE_TEMPERATURE)?.f64()?;

        assert_eq!(average.get(0), Some(18.0));
        assert_eq!(average.get(1), Some(20.0));
        Ok(())
    }

    #[test]
    fn test_merge_simple() -> Result<(), Box<dyn std::error::Error>> {
        let daily = df!(
            "date" => [day(3), day(1), day(2), day(4), day(5), day(6)],
            "precipitation" => [Some(3.0), Some(1.0), None, Some(4.0), Some(5.0), Some(6.0)],
            "maximum_temperature" => [20.0, 20.0, 20.0, 20.0, 20.0, 20.0],
            "minimum_temperature" => [10.0, 10.0, 10.0, 10.0, 10.0, 10.0],
            "snow_depth" => [None, None, Some(1.0), None, None, Some(2.0)],
            "wind_speed" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            "wind_gust" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            "pressure" => [1013.0, 1013.0, 1013.0, 1013.0, 1013.0, 1013.0]
        )?;
        let config = SourceConfig::new("base_2", SourceKind::Simple);

        let merged = merge_simple(daily, &config)?;
        let frame = &merged.frame;

        assert_eq!(
            column_names(frame),
            vec![
                "date",
                "precipitation",
                "snow_depth",
                "maximum_temperature",
                "minimum_temperature",
                "average_temperature",
                SEASON_COLUMN
            ]
        );
        // 1 of 6 missing (16.67%) is interpolated, 4 of 6 (66.67%) is not.
        let precipitation = frame.column("precipitation")?.f64()?;
        assert_eq!(precipitation.get(1), Some(2.0));
        assert_eq!(frame.column("snow_depth")?.null_count(), 4);
        assert_eq!(merged.interpolation.interpolated, vec!["precipitation".to_string()]);
        assert_eq!(merged.interpolation.incomplete, vec!["snow_depth".to_string()]);
        assert_eq!(frame.column(SEASON_COLUMN)?.str()?.get(0), Some("Spring"));
        Ok(())
    }
}
