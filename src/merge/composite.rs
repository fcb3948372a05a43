//! Merge strategy for sources split into a daily and an hourly table.

use crate::merge::columns::{left_join_on_date, prepare_table, select_present, sort_by_date};
use crate::merge::error::MergeError;
use crate::merge::hourly::aggregate_hourly;
use crate::merge::MergedWeather;
use crate::types::source::SourceConfig;
use log::debug;
use polars::prelude::*;

/// Suffix given to hourly aggregate columns whose name the daily table already uses.
pub const HOURLY_SUFFIX: &str = "_hourly";

pub(crate) fn merge_composite(
    daily: DataFrame,
    hourly: DataFrame,
    config: &SourceConfig,
) -> Result<MergedWeather, MergeError> {
    let daily = prepare_table(daily, "daily")?;
    let daily = select_present(daily, &config.daily_columns, "daily")?;

    let hourly = aggregate_hourly(hourly)?;
    let hourly = select_present(hourly, &config.hourly_columns, "hourly")?;

    let days = daily.height();
    let merged = sort_by_date(left_join_on_date(daily, hourly, HOURLY_SUFFIX)?)?;
    debug!(
        "Source '{}': joined hourly means onto {} daily rows ({} columns)",
        config.id,
        days,
        merged.width()
    );
    MergedWeather::finish(merged, config)
}
