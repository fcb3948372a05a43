//! Column-level helpers shared by every merge strategy.

use crate::merge::error::MergeError;
use crate::types::season::Season;
use crate::types::source::DATE_COLUMN;
use crate::utils::{column_names, days_to_date, has_column, nan_to_null};
use log::{debug, warn};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};

/// Column holding the [`Season`] label of each weather record.
pub const SEASON_COLUMN: &str = "season";

pub(crate) fn require_column(df: &DataFrame, table: &str, column: &str) -> Result<(), MergeError> {
    if has_column(df, column) {
        Ok(())
    } else {
        Err(MergeError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        })
    }
}

/// Brings a silver table into the shape every merge step expects: a `Date`
/// typed date column (sub-day timestamps truncated to their day), `NaN`
/// replaced by null, and rows without a date removed.
pub(crate) fn prepare_table(df: DataFrame, table: &str) -> Result<DataFrame, MergeError> {
    require_column(&df, table, DATE_COLUMN)?;

    let date_expr = match df.column(DATE_COLUMN)?.dtype() {
        DataType::Date => None,
        DataType::Datetime(_, _) => Some(col(DATE_COLUMN).cast(DataType::Date)),
        DataType::String => Some(col(DATE_COLUMN).str().to_date(StrptimeOptions {
            format: Some("%Y-%m-%d".into()),
            strict: false,
            exact: false,
            ..Default::default()
        })),
        other => {
            return Err(MergeError::UnsupportedDateType {
                table: table.to_string(),
                column: DATE_COLUMN.to_string(),
                dtype: other.clone(),
            })
        }
    };

    let mut frame = nan_to_null(df)?.lazy();
    if let Some(expr) = date_expr {
        frame = frame.with_column(expr);
    }
    let prepared = frame.collect()?;

    let undated = prepared.column(DATE_COLUMN)?.null_count();
    if undated == 0 {
        return Ok(prepared);
    }
    warn!("Dropping {} rows without a date from the {} table", undated, table);
    Ok(prepared
        .lazy()
        .filter(col(DATE_COLUMN).is_not_null())
        .collect()?)
}

/// Keeps `wanted` columns (in that order) that exist in `df`. The date column
/// is always kept and placed first. An empty `wanted` list keeps everything.
pub(crate) fn select_present(df: DataFrame, wanted: &[String], table: &str) -> PolarsResult<DataFrame> {
    if wanted.is_empty() {
        return Ok(df);
    }
    let mut keep = vec![DATE_COLUMN.to_string()];
    for name in wanted {
        if name == DATE_COLUMN || keep.contains(name) {
            continue;
        }
        if has_column(&df, name) {
            keep.push(name.clone());
        } else {
            debug!("Column '{}' not present in the {} table", name, table);
        }
    }
    select_names(df, &keep)
}

/// Removes the listed columns that are present; absent ones are ignored.
pub(crate) fn drop_if_present(df: DataFrame, names: &[&str]) -> PolarsResult<DataFrame> {
    let keep: Vec<String> = column_names(&df)
        .into_iter()
        .filter(|name| !names.contains(&name.as_str()))
        .collect();
    if keep.len() == df.width() {
        return Ok(df);
    }
    select_names(df, &keep)
}

fn select_names(df: DataFrame, names: &[String]) -> PolarsResult<DataFrame> {
    let exprs: Vec<Expr> = names.iter().map(|name| col(name.as_str())).collect();
    df.lazy().select(exprs).collect()
}

/// Sorts by date. Rows sharing a date keep their relative order.
pub(crate) fn sort_by_date(df: DataFrame) -> PolarsResult<DataFrame> {
    df.lazy()
        .sort(
            [DATE_COLUMN],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()
}

/// Adds (or replaces) the `season` column from the `Date` typed date column.
pub(crate) fn tag_seasons(mut df: DataFrame) -> Result<DataFrame, MergeError> {
    require_column(&df, "weather", DATE_COLUMN)?;
    let labels: StringChunked = df
        .column(DATE_COLUMN)?
        .date()?
        .into_iter()
        .map(|days| {
            days.and_then(days_to_date)
                .map(|date| Season::of(&date).label())
        })
        .collect();
    df.with_column(labels.with_name(SEASON_COLUMN.into()).into_series())?;
    Ok(df)
}

/// Number of rows whose date appears more than once.
pub(crate) fn count_duplicate_dates(df: &DataFrame) -> PolarsResult<usize> {
    let mut occurrences: HashMap<i32, usize> = HashMap::new();
    for days in df.column(DATE_COLUMN)?.date()?.into_iter().flatten() {
        *occurrences.entry(days).or_default() += 1;
    }
    Ok(occurrences.values().filter(|count| **count > 1).sum())
}

/// Left-joins `right` onto `left` by date. Non-key columns of `right` whose
/// name is already used by `left` are renamed with `suffix`.
pub(crate) fn left_join_on_date(left: DataFrame, right: DataFrame, suffix: &str) -> PolarsResult<DataFrame> {
    let right = rename_overlapping(right, &column_names(&left), suffix)?;
    left.lazy()
        .join(
            right.lazy(),
            [col(DATE_COLUMN)],
            [col(DATE_COLUMN)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()
}

/// Renames the non-date columns of `df` that collide with `taken`.
pub(crate) fn rename_overlapping(df: DataFrame, taken: &[String], suffix: &str) -> PolarsResult<DataFrame> {
    let taken: HashSet<&str> = taken.iter().map(String::as_str).collect();
    let (existing, renamed): (Vec<String>, Vec<String>) = column_names(&df)
        .into_iter()
        .filter(|name| name != DATE_COLUMN && taken.contains(name.as_str()))
        .map(|name| {
            let new_name = format!("{}{}", name, suffix);
            (name, new_name)
        })
        .unzip();
    if existing.is_empty() {
        return Ok(df);
    }
    debug!("Renaming overlapping columns {:?} to {:?}", existing, renamed);
    df.lazy().rename(existing, renamed, true).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use polars::df;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn datetime(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_prepare_table_truncates_timestamps() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "date" => [datetime(2020, 1, 1, 3), datetime(2020, 1, 1, 18), datetime(2020, 1, 2, 0)],
            "temp" => [1.0, f64::NAN, 3.0]
        )?;

        let prepared = prepare_table(df, "hourly")?;

        assert_eq!(prepared.column("date")?.dtype(), &DataType::Date);
        assert_eq!(prepared.column("temp")?.null_count(), 1);
        assert_eq!(count_duplicate_dates(&prepared)?, 2);
        Ok(())
    }

    #[test]
    fn test_prepare_table_parses_iso_strings() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "date" => [Some("2020-01-01"), None, Some("2020-01-03")],
            "temp" => [1.0, 2.0, 3.0]
        )?;

        let prepared = prepare_table(df, "daily")?;

        assert_eq!(prepared.column("date")?.dtype(), &DataType::Date);
        assert_eq!(prepared.height(), 2);
        Ok(())
    }

    #[test]
    fn test_prepare_table_truncates_timestamp_strings() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "date" => ["2020-01-01T03:00:00", "2020-01-01 15:30", "2020-01-02"],
            "temp" => [1.0, 2.0, 3.0]
        )?;

        let prepared = prepare_table(df, "hourly")?;

        let date = prepared.column("date")?;
        assert_eq!(date.dtype(), &DataType::Date);
        assert_eq!(date.null_count(), 0);
        assert_eq!(prepared.height(), 3);
        let first = date.get(0)?;
        assert_eq!(date.get(1)?, first);
        assert_ne!(date.get(2)?, first);
        Ok(())
    }

    #[test]
    fn test_prepare_table_requires_date() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!("temp" => [1.0, 2.0])?;
        let err = prepare_table(df, "daily").unwrap_err();
        assert!(matches!(err, MergeError::MissingColumn { ref column, .. } if column == "date"));

        let df = df!("date" => [true, false])?;
        let err = prepare_table(df, "daily").unwrap_err();
        assert!(matches!(err, MergeError::UnsupportedDateType { .. }));
        Ok(())
    }

    #[test]
    fn test_tag_seasons() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "date" => [date(2020, 1, 1), date(2020, 4, 1), date(2020, 7, 1), date(2020, 10, 1)]
        )?;

        let tagged = tag_seasons(df)?;
        let seasons: Vec<Option<&str>> = tagged.column(SEASON_COLUMN)?.str()?.into_iter().collect();

        assert_eq!(
            seasons,
            vec![Some("Winter"), Some("Spring"), Some("Summer"), Some("Autumn")]
        );
        Ok(())
    }

    #[test]
    fn test_select_and_drop() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "temp" => [1.0],
            "date" => [date(2020, 1, 1)],
            "wind_gust" => [3.0]
        )?;

        let selected = select_present(
            df.clone(),
            &["temp".to_string(), "pressure".to_string()],
            "daily",
        )?;
        assert_eq!(column_names(&selected), vec!["date", "temp"]);

        let dropped = drop_if_present(df, &["wind_gust", "wind_speed"])?;
        assert_eq!(column_names(&dropped), vec!["temp", "date"]);
        Ok(())
    }

    #[test]
    fn test_left_join_renames_collisions() -> Result<(), Box<dyn std::error::Error>> {
        let daily = df!(
            "date" => [date(2020, 1, 1), date(2020, 1, 2)],
            "temp" => [1.0, 2.0]
        )?;
        let hourly = df!(
            "date" => [date(2020, 1, 2)],
            "temp" => [5.0],
            "dewpoint" => [0.5]
        )?;

        let joined = sort_by_date(left_join_on_date(daily, hourly, "_hourly")?)?;

        assert_eq!(column_names(&joined), vec!["date", "temp", "temp_hourly", "dewpoint"]);
        assert_eq!(joined.height(), 2);
        assert_eq!(joined.column("temp_hourly")?.f64()?.get(0), None);
        assert_eq!(joined.column("dewpoint")?.f64()?.get(1), Some(0.5));
        Ok(())
    }
}
