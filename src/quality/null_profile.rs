//! Per-column missing-value profile of a data frame.

use log::debug;
use polars::prelude::*;
use serde::Serialize;

/// Missing-value share of a single column, in percent (0-100, two decimals).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnNulls {
    pub column: String,
    pub missing_percent: f64,
}

/// Missing-value percentages of every column of a frame, sorted from the most
/// to the least incomplete column. Columns with equal percentages keep their
/// frame order.
///
/// Floating-point `NaN` counts as missing, like null.
///
/// # Examples
///
/// ```
/// use disaster_gold::NullProfile;
/// use polars::df;
/// use polars::prelude::*;
///
/// let df = df!(
///     "temp" => [Some(1.0), None, Some(3.0), Some(4.0)],
///     "rain" => [Some(0.0), Some(0.2), Some(0.0), Some(1.1)]
/// ).unwrap();
///
/// let profile = NullProfile::of(&df);
/// assert_eq!(profile.get("temp"), Some(25.0));
/// assert_eq!(profile.get("rain"), Some(0.0));
/// assert_eq!(profile.entries()[0].column, "temp");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NullProfile {
    entries: Vec<ColumnNulls>,
}

impl NullProfile {
    /// Computes the profile of `df` without modifying it.
    pub fn of(df: &DataFrame) -> NullProfile {
        let height = df.height();
        let mut entries: Vec<ColumnNulls> = df
            .get_columns()
            .iter()
            .map(|column| ColumnNulls {
                column: column.name().to_string(),
                missing_percent: missing_percent(missing_count(column), height),
            })
            .collect();
        entries.sort_by(|a, b| b.missing_percent.total_cmp(&a.missing_percent));
        NullProfile { entries }
    }

    pub fn entries(&self) -> &[ColumnNulls] {
        &self.entries
    }

    /// Missing percentage of `column`, or `None` if the column was not profiled.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.column == column)
            .map(|entry| entry.missing_percent)
    }

    /// Columns with at least one missing value.
    pub fn incomplete_columns(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.missing_percent > 0.0)
            .map(|entry| entry.column.as_str())
            .collect()
    }

    pub(crate) fn log(&self, context: &str) {
        for entry in &self.entries {
            debug!(
                "{}: column '{}' is {:.2}% missing",
                context, entry.column, entry.missing_percent
            );
        }
    }
}

fn missing_count(column: &Column) -> usize {
    let nan_count = match column.dtype() {
        DataType::Float64 => column
            .f64()
            .map(|values| values.into_iter().flatten().filter(|v| v.is_nan()).count())
            .unwrap_or(0),
        DataType::Float32 => column
            .f32()
            .map(|values| values.into_iter().flatten().filter(|v| v.is_nan()).count())
            .unwrap_or(0),
        _ => 0,
    };
    column.null_count() + nan_count
}

fn missing_percent(missing: usize, height: usize) -> f64 {
    if height == 0 {
        return 0.0;
    }
    let percent = missing as f64 / height as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}
