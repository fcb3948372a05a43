//! Linear interpolation gated by the missing-value density of each column.

use crate::quality::null_profile::NullProfile;
use crate::utils::{is_numeric, nan_to_null};
use log::{debug, info, warn};
use polars::prelude::*;
use serde::Serialize;

/// Missing-value band, in percent, inside which a column is interpolated.
///
/// The lower bound is exclusive and the upper bound inclusive, so a column is
/// interpolated iff `lower < missing% <= upper`. With the default lower bound
/// of 0, fully populated columns are never touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationBounds {
    lower: f64,
    upper: f64,
}

impl InterpolationBounds {
    pub fn new(lower_exclusive: f64, upper_inclusive: f64) -> Self {
        Self {
            lower: lower_exclusive,
            upper: upper_inclusive,
        }
    }

    /// Band `(0, upper]`.
    pub fn up_to(upper_inclusive: f64) -> Self {
        Self::new(0.0, upper_inclusive)
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn admits(&self, missing_percent: f64) -> bool {
        missing_percent > self.lower && missing_percent <= self.upper
    }
}

/// Which columns were filled and which were left sparse by
/// [`interpolate_bounded`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterpolationOutcome {
    /// Columns linearly interpolated.
    pub interpolated: Vec<String>,
    /// Columns above the upper bound, left with their nulls.
    pub incomplete: Vec<String>,
}

/// Linearly interpolates, in row order, every numeric column whose missing
/// percentage in `profile` falls inside `bounds`.
///
/// Columns with no missing values and columns above the upper bound are
/// returned unchanged. Leading and trailing nulls cannot be interpolated and
/// stay null. Columns that are absent from `df` or not numeric are skipped.
///
/// # Examples
///
/// ```
/// use disaster_gold::{interpolate_bounded, InterpolationBounds, NullProfile};
/// use polars::df;
/// use polars::prelude::*;
///
/// let df = df!(
///     "temp" => [Some(10.0), None, Some(14.0), Some(15.0), Some(16.0)],
///     "snow" => [None, None, Some(1.0), None, None]
/// ).unwrap();
/// let profile = NullProfile::of(&df);
///
/// let (filled, outcome) = interpolate_bounded(df, &profile, InterpolationBounds::up_to(20.0)).unwrap();
/// assert_eq!(filled.column("temp").unwrap().f64().unwrap().get(1), Some(12.0));
/// assert_eq!(outcome.incomplete, vec!["snow".to_string()]);
/// ```
pub fn interpolate_bounded(
    df: DataFrame,
    profile: &NullProfile,
    bounds: InterpolationBounds,
) -> PolarsResult<(DataFrame, InterpolationOutcome)> {
    let mut outcome = InterpolationOutcome::default();

    for entry in profile.entries() {
        let Ok(column) = df.column(&entry.column) else {
            continue;
        };
        if bounds.admits(entry.missing_percent) {
            if is_numeric(column.dtype()) {
                outcome.interpolated.push(entry.column.clone());
            } else {
                warn!(
                    "Column '{}' ({:.2}% missing) is {} and cannot be interpolated",
                    entry.column,
                    entry.missing_percent,
                    column.dtype()
                );
            }
        } else if entry.missing_percent > bounds.upper {
            outcome.incomplete.push(entry.column.clone());
        }
    }

    if outcome.interpolated.is_empty() {
        debug!("No column within the interpolation bound");
        return Ok((df, outcome));
    }
    info!("Interpolating columns: {:?}", outcome.interpolated);
    if !outcome.incomplete.is_empty() {
        info!(
            "Columns above {:.0}% missing left as is: {:?}",
            bounds.upper, outcome.incomplete
        );
    }

    let fills: Vec<Expr> = outcome
        .interpolated
        .iter()
        .map(|name| col(name.as_str()).interpolate(InterpolationMethod::Linear))
        .collect();
    let filled = nan_to_null(df)?.lazy().with_columns(fills).collect()?;

    Ok((filled, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .unwrap()
            .cast(&DataType::Float64)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_bounds_are_exclusive_below_inclusive_above() {
        let bounds = InterpolationBounds::up_to(20.0);
        assert!(!bounds.admits(0.0));
        assert!(bounds.admits(0.01));
        assert!(bounds.admits(20.0));
        assert!(!bounds.admits(20.01));
    }

    #[test]
    fn test_only_columns_within_bound_are_filled() -> Result<(), Box<dyn std::error::Error>> {
        // 10 rows: "low" is 10% missing, "high" is 50% missing, "full" is complete.
        let df = df!(
            "low" => [Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0), Some(7.0), Some(8.0), Some(9.0), Some(10.0)],
            "high" => [Some(1.0), None, None, None, None, None, Some(7.0), Some(8.0), Some(9.0), Some(10.0)],
            "full" => [1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 8.0, 7.0, 9.0, 10.0]
        )?;
        let profile = NullProfile::of(&df);
        let original = df.clone();

        let (filled, outcome) = interpolate_bounded(df, &profile, InterpolationBounds::up_to(20.0))?;

        assert_eq!(outcome.interpolated, vec!["low".to_string()]);
        assert_eq!(outcome.incomplete, vec!["high".to_string()]);
        assert_eq!(values(&filled, "low")[2], Some(3.0));
        assert_eq!(values(&filled, "high"), values(&original, "high"));
        assert_eq!(values(&filled, "full"), values(&original, "full"));
        Ok(())
    }

    #[test]
    fn test_edge_nulls_stay_null() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "temp" => [None, Some(2.0), None, Some(4.0), None]
        )?;
        let profile = NullProfile::of(&df);

        let (filled, outcome) = interpolate_bounded(df, &profile, InterpolationBounds::up_to(60.0))?;

        assert_eq!(outcome.interpolated, vec!["temp".to_string()]);
        assert_eq!(
            values(&filled, "temp"),
            vec![None, Some(2.0), Some(3.0), Some(4.0), None]
        );
        Ok(())
    }

    #[test]
    fn test_integer_columns_are_interpolated() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "wind_direction" => [Some(100i64), None, Some(200), Some(210), Some(220)]
        )?;
        let profile = NullProfile::of(&df);

        let (filled, _) = interpolate_bounded(df, &profile, InterpolationBounds::up_to(40.0))?;

        assert_eq!(values(&filled, "wind_direction")[1], Some(150.0));
        Ok(())
    }

    #[test]
    fn test_non_numeric_columns_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "season" => [Some("Winter"), None, Some("Winter"), Some("Winter"), Some("Winter")]
        )?;
        let profile = NullProfile::of(&df);

        let (filled, outcome) = interpolate_bounded(df, &profile, InterpolationBounds::up_to(40.0))?;

        assert!(outcome.interpolated.is_empty());
        assert_eq!(filled.column("season")?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_small_integer_columns_are_interpolated() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "cloud_cover" => [Some(2i16), None, Some(4), Some(4), Some(4), Some(4)]
        )?;
        let profile = NullProfile::of(&df);

        let (filled, outcome) = interpolate_bounded(df, &profile, InterpolationBounds::up_to(20.0))?;

        assert_eq!(outcome.interpolated, vec!["cloud_cover".to_string()]);
        assert_eq!(values(&filled, "cloud_cover")[1], Some(3.0));
        Ok(())
    }

    #[test]
    fn test_float32_nan_gaps_are_filled() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "t32" => [1.0f32, f32::NAN, 3.0, 3.0, 3.0, 3.0]
        )?;
        let profile = NullProfile::of(&df);

        let (filled, outcome) = interpolate_bounded(df, &profile, InterpolationBounds::up_to(20.0))?;

        assert_eq!(outcome.interpolated, vec!["t32".to_string()]);
        assert_eq!(values(&filled, "t32")[1], Some(2.0));
        Ok(())
    }
}
