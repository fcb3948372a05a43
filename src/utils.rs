use chrono::NaiveDate;
use polars::prelude::*;

/// Days between 0001-01-01 (chrono's CE day 1) and 1970-01-01 (polars' date epoch).
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Converts a polars `Date` physical value (days since the unix epoch) to a `NaiveDate`.
pub(crate) fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// Numeric dtypes that can be averaged and interpolated.
pub(crate) fn is_numeric(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric()
}

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Replaces NaN with null in every float column, so that missing values
/// have one representation whichever writer produced the parquet file.
pub(crate) fn nan_to_null(df: DataFrame) -> PolarsResult<DataFrame> {
    let fills: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter(|column| column.dtype().is_float())
        .map(|column| col(column.name().as_str()).fill_nan(lit(NULL)))
        .collect();
    if fills.is_empty() {
        return Ok(df);
    }
    df.lazy().with_columns(fills).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_days_to_date_epoch() {
        assert_eq!(days_to_date(0), NaiveDate::from_ymd_opt(1970, 1, 1));
        assert_eq!(days_to_date(18_262), NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(days_to_date(-1), NaiveDate::from_ymd_opt(1969, 12, 31));
    }

    #[test]
    fn test_nan_to_null_only_touches_nan() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "temp" => [Some(1.0), Some(f64::NAN), None, Some(4.0)],
            "label" => ["a", "b", "c", "d"]
        )?;

        let cleaned = nan_to_null(df)?;
        let temp = cleaned.column("temp")?.f64()?;

        assert_eq!(temp.null_count(), 2);
        assert_eq!(temp.get(0), Some(1.0));
        assert_eq!(temp.get(3), Some(4.0));
        assert_eq!(cleaned.column("label")?.null_count(), 0);
        Ok(())
    }

    #[test]
    fn test_nan_to_null_covers_float32() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!("t32" => [1.0f32, f32::NAN, 3.0])?;

        let cleaned = nan_to_null(df)?;
        let t32 = cleaned.column("t32")?;

        assert_eq!(t32.dtype(), &DataType::Float32);
        assert_eq!(t32.null_count(), 1);
        assert_eq!(t32.f32()?.get(2), Some(3.0));
        Ok(())
    }

    #[test]
    fn test_small_integers_are_numeric() {
        assert!(is_numeric(&DataType::Int8));
        assert!(is_numeric(&DataType::Int16));
        assert!(is_numeric(&DataType::UInt8));
        assert!(is_numeric(&DataType::UInt16));
        assert!(!is_numeric(&DataType::String));
        assert!(!is_numeric(&DataType::Boolean));
    }
}
