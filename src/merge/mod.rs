//! Source merging and disaster labeling: turns per-source silver tables into
//! one labeled gold table per city.

pub mod columns;
pub mod composite;
pub mod error;
pub mod hourly;
pub mod labeler;
pub mod reconciled;
pub mod simple;

use crate::merge::columns::{count_duplicate_dates, tag_seasons};
use crate::merge::error::MergeError;
use crate::quality::interpolate::{interpolate_bounded, InterpolationBounds, InterpolationOutcome};
use crate::quality::null_profile::NullProfile;
use crate::types::source::{SourceConfig, SourceKind};
use log::{debug, warn};
use polars::prelude::DataFrame;

/// The silver weather tables of one city for one source.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub daily: DataFrame,
    pub hourly: Option<DataFrame>,
}

/// One consolidated weather table, plus what the merge did to it.
#[derive(Debug, Clone)]
pub struct MergedWeather {
    /// One row per date (duplicates in the silver table are kept and
    /// counted in `duplicate_dates`), sorted by date, with a `season` column.
    pub frame: DataFrame,
    pub interpolation: InterpolationOutcome,
    /// Rows of the daily table whose date is not unique.
    pub duplicate_dates: usize,
}

impl MergedWeather {
    /// Shared tail of the merge strategies: duplicate-date diagnostics,
    /// bounded interpolation (when the source has a bound), season tagging.
    pub(crate) fn finish(frame: DataFrame, config: &SourceConfig) -> Result<MergedWeather, MergeError> {
        let duplicate_dates = report_duplicate_dates(&frame, config)?;
        let (frame, interpolation) = interpolate_for_source(frame, config)?;
        Ok(MergedWeather {
            frame: tag_seasons(frame)?,
            interpolation,
            duplicate_dates,
        })
    }
}

/// Combines the tables of one source into a single weather table, using the
/// strategy of the source's [`SourceKind`].
///
/// # Errors
///
/// Returns [`MergeError::MissingHourlyTable`] when a composite or reconciled
/// source has no hourly table, and [`MergeError::MissingColumn`] when a table
/// lacks the `date` column.
pub fn merge_source(config: &SourceConfig, tables: SourceTables) -> Result<MergedWeather, MergeError> {
    let SourceTables { daily, hourly } = tables;
    match config.kind {
        SourceKind::Simple => {
            if hourly.is_some() {
                debug!("Source '{}' is simple, ignoring its hourly table", config.id);
            }
            simple::merge_simple(daily, config)
        }
        SourceKind::Composite => {
            let hourly = hourly.ok_or_else(|| missing_hourly(config))?;
            composite::merge_composite(daily, hourly, config)
        }
        SourceKind::Reconciled => {
            let hourly = hourly.ok_or_else(|| missing_hourly(config))?;
            reconciled::merge_reconciled(daily, hourly, config)
        }
    }
}

fn missing_hourly(config: &SourceConfig) -> MergeError {
    MergeError::MissingHourlyTable {
        source_id: config.id.clone(),
        kind: config.kind,
    }
}

pub(crate) fn report_duplicate_dates(frame: &DataFrame, config: &SourceConfig) -> Result<usize, MergeError> {
    let duplicates = count_duplicate_dates(frame)?;
    if duplicates > 0 {
        warn!(
            "Source '{}': {} daily rows share their date with another row",
            config.id, duplicates
        );
    }
    Ok(duplicates)
}

pub(crate) fn interpolate_for_source(
    frame: DataFrame,
    config: &SourceConfig,
) -> Result<(DataFrame, InterpolationOutcome), MergeError> {
    let Some(upper) = config.interpolation_bound else {
        return Ok((frame, InterpolationOutcome::default()));
    };
    let profile = NullProfile::of(&frame);
    profile.log(&config.id);
    let (frame, outcome) = interpolate_bounded(frame, &profile, InterpolationBounds::up_to(upper))?;
    if !outcome.interpolated.is_empty() {
        NullProfile::of(&frame).log(&format!("{} after interpolation", config.id));
    }
    Ok((frame, outcome))
}
