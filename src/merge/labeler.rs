//! Joins a consolidated weather table against a city's disaster events and
//! derives the `disaster_occurred` label.

use crate::merge::columns::{drop_if_present, prepare_table, rename_overlapping, require_column};
use crate::merge::error::MergeError;
use crate::types::event_type::EventType;
use crate::types::source::DATE_COLUMN;
use crate::utils::column_names;
use log::{debug, warn};
use polars::prelude::*;
use std::collections::{BTreeMap, HashSet};

pub const EVENT_TYPE_COLUMN: &str = "eventType";
pub const LOCATION_COLUMN: &str = "location";
pub const DISASTER_OCCURRED_COLUMN: &str = "disaster_occurred";

const DISASTER_SUFFIX: &str = "_disaster";

/// A city's disaster events, ready to be joined: dates normalized, location
/// dropped, one row per `(date, eventType)` pair.
#[derive(Debug, Clone)]
pub struct DisasterTable {
    frame: DataFrame,
}

impl DisasterTable {
    /// Prepares a silver disaster table.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::MissingColumn`] if `date` or `eventType` is absent.
    pub fn prepare(raw: DataFrame) -> Result<DisasterTable, MergeError> {
        let frame = prepare_table(raw, "disaster")?;
        require_column(&frame, "disaster", EVENT_TYPE_COLUMN)?;
        let frame = drop_if_present(frame, &[LOCATION_COLUMN])?;
        let frame = dedup_disasters(frame)?;
        Ok(DisasterTable { frame })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of deduplicated disaster rows.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Number of rows per event type.
    pub fn event_counts(&self) -> PolarsResult<BTreeMap<String, usize>> {
        let events = self.frame.column(EVENT_TYPE_COLUMN)?.cast(&DataType::String)?;
        let mut counts = BTreeMap::new();
        for event in events.str()?.into_iter().flatten() {
            *counts.entry(event.to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Event labels that are not part of the storm event vocabulary, sorted.
    pub fn unknown_event_types(&self) -> PolarsResult<Vec<String>> {
        Ok(self
            .event_counts()?
            .into_keys()
            .filter(|label| label.parse::<EventType>().is_err())
            .collect())
    }
}

/// Keeps the first row of every `(date, eventType)` pair. Expects a `Date`
/// typed date column.
pub(crate) fn dedup_disasters(df: DataFrame) -> PolarsResult<DataFrame> {
    let dates = df.column(DATE_COLUMN)?.date()?;
    let events = df.column(EVENT_TYPE_COLUMN)?.cast(&DataType::String)?;
    let mut seen = HashSet::new();
    let keep: BooleanChunked = dates
        .into_iter()
        .zip(events.str()?.into_iter())
        .map(|pair| seen.insert(pair))
        .collect();

    let deduped = df.filter(&keep)?;
    let removed = df.height() - deduped.height();
    if removed > 0 {
        debug!("Removed {} duplicate (date, eventType) disaster rows", removed);
    }
    Ok(deduped)
}

/// Full outer join of `weather` and `disasters` on date.
///
/// Every date of either table is kept. Weather columns are null on
/// disaster-only dates and disaster columns are null on weather-only dates.
/// `disaster_occurred` is `1` where `eventType` is set and `0` elsewhere. A
/// date with several event types appears once per type. The result is
/// sorted by date.
///
/// ```
/// use chrono::NaiveDate;
/// use disaster_gold::{label_disasters, DisasterTable};
/// use polars::df;
///
/// let weather = df!(
///     "date" => [NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()],
///     "temp" => [10.0]
/// ).unwrap();
/// let disasters = df!(
///     "date" => [NaiveDate::from_ymd_opt(2020, 1, 3).unwrap()],
///     "eventType" => ["Flood"],
///     "location" => ["Miami"]
/// ).unwrap();
///
/// let gold = label_disasters(weather, &DisasterTable::prepare(disasters).unwrap()).unwrap();
/// assert_eq!(gold.height(), 2);
/// ```
///
/// # Errors
///
/// Returns [`MergeError::MissingColumn`] if `weather` has no `date` column.
pub fn label_disasters(weather: DataFrame, disasters: &DisasterTable) -> Result<DataFrame, MergeError> {
    let weather = prepare_table(weather, "weather")?;
    let reserved = [EVENT_TYPE_COLUMN, DISASTER_OCCURRED_COLUMN];
    if reserved.iter().any(|name| weather.column(name).is_ok()) {
        warn!("Weather table already has disaster columns, replacing them");
    }
    let weather = drop_if_present(weather, &reserved)?;
    let events = rename_overlapping(disasters.frame.clone(), &column_names(&weather), DISASTER_SUFFIX)?;

    let labeled = weather
        .lazy()
        .join(
            events.lazy(),
            [col(DATE_COLUMN)],
            [col(DATE_COLUMN)],
            JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
        )
        .with_column(
            col(EVENT_TYPE_COLUMN)
                .is_not_null()
                .cast(DataType::Int32)
                .alias(DISASTER_OCCURRED_COLUMN),
        )
        .sort(
            [DATE_COLUMN],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;
    Ok(labeled)
}
