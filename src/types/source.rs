//! Defines the kinds of silver weather sources, their file granularity, and the
//! per-source configuration resolved when a source directory is loaded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical column holding the day of a record.
pub const DATE_COLUMN: &str = "date";

/// Canonical columns kept from a simple (station daily summary) source.
const SIMPLE_DAILY_COLUMNS: [&str; 10] = [
    "date",
    "wind_speed",
    "precipitation",
    "snowfall",
    "snow_depth",
    "average_temperature",
    "maximum_temperature",
    "minimum_temperature",
    "wind_direction",
    "wind_gust",
];

/// Canonical columns kept from the hourly aggregate of a reconciled source.
const RECONCILED_HOURLY_COLUMNS: [&str; 6] = [
    "date",
    "dewpoint",
    "relative_humidity",
    "wind_direction",
    "wind_speed",
    "precipitation",
];

/// How the tables of one weather source are combined into a single per-city
/// weather table.
///
/// Every variant has exactly one merge implementation, selected by
/// [`crate::merge_source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A single daily table. Columns are whitelisted, the mean temperature is
    /// derived and gap-filled, wind columns are dropped, and the result is
    /// interpolated with an upper bound of 20%.
    Simple,
    /// A daily table plus an hourly table. The hourly table is averaged per day
    /// and left-joined onto the daily one.
    Composite,
    /// A daily table plus an hourly table where daily precipitation and wind
    /// gaps are backfilled from the hourly aggregate before interpolating with
    /// an upper bound of 40%.
    Reconciled,
}

impl SourceKind {
    /// Whether this source needs an hourly file next to the daily one.
    pub fn needs_hourly(&self) -> bool {
        matches!(self, SourceKind::Composite | SourceKind::Reconciled)
    }

    /// The default inclusive upper bound (in percent of missing values) under
    /// which a column is interpolated. `None` means the source is not
    /// interpolated.
    pub fn default_interpolation_bound(&self) -> Option<f64> {
        match self {
            SourceKind::Simple => Some(20.0),
            SourceKind::Composite => None,
            SourceKind::Reconciled => Some(40.0),
        }
    }

    pub(crate) fn default_daily_columns(&self) -> Vec<String> {
        match self {
            SourceKind::Simple => SIMPLE_DAILY_COLUMNS.iter().map(|c| c.to_string()).collect(),
            SourceKind::Composite | SourceKind::Reconciled => Vec::new(),
        }
    }

    pub(crate) fn default_hourly_columns(&self) -> Vec<String> {
        match self {
            SourceKind::Reconciled => RECONCILED_HOURLY_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            SourceKind::Simple | SourceKind::Composite => Vec::new(),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Simple => write!(f, "simple"),
            SourceKind::Composite => write!(f, "composite"),
            SourceKind::Reconciled => write!(f, "reconciled"),
        }
    }
}

/// Time granularity of a silver weather file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Daily,
    Hourly,
}

impl Granularity {
    /// Files whose name contains `daily` (any case) are daily, everything else
    /// in a source directory is treated as hourly.
    ///
    /// ```
    /// use disaster_gold::Granularity;
    ///
    /// assert_eq!(Granularity::from_file_name("miami_daily.parquet"), Granularity::Daily);
    /// assert_eq!(Granularity::from_file_name("miami_hourly.parquet"), Granularity::Hourly);
    /// ```
    pub fn from_file_name(file_name: &str) -> Granularity {
        if file_name.to_lowercase().contains("daily") {
            Granularity::Daily
        } else {
            Granularity::Hourly
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Daily => write!(f, "daily"),
            Granularity::Hourly => write!(f, "hourly"),
        }
    }
}

/// Configuration of one silver weather source.
///
/// `id` is both the name of the source directory under the silver root and
/// the name of the output directory under the gold root. Column lists are
/// ordered canonical names; an empty list keeps every column of that table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    pub kind: SourceKind,
    #[serde(default)]
    pub daily_columns: Vec<String>,
    #[serde(default)]
    pub hourly_columns: Vec<String>,
    #[serde(default)]
    pub interpolation_bound: Option<f64>,
}

impl SourceConfig {
    /// Builds the configuration of a source with the default column lists and
    /// interpolation bound of its kind.
    pub fn new(id: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            id: id.into(),
            kind,
            daily_columns: kind.default_daily_columns(),
            hourly_columns: kind.default_hourly_columns(),
            interpolation_bound: kind.default_interpolation_bound(),
        }
    }

    /// Fills empty column lists and a missing bound with the defaults of the
    /// source kind. Applied after deserializing user configuration.
    pub(crate) fn resolved(mut self) -> Self {
        if self.daily_columns.is_empty() {
            self.daily_columns = self.kind.default_daily_columns();
        }
        if self.hourly_columns.is_empty() {
            self.hourly_columns = self.kind.default_hourly_columns();
        }
        if self.interpolation_bound.is_none() {
            self.interpolation_bound = self.kind.default_interpolation_bound();
        }
        self
    }
}
