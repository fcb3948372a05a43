//! Silver-to-gold consolidation of city weather series and storm events.
//!
//! Per city and weather source, the silver tables are merged into one daily
//! weather table (hourly observations averaged per day, gaps interpolated
//! within a per-source bound, seasons tagged), outer-joined with the city's
//! disaster events, labeled with `disaster_occurred`, and written as a gold
//! parquet file.
//!
//! ```
//! use chrono::NaiveDate;
//! use disaster_gold::{label_disasters, merge_source, DisasterTable, SourceConfig, SourceKind, SourceTables};
//! use polars::df;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let day = |d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap();
//! let daily = df!(
//!     "date" => [day(1), day(2)],
//!     "maximum_temperature" => [14.0, 16.0],
//!     "minimum_temperature" => [6.0, 8.0]
//! )?;
//! let disasters = df!(
//!     "date" => [day(1)],
//!     "eventType" => ["Flood"],
//!     "location" => ["Houston"]
//! )?;
//!
//! let config = SourceConfig::new("base_2", SourceKind::Simple);
//! let merged = merge_source(&config, SourceTables { daily, hourly: None })?;
//! let gold = label_disasters(merged.frame, &DisasterTable::prepare(disasters)?)?;
//!
//! assert_eq!(gold.height(), 2);
//! assert_eq!(gold.column("disaster_occurred")?.i32()?.get(0), Some(1));
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod merge;
mod pipeline;
mod quality;
mod storage;
mod types;
mod utils;

pub use config::{default_sources, ConfigError, PipelineConfig, DEFAULT_CITIES};
pub use error::PipelineError;
pub use pipeline::{BatchReport, GoldSummary, SilverToGold, UnitOutcome};

pub use types::event_type::{EventType, UnknownEventType};
pub use types::season::Season;
pub use types::source::{Granularity, SourceConfig, SourceKind, DATE_COLUMN};

pub use quality::interpolate::{interpolate_bounded, InterpolationBounds, InterpolationOutcome};
pub use quality::null_profile::{ColumnNulls, NullProfile};

pub use merge::columns::SEASON_COLUMN;
pub use merge::error::MergeError;
pub use merge::hourly::aggregate_hourly;
pub use merge::labeler::{
    label_disasters, DisasterTable, DISASTER_OCCURRED_COLUMN, EVENT_TYPE_COLUMN, LOCATION_COLUMN,
};
pub use merge::reconciled::RECONCILIATION_COLUMNS;
pub use merge::{merge_source, MergedWeather, SourceTables};

pub use storage::discovery::{find_disaster_file, group_by_city, list_parquet_files, CityFiles};
pub use storage::error::StorageError;
pub use storage::gold_writer::{GoldWriter, DEFAULT_PERIOD};
pub use storage::silver_reader::read_parquet;
