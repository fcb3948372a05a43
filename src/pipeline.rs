//! The silver-to-gold batch: for every configured source and every roster
//! city with files in that source, merge the weather tables, label them with
//! the city's disasters, and write the gold table.
//!
//! Each (source, city) pair is one unit of work. A unit that fails is
//! recorded in the [`BatchReport`] and the batch moves on to the next one.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::merge::labeler::{label_disasters, DisasterTable};
use crate::merge::{merge_source, SourceTables};
use crate::storage::discovery::{
    find_disaster_file, group_by_city, list_parquet_files, list_subdirectories, CityFiles,
};
use crate::storage::error::StorageError;
use crate::storage::gold_writer::GoldWriter;
use crate::storage::silver_reader::read_parquet;
use crate::types::source::{Granularity, SourceConfig, SourceKind};
use log::{error, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// What was produced for one (source, city) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldSummary {
    pub source_id: String,
    pub city: String,
    pub output: PathBuf,
    /// Rows of the gold table.
    pub rows: usize,
    /// Deduplicated disaster rows of the city.
    pub disaster_rows: usize,
    /// Columns filled by bounded interpolation.
    pub interpolated: Vec<String>,
    /// Columns left with gaps because they were missing too often.
    pub incomplete: Vec<String>,
    pub duplicate_dates: usize,
    pub event_counts: BTreeMap<String, usize>,
    pub unknown_event_types: Vec<String>,
}

/// Result of one unit of work. `city` is `None` when the source itself could
/// not be listed.
#[derive(Debug)]
pub struct UnitOutcome {
    pub source_id: String,
    pub city: Option<String>,
    pub result: Result<GoldSummary, PipelineError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub units: Vec<UnitOutcome>,
}

#[derive(Serialize)]
struct ReportEntry<'a> {
    source_id: &'a str,
    city: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a GoldSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &GoldSummary> {
        self.units.iter().filter_map(|unit| unit.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&UnitOutcome, &PipelineError)> {
        self.units
            .iter()
            .filter_map(|unit| unit.result.as_ref().err().map(|e| (unit, e)))
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    pub fn log_summary(&self) {
        let failed = self.failed().count();
        info!(
            "Silver to gold finished: {} written, {} failed",
            self.units.len() - failed,
            failed
        );
        for (unit, e) in self.failed() {
            warn!(
                "  {} / {}: {}",
                unit.source_id,
                unit.city.as_deref().unwrap_or("-"),
                e
            );
        }
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        let entries: Vec<ReportEntry> = self
            .units
            .iter()
            .map(|unit| ReportEntry {
                source_id: &unit.source_id,
                city: unit.city.as_deref(),
                summary: unit.result.as_ref().ok(),
                error: unit.result.as_ref().err().map(error_chain),
            })
            .collect();
        serde_json::to_string_pretty(&entries).map_err(StorageError::ReportEncode)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), StorageError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| StorageError::ReportWrite(path.to_path_buf(), e))
    }
}

/// The error message followed by its sources.
fn error_chain(e: &PipelineError) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

pub struct SilverToGold {
    config: PipelineConfig,
    writer: GoldWriter,
}

impl SilverToGold {
    pub fn new(config: PipelineConfig) -> SilverToGold {
        let writer = GoldWriter::new(config.gold_root.clone(), config.period.clone());
        SilverToGold { config, writer }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes every unit sequentially, in source then roster order.
    pub fn run(&self) -> BatchReport {
        self.warn_unconfigured_sources();
        let mut report = BatchReport::default();

        for source in &self.config.sources {
            let source_dir = self.config.silver_root.join(&source.id);
            info!("Processing source '{}' ({}) in {:?}", source.id, source.kind, source_dir);

            let files = match list_parquet_files(&source_dir) {
                Ok(files) => files,
                Err(e) => {
                    error!("Skipping source '{}': {}", source.id, e);
                    report.units.push(UnitOutcome {
                        source_id: source.id.clone(),
                        city: None,
                        result: Err(e.into()),
                    });
                    continue;
                }
            };

            let cities = group_by_city(&files, &self.config.cities);
            if cities.is_empty() {
                warn!("No file in {:?} matches a roster city", source_dir);
            }
            for city_files in cities {
                let result = self.process_city(source, &city_files);
                match &result {
                    Ok(summary) => info!(
                        "{} / {}: {} rows, {} disaster rows",
                        source.id, city_files.city, summary.rows, summary.disaster_rows
                    ),
                    Err(e) => error!("{} / {}: {}", source.id, city_files.city, e),
                }
                report.units.push(UnitOutcome {
                    source_id: source.id.clone(),
                    city: Some(city_files.city),
                    result,
                });
            }
        }
        report
    }

    /// Merges, labels and writes the gold table of one city for one source.
    pub fn process_city(&self, source: &SourceConfig, files: &CityFiles) -> Result<GoldSummary, PipelineError> {
        let (daily_path, hourly_path) = weather_paths(source, files)?;
        let disaster_dir = self.config.disaster_path();
        let disaster_path =
            find_disaster_file(&disaster_dir, &files.city)?.ok_or_else(|| PipelineError::MissingDisasterFile {
                city: files.city.clone(),
                dir: disaster_dir.clone(),
            })?;

        let tables = SourceTables {
            daily: read_parquet(daily_path)?,
            hourly: hourly_path.map(read_parquet).transpose()?,
        };
        let disasters = DisasterTable::prepare(read_parquet(&disaster_path)?)?;

        let merged = merge_source(source, tables)?;
        let mut gold = label_disasters(merged.frame, &disasters)?;

        // Everything fallible runs before the write, so a failed unit leaves
        // no gold file behind.
        let event_counts = disasters.event_counts()?;
        let unknown_event_types = disasters.unknown_event_types()?;
        let output = self.writer.write(&mut gold, &source.id, &files.city)?;

        if !unknown_event_types.is_empty() {
            warn!(
                "{}: event types outside the storm event vocabulary: {:?}",
                files.city, unknown_event_types
            );
        }
        if !merged.interpolation.incomplete.is_empty() {
            info!(
                "{} / {}: columns too sparse to interpolate: {:?}",
                source.id, files.city, merged.interpolation.incomplete
            );
        }

        Ok(GoldSummary {
            source_id: source.id.clone(),
            city: files.city.clone(),
            output,
            rows: gold.height(),
            disaster_rows: disasters.len(),
            interpolated: merged.interpolation.interpolated,
            incomplete: merged.interpolation.incomplete,
            duplicate_dates: merged.duplicate_dates,
            event_counts,
            unknown_event_types,
        })
    }

    fn warn_unconfigured_sources(&self) {
        let dirs = match list_subdirectories(&self.config.silver_root) {
            Ok(dirs) => dirs,
            Err(e) => {
                warn!("Cannot list the silver root: {}", e);
                return;
            }
        };
        for dir in dirs {
            let configured = self.config.sources.iter().any(|source| source.id == dir);
            if !configured && dir != self.config.disaster_dir {
                warn!("Silver directory '{}' has no source configuration, skipping it", dir);
            }
        }
    }
}

/// Picks the daily file, and the hourly file when the source needs one. A
/// simple source falls back to its first file when none is named daily.
fn weather_paths<'a>(
    source: &SourceConfig,
    files: &'a CityFiles,
) -> Result<(&'a Path, Option<&'a Path>), PipelineError> {
    let missing = |granularity| PipelineError::MissingWeatherFile {
        source_id: source.id.clone(),
        city: files.city.clone(),
        granularity,
    };

    let daily = match (files.file(Granularity::Daily), source.kind) {
        (Some(path), _) => path,
        (None, SourceKind::Simple) => files
            .files
            .first()
            .map(PathBuf::as_path)
            .ok_or_else(|| missing(Granularity::Daily))?,
        (None, _) => return Err(missing(Granularity::Daily)),
    };
    let hourly = if source.kind.needs_hourly() {
        Some(
            files
                .file(Granularity::Hourly)
                .ok_or_else(|| missing(Granularity::Hourly))?,
        )
    } else {
        None
    };
    Ok((daily, hourly))
}
