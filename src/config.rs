//! Pipeline configuration: where the silver and gold tiers live, which cities
//! are processed, and how each weather source is merged.
//!
//! A configuration is either built in code or loaded from a TOML file such as:
//!
//! ```toml
//! silver_root = "data/silver"
//! gold_root = "data/gold"
//! cities = ["miami", "chicago"]
//!
//! [[sources]]
//! id = "base_2"
//! kind = "simple"
//! interpolation_bound = 25.0
//! ```
//!
//! Omitted fields take the defaults of [`PipelineConfig::default`], and omitted
//! source fields take the defaults of the source kind.

use crate::storage::gold_writer::DEFAULT_PERIOD;
use crate::types::source::{SourceConfig, SourceKind};
use bon::bon;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SILVER_ROOT: &str = "data/silver";
pub const DEFAULT_GOLD_ROOT: &str = "data/gold";
pub const DEFAULT_DISASTER_DIR: &str = "base_disaster";

pub const DEFAULT_CITIES: [&str; 8] = [
    "dallas",
    "houston",
    "miami",
    "nashville",
    "new york",
    "oklahoma city",
    "albuquerque",
    "chicago",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}'")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding one subdirectory per weather source plus the disaster directory.
    pub silver_root: PathBuf,
    /// Name of the disaster subdirectory of `silver_root`.
    pub disaster_dir: String,
    pub gold_root: PathBuf,
    /// Period label appended to gold file names.
    pub period: String,
    /// City roster, in processing order.
    pub cities: Vec<String>,
    /// Weather sources, in processing order.
    pub sources: Vec<SourceConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            silver_root: PathBuf::from(DEFAULT_SILVER_ROOT),
            disaster_dir: DEFAULT_DISASTER_DIR.to_string(),
            gold_root: PathBuf::from(DEFAULT_GOLD_ROOT),
            period: DEFAULT_PERIOD.to_string(),
            cities: DEFAULT_CITIES.iter().map(|city| city.to_string()).collect(),
            sources: default_sources(),
        }
    }
}

/// `base_1` composite, `base_2` simple, `base_3` reconciled.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new("base_1", SourceKind::Composite),
        SourceConfig::new("base_2", SourceKind::Simple),
        SourceConfig::new("base_3", SourceKind::Reconciled),
    ]
}

#[bon]
impl PipelineConfig {
    /// Builds a configuration; every field left unset takes its default.
    ///
    /// ```
    /// use disaster_gold::PipelineConfig;
    ///
    /// let config = PipelineConfig::builder()
    ///     .silver_root("fixtures/silver")
    ///     .cities(vec!["miami".to_string()])
    ///     .build();
    /// assert_eq!(config.disaster_dir, "base_disaster");
    /// assert_eq!(config.sources.len(), 3);
    /// ```
    #[builder]
    pub fn new(
        #[builder(into)] silver_root: Option<PathBuf>,
        #[builder(into)] disaster_dir: Option<String>,
        #[builder(into)] gold_root: Option<PathBuf>,
        #[builder(into)] period: Option<String>,
        cities: Option<Vec<String>>,
        sources: Option<Vec<SourceConfig>>,
    ) -> PipelineConfig {
        let defaults = PipelineConfig::default();
        PipelineConfig {
            silver_root: silver_root.unwrap_or(defaults.silver_root),
            disaster_dir: disaster_dir.unwrap_or(defaults.disaster_dir),
            gold_root: gold_root.unwrap_or(defaults.gold_root),
            period: period.unwrap_or(defaults.period),
            cities: cities.unwrap_or(defaults.cities),
            sources: sources.unwrap_or(defaults.sources),
        }
    }
}

impl PipelineConfig {
    /// Loads and validates a TOML configuration file.
    pub fn from_toml_file(path: &Path) -> Result<PipelineConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config: PipelineConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.resolved().validated()
    }

    fn resolved(mut self) -> PipelineConfig {
        self.sources = self.sources.into_iter().map(SourceConfig::resolved).collect();
        self
    }

    /// Checks that the roster and sources can be processed.
    pub fn validated(self) -> Result<PipelineConfig, ConfigError> {
        if self.cities.iter().any(|city| city.trim().is_empty()) {
            return Err(ConfigError::Invalid("city names must not be empty".to_string()));
        }
        let mut ids = HashSet::new();
        for source in &self.sources {
            if !ids.insert(source.id.as_str()) {
                return Err(ConfigError::Invalid(format!("source '{}' is listed twice", source.id)));
            }
            if source.id == self.disaster_dir {
                return Err(ConfigError::Invalid(format!(
                    "source '{}' collides with the disaster directory",
                    source.id
                )));
            }
            if let Some(bound) = source.interpolation_bound {
                if !(0.0..=100.0).contains(&bound) {
                    return Err(ConfigError::Invalid(format!(
                        "interpolation bound {} of source '{}' is not a percentage",
                        bound, source.id
                    )));
                }
            }
        }
        Ok(self)
    }

    pub fn disaster_path(&self) -> PathBuf {
        self.silver_root.join(&self.disaster_dir)
    }
}
