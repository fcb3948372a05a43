use crate::config::ConfigError;
use crate::merge::error::MergeError;
use crate::storage::error::StorageError;
use crate::types::source::Granularity;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No {granularity} file for '{city}' in source '{source_id}'")]
    MissingWeatherFile {
        source_id: String,
        city: String,
        granularity: Granularity,
    },

    #[error("No disaster file for '{city}' in '{}'", .dir.display())]
    MissingDisasterFile { city: String, dir: PathBuf },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] polars::error::PolarsError),
}

impl PipelineError {
    /// Whether the error means an input file was not there, as opposed to an
    /// input that could not be read or merged.
    pub fn is_missing_file(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingWeatherFile { .. } | PipelineError::MissingDisasterFile { .. }
        )
    }
}
