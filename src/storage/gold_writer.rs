//! Gold Writer: persists labeled tables as one parquet file per city and source.

use crate::storage::error::StorageError;
use log::info;
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Period label used in gold file names when none is configured.
pub const DEFAULT_PERIOD: &str = "1973_2024";

/// Writes gold tables to `<root>/<source_id>/<city>_<period>.parquet`.
#[derive(Debug, Clone)]
pub struct GoldWriter {
    root: PathBuf,
    period: String,
}

impl GoldWriter {
    pub fn new(root: impl Into<PathBuf>, period: impl Into<String>) -> GoldWriter {
        GoldWriter {
            root: root.into(),
            period: period.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination of the gold table of `city` for `source_id`.
    ///
    /// ```
    /// use disaster_gold::GoldWriter;
    /// use std::path::Path;
    ///
    /// let writer = GoldWriter::new("data/gold", "1973_2024");
    /// assert_eq!(
    ///     writer.path_for("base_1", "new york"),
    ///     Path::new("data/gold/base_1/new york_1973_2024.parquet")
    /// );
    /// ```
    pub fn path_for(&self, source_id: &str, city: &str) -> PathBuf {
        self.root
            .join(source_id)
            .join(format!("{}_{}.parquet", city, self.period))
    }

    /// Writes `df` with Snappy compression, creating the source directory if
    /// needed. An existing file at the destination is overwritten.
    pub fn write(&self, df: &mut DataFrame, source_id: &str, city: &str) -> Result<PathBuf, StorageError> {
        let path = self.path_for(source_id, city);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| StorageError::DirCreation(dir.to_path_buf(), e))?;
        }
        let file = fs::File::create(&path).map_err(|e| StorageError::ParquetWriteIo(path.clone(), e))?;
        ParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .finish(df)
            .map_err(|e| StorageError::ParquetWritePolars(path.clone(), e))?;
        info!("Wrote {} gold rows to {:?}", df.height(), path);
        Ok(path)
    }
}
