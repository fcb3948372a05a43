use crate::storage::error::StorageError;
use log::debug;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Reads a whole silver parquet file into memory.
pub fn read_parquet(path: &Path) -> Result<DataFrame, StorageError> {
    let file = File::open(path).map_err(|e| StorageError::FileOpen(path.to_path_buf(), e))?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| StorageError::ParquetRead(path.to_path_buf(), e))?;
    debug!("Read {} rows x {} columns from {:?}", df.height(), df.width(), path);
    Ok(df)
}
