use polars::error::PolarsError;
use polars::prelude::DataType;
use crate::types::source::SourceKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Required column '{column}' not found in {table} table")]
    MissingColumn { table: String, column: String },

    #[error("Column '{column}' of the {table} table has type {dtype}, which cannot be read as a date")]
    UnsupportedDateType {
        table: String,
        column: String,
        dtype: DataType,
    },

    #[error("Source '{source_id}' is {kind} and needs an hourly table")]
    MissingHourlyTable { source_id: String, kind: SourceKind },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
