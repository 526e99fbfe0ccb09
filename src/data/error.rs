use std::path::PathBuf;

use thiserror::Error;

/// Failures while building the clean dataset. Every variant is fatal: no
/// partial dataset is ever returned.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot read {}: {source}", path.display())]
    MissingSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_name} is missing required column '{column}'")]
    SchemaMismatch {
        source_name: String,
        column: &'static str,
    },

    #[error("{source_name}, row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        source_name: String,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
