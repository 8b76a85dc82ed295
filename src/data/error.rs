use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading the base table.
///
/// Row numbers are 1-based data rows (the header is not counted).
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed Parquet file: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("cannot convert Parquet column: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: empty state name")]
    EmptyState { row: usize },

    #[error("row {row}: year '{value}' is not an integer")]
    InvalidYear { row: usize, value: String },

    #[error("row {row}: unknown commodity '{value}'")]
    UnknownCommodity { row: usize, value: String },

    #[error("row {row}: production value '{value}' is not a nonnegative number")]
    InvalidProduction { row: usize, value: String },

    #[error("dataset contains no records")]
    Empty,
}
