use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnrichmentError>;

#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),

    #[error("Geocoding credential error: {0}")]
    Credential(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Missing required column '{column}' in {source_file}")]
    MissingColumn { column: String, source_file: String },

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Output location already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
