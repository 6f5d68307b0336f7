// src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataTableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("file format '{0}' is not supported")]
    UnsupportedFormat(String),

    #[error("card field '{0}' does not exist in the data")]
    UnknownCardField(String),
}

pub type Result<T> = std::result::Result<T, DataTableError>;
