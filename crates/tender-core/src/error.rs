//! Error types for tender-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot merge an empty list of analyses")]
    EmptyInput,

    #[error("No successful analyses in upload response")]
    NoRecords,

    #[error("Analysis failed: {0}")]
    Analysis(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
