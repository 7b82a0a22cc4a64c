use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DorkError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("could not read {path}: {source}")]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {reason}")]
    TransientFetch { url: String, reason: String },

    #[error("relay response could not be decoded: {0}")]
    RelayDecode(String),

    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DorkError>;
