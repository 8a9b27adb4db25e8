use std::path::PathBuf;

use thiserror::Error;

use crate::dataset::Stream;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("please define {var}")]
    ConfigurationMissing { var: &'static str },
    #[error("{var}={value:?} is not a valid setting")]
    InvalidConfig { var: &'static str, value: String },
    #[error("{} is not a good path: {source}", path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{}:{line}: {reason}", path.display())]
    ManifestRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },
    #[error("failed to decode image {}", path.display())]
    DecodeFailed { path: PathBuf },
    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: opencv::Error,
    },
    #[error("no {stream} frame at timestamp {timestamp}")]
    MissingFrame { timestamp: u64, stream: Stream },
    #[error("timestamp {timestamp} has no {missing} frame")]
    IncompletePair { timestamp: u64, missing: Stream },
}

pub type Result<T> = std::result::Result<T, LoaderError>;
