use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NetworkError>;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {}", .path.display(), .message)]
    Parse { path: PathBuf, message: String },

    #[error("no snapshot could be loaded from {}", .0.display())]
    EmptyBatch(PathBuf),

    #[error("cannot aggregate an empty sequence of snapshots")]
    NothingToAggregate,

    #[error("network has no nodes")]
    EmptyNetwork,

    #[error("percentile must lie in [0, 100], got {0}")]
    InvalidPercentile(f64),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("degree table error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NetworkError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        NetworkError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
