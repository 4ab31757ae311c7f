use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Source file not found (404): {0}")]
    NotFound(String),
    #[error("Server error ({status}) while downloading {url}")]
    ServerError { status: u16, url: String },
    #[error("Unexpected HTTP status {status} while downloading {url}")]
    Status { status: u16, url: String },
    #[error("Failed to read response body: {0}")]
    Body(#[source] std::io::Error),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to replace cached file {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Io {
            path: path.into(),
            source,
        }
    }
}
