use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document not found: {0}")]
    NotFound(PathBuf),

    #[error("no extraction strategy supports {0}")]
    Unsupported(PathBuf),

    #[error("could not extract text from {}: {}", .path.display(), .attempts.join("; "))]
    AllStrategiesFailed {
        path: PathBuf,
        /// One `"<strategy>: <error>"` entry per strategy tried, in order.
        attempts: Vec<String>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "pdf")]
    #[error("pdf error: {0}")]
    Pdf(String),
}
