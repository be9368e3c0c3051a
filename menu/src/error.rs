use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to get detections for an image.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("text detection failed for {}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("text detection failed")]
    Detection(#[source] anyhow::Error),
}

/// Failure to persist the records of one image.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to encode records for {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
