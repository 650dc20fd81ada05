use crate::startup_checks::StartupCheckError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a batch before any file is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Startup(#[from] StartupCheckError),

    #[error("Failed to list directory {}: {source}", .path.display())]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single file could not be stamped. Never aborts the batch.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("It might be a non-image file or corrupted: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to write output image: {0}")]
    Encode(#[source] image::ImageError),
}
