//! Error types for the pageseg library.

use std::io;
use thiserror::Error;

/// Result type alias for pageseg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while segmenting a page.
///
/// Only the input boundary (reading renderer output, validating options)
/// reports errors. The segmentation passes themselves treat degenerate input
/// as "nothing to do".
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading a box tree from disk.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The renderer output is not valid JSON for a box tree.
    #[error("Invalid box tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A rendered box has inconsistent geometry.
    #[error("Invalid box: {0}")]
    InvalidBox(String),

    /// The viewport box has no area, so there is nothing to segment.
    #[error("Page has an empty viewport")]
    EmptyPage,

    /// A color literal could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Segmentation options are out of range.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// An injected classifier reported a failure.
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
