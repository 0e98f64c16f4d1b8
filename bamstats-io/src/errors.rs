use std::io;

use thiserror::Error;

/// Error type for reading alignment input.
#[derive(Error, Debug)]
pub enum BamReadError {
    #[error("Failed to open alignment input '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read BAM header: {0}")]
    Header(#[source] io::Error),

    /// `index` is 1-based, counted from the first record after the header.
    #[error("Failed to decode alignment record {index}: {source}")]
    Record {
        index: u64,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, BamReadError>;
