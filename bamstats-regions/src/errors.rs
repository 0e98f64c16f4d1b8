use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegionIndexError {
    #[error("Region payload is not valid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Region payload root must be an array")]
    RootNotArray,

    #[error("Region {index} must be an object")]
    ItemNotObject { index: usize },

    #[error("Region {index} has an unexpected type for field '{field}'")]
    UnexpectedFieldType { index: usize, field: &'static str },

    #[error("Region {index} has an invalid span {start}-{end}")]
    InvalidSpan { index: usize, start: i64, end: i64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RegionIndexError>;
