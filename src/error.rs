use std::str::Utf8Error;

use thiserror::Error;

use crate::ScalarType;

#[derive(Error, Debug)]
pub enum PlyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid ascii data: {0}")]
    InvalidAscii(#[from] Utf8Error),

    #[error("Invalid PLY header: {0}")]
    InvalidHeader(String),

    #[error("Unsupported PLY format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid {data_type} value: {token:?}")]
    InvalidValue {
        token: String,
        data_type: ScalarType,
    },

    #[error("Failed to parse {element} {index}: {reason}")]
    Parse {
        element: String,
        index: usize,
        reason: String,
    },

    #[error("Body ends inside {element} {index}")]
    Truncated { element: String, index: usize },

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Unsupported layout: {0}")]
    UnsupportedLayout(String),

    #[error("Index {index} out of bounds for {count} records")]
    IndexOutOfBounds { index: usize, count: usize },

    #[error("Failed to read next ASCII property")]
    NoPropertyFound,

    #[error("Too many properties provided for element")]
    TooManyProperties,
}

pub type Result<T> = std::result::Result<T, PlyError>;
