use std::path::PathBuf;

use thiserror::Error;

/// Why a file could not become the current dataset.
///
/// The `Display` text is shown to the user as-is.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found or not readable: {}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

/// The JSON parsed but does not have the shape of an exam results file.
///
/// Record indices are 1-based.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("The file must contain a list of records")]
    NotAnArray,

    #[error("The file contains an empty list of records")]
    EmptyArray,

    #[error("Record {index}: not a JSON object")]
    NotAnObject { index: usize },

    #[error("Record {index}: missing fields {fields:?}")]
    MissingFields { index: usize, fields: Vec<String> },

    #[error("Record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}
