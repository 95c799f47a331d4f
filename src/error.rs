use thiserror::Error;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Protobuf encoding error: {0}")]
    ProtobufError(#[from] prost::EncodeError),

    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] serde_json::Error),

    #[error("Malformed record `{record}`: {message}")]
    FormatError { record: String, message: String },

    #[error("Unsupported operator {op_type} (node `{name}`)")]
    UnsupportedOperator { name: String, op_type: String },

    #[error("Tensor `{name}` spans bytes {offset}+{size}, beyond the {len}-byte data region")]
    OutOfRange { name: String, offset: u64, size: u64, len: usize },

    #[error("Invalid graph structure: {0}")]
    InvalidGraph(String),

    #[error("Failed to load model from {0}: {1}")]
    ModelLoadError(PathBuf, String),
}

impl Error {
    /// Shorthand for a `FormatError` about `record`
    pub fn format(record: impl Into<String>, message: impl Into<String>) -> Self {
        Error::FormatError {
            record: record.into(),
            message: message.into(),
        }
    }
}
