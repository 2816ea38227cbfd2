//! Error taxonomy shared by every stage of the estimation pipeline.

use thiserror::Error;

/// Errors that can occur while handling an estimation request.
///
/// Each variant corresponds to one failure class with its own HTTP
/// mapping, applied by the response formatter in the server crate.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Bad or missing client input: size, extension, unparseable fields
    #[error("{0}")]
    Validation(String),

    /// Artifact write/read failure; fatal for the request
    #[error("storage failure at {path}: {source}")]
    StorageIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Predictor unreachable, non-success status, or embedded error field
    #[error("prediction service failure: {0}")]
    Upstream(String),

    /// Document store operation failure
    #[error("record store failure: {0}")]
    Persistence(String),

    /// Lookup miss for a persisted record
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Oversized payload rejection, shared by the size rule and the
    /// multipart reader so both paths report the same message.
    pub fn file_too_large(max_bytes: usize) -> Self {
        Self::Validation(format!("file too large, max size: {max_bytes} bytes"))
    }

    pub fn unsupported_format(filename: &str) -> Self {
        Self::Validation(format!("unsupported file format: {filename}"))
    }

    pub fn storage_io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::StorageIo {
            path: path.into(),
            source,
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Convenience type alias for Results across the pipeline crates.
pub type Result<T> = std::result::Result<T, ServiceError>;
