//! Error types for the logging pipeline

use super::severity::{Category, Level};

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// An entry's maximum severity matched the exception mask. Raised
    /// synchronously from `finalize` after the queue has drained.
    #[error("escalated {category} entry at level {level}: {summary}")]
    Escalated {
        category: Category,
        level: Level,
        summary: String,
    },

    /// IO error with context
    #[error("IO error while {operation}: {source}")]
    IoOperation {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Sink destination rejected a write
    #[error("sink '{name}' is not writable: {message}")]
    SinkUnwritable { name: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(operation: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            source,
        }
    }

    /// Create a sink unwritable error
    pub fn sink_unwritable(name: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkUnwritable {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
