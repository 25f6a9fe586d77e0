//! Error taxonomy for conversion and CoNLL-X I/O
//!
//! Every failure is fatal for the sentence or operation that raised it.
//! Nothing here is retried or skipped internally.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for reconstruction, parsing and conversion failures
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Malformed relation line, leafless tree, or malformed CoNLL-X line.
    /// `line` is 1-based when known, 0 otherwise.
    #[error("Format error at line {line}: {message}")]
    Format { line: usize, message: String },

    /// The relation stream and the tree disagree about a dependent.
    #[error("Consistency error at index {index}: relation names '{found}' but tree has '{expected}'")]
    Consistency {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Count mismatch: got {found} sentences for {expected} trees")]
    CountMismatch { expected: usize, found: usize },

    #[error("Invalid PTB tree: {0:?}")]
    InvalidTree(String),

    #[error("Unknown representation: {0:?}")]
    UnknownRepresentation(String),

    #[error("Unknown backend: {0:?}")]
    UnknownBackend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("Failed to open file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A glob entry that could not be read is reported like a file that could
/// not be opened
impl From<glob::GlobError> for ConversionError {
    fn from(err: glob::GlobError) -> Self {
        ConversionError::FileOpen {
            path: err.path().to_path_buf(),
            source: err.into_error(),
        }
    }
}

impl ConversionError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        ConversionError::Format {
            line,
            message: message.into(),
        }
    }

    /// Attach a line number to a `Format` error that was raised without one
    pub(crate) fn at_line(self, line_num: usize) -> Self {
        match self {
            ConversionError::Format { line: 0, message } => ConversionError::Format {
                line: line_num,
                message,
            },
            other => other,
        }
    }
}
