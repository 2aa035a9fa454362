//! Error types for document ingress and egress
//!
//! - [`ParseError`]: text → document value
//! - [`ExportError`]: graph → generated text
//! - [`IoError`]: file-level operations wrapping both

use std::path::PathBuf;

/// Errors turning text into a document value
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No parser registered for file extension
    #[error("no parser registered for extension: '{0}'")]
    NoParserForExtension(String),

    /// Malformed input
    #[error("Invalid {format} syntax: {message}")]
    Syntax {
        format: &'static str,
        message: String,
    },
}

impl ParseError {
    /// Create syntax error
    pub fn syntax(format: &'static str, message: impl Into<String>) -> Self {
        Self::Syntax {
            format,
            message: message.into(),
        }
    }
}

/// Errors generating export output
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Format name not recognised
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Format produces several files and cannot be rendered as one text
    #[error("export format '{0}' produces one file per master")]
    MultiFile(&'static str),

    /// Serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// File-level import/export errors
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// Import result carried blocking errors
    #[error("import blocked by {} error(s): {}", .0.len(), .0.join("; "))]
    ImportRejected(Vec<String>),

    /// IO error reading a file
    #[error("io error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error writing a file
    #[error("io error writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IoError {
    /// Create read error for path
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create write error for path
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for file-level operations
pub type Result<T> = std::result::Result<T, IoError>;
