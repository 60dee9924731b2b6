//! Error types for the LKG toolkit
//!
//! Provides error handling for:
//! - Parse operations (file contents → document)
//! - Schema checks (document → required fields/columns)
//! - File I/O (read, atomic write)
//! - Network probing (reported, never fatal)
//! - Configuration loading

use std::path::PathBuf;

/// Errors while decoding an input document
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Input is not well-formed in its declared format
    #[error("syntax error in {path}: {message}")]
    Syntax { path: PathBuf, message: String },

    /// Input is well-formed but not shaped as expected
    #[error("unexpected structure in {path}: {message}")]
    Structure { path: PathBuf, message: String },

    /// Input exceeds the configured size limit
    #[error("file too large: {path} is {size} bytes (max: {max})")]
    TooLarge { path: PathBuf, size: u64, max: u64 },
}

impl ParseError {
    /// Create syntax error for path
    pub fn syntax(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Syntax {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create structure error for path
    pub fn structure(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Structure {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Decoded document lacks a required field or column
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Named column absent from the header row
    #[error("missing required column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// Positional column beyond the header width
    #[error("column index {index} out of range in {path} ({width} columns)")]
    ColumnOutOfRange {
        path: PathBuf,
        index: usize,
        width: usize,
    },
}

impl SchemaError {
    /// Create missing column error for path
    pub fn missing_column(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            path: path.into(),
            column: column.into(),
        }
    }
}

/// File cannot be opened or written
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error during file write
    #[error("io error writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output document could not be rendered
    #[error("cannot encode output for {path}: {message}")]
    Encode { path: PathBuf, message: String },
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

    /// Create encode error for path
    pub fn encode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Encode {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Connectivity probe failures
///
/// Each variant renders a distinct message. None is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// Connect or read deadline elapsed
    #[error("timed out: {message}")]
    Timeout { message: String },

    /// Connection could not be established
    #[error("connection error: {message}")]
    Connection { message: String },

    /// Any other request failure
    #[error("request error: {message}")]
    Other { message: String },
}

/// Configuration file problems
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file cannot be read
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has bad values
    #[error("invalid config {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Combined toolkit error
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Input could not be decoded
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Required field or column missing
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// File read or write failed
    #[error("{0}")]
    Io(#[from] IoError),

    /// Probe request failed
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Configuration unreadable or invalid
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl ToolError {
    /// Process exit code for this failure family
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::Parse(_) => 2,
            ToolError::Schema(_) => 3,
            ToolError::Io(_) => 4,
            ToolError::Config(_) => 5,
            ToolError::Network(_) => 6,
        }
    }
}

/// Result type alias for toolkit operations
pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ParseError::syntax("cache.json", "expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "syntax error in cache.json: expected value at line 1 column 1"
        );
    }

    #[test]
    fn schema_error_display() {
        let err = SchemaError::missing_column("links.csv", "original_mention");
        assert_eq!(
            err.to_string(),
            "missing required column 'original_mention' in links.csv"
        );
    }

    #[test]
    fn network_errors_are_distinct() {
        let timeout = NetworkError::Timeout {
            message: "x".to_string(),
        };
        let connection = NetworkError::Connection {
            message: "x".to_string(),
        };
        let other = NetworkError::Other {
            message: "x".to_string(),
        };
        assert_ne!(timeout.to_string(), connection.to_string());
        assert_ne!(connection.to_string(), other.to_string());
    }

    #[test]
    fn error_conversions() {
        let err: ToolError = ParseError::structure("a.json", "top level is not an object").into();
        assert!(matches!(err, ToolError::Parse(_)));
        assert_eq!(err.exit_code(), 2);

        let err: ToolError = SchemaError::missing_column("t.csv", "mention").into();
        assert_eq!(err.exit_code(), 3);

        let err: ToolError = IoError::read("t.csv", std::io::ErrorKind::NotFound.into()).into();
        assert_eq!(err.exit_code(), 4);
    }
}
