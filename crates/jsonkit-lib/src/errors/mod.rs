use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Permission denied: {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error reading {}: {message}", path.display())]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, JsonError>;

/// Discriminant of a [`JsonError`], for callers that branch on the failure
/// category without caring about its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Serialization,
    Parse,
    FileNotFound,
    PermissionDenied,
    Io,
}

impl JsonError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JsonError::Serialization(_) => ErrorKind::Serialization,
            JsonError::Parse(_) => ErrorKind::Parse,
            JsonError::FileNotFound { .. } => ErrorKind::FileNotFound,
            JsonError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            JsonError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Translate an I/O failure on `path` into the file-level taxonomy.
    ///
    /// `NotFound` and `PermissionDenied` get their own variants; everything
    /// else is wrapped as [`JsonError::Io`] with the original message kept.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => JsonError::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => JsonError::PermissionDenied { path, source: err },
            _ => JsonError::Io {
                message: err.to_string(),
                path,
                source: err,
            },
        }
    }

    /// The underlying serde_json diagnostic, if this error carries one.
    pub fn json_cause(&self) -> Option<&serde_json::Error> {
        match self {
            JsonError::Serialization(e) | JsonError::Parse(e) => Some(e),
            _ => None,
        }
    }
}
