//! Error type for the library API.

use std::path::{Path, PathBuf};

/// Failures that abort a run. Per-document conversion failures are not errors; see
/// [`Converted`](crate::engine::convert::Converted).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source configuration is missing a required option (or it resolves to nothing).
    #[error("{0}")]
    Requirements(String),

    /// Sorting was requested on a field that has no comparator. Programming error.
    #[error("cannot sort by field {0}")]
    UnknownSortField(String),

    /// A high-water value that cannot be compared with its field.
    #[error("invalid high-water value {value:?} for field {field}")]
    InvalidHighWater { field: String, value: String },

    /// A delimited regex name pattern failed to compile.
    #[error("invalid name pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A glob name pattern failed to parse.
    #[error("invalid glob {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// A depth expression that is not `<op> <n>`.
    #[error("invalid depth expression {0:?}")]
    InvalidDepth(String),

    /// The directory walk failed on a path.
    #[error("walk failed at {}: {source}", .path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<unknown>".to_string()))]
    Walk {
        path: Option<PathBuf>,
        #[source]
        source: walkdir::Error,
    },

    /// Reading a file or directory failed.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            source,
        }
    }

    /// Filesystem path the error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            SourceError::Walk { path, .. } => path.as_deref(),
            SourceError::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<walkdir::Error> for SourceError {
    fn from(err: walkdir::Error) -> Self {
        SourceError::Walk {
            path: err.path().map(PathBuf::from),
            source: err,
        }
    }
}
