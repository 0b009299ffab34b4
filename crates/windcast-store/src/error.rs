//! Error types for artifact persistence.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors arising while reading or writing artifacts.
#[derive(Debug)]
pub enum StoreError {
    /// A filesystem operation failed.
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// An artifact could not be encoded or decoded.
    Serialization {
        /// Artifact description or file path.
        artifact: String,
        /// The underlying error.
        source: serde_json::Error,
    },
    /// A required artifact was never stored.
    Missing {
        /// Artifact description.
        artifact: String,
    },
    /// A lock guarding in-memory artifacts was poisoned.
    Poisoned {
        /// Which lock.
        context: &'static str,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error on {}: {source}", path.display()),
            Self::Serialization { artifact, source } => {
                write!(f, "cannot encode or decode {artifact}: {source}")
            }
            Self::Missing { artifact } => write!(f, "{artifact} has not been stored"),
            Self::Poisoned { context } => write!(f, "poisoned lock: {context}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            Self::Missing { .. } | Self::Poisoned { .. } => None,
        }
    }
}
