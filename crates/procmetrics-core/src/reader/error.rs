//! Error type returned by every reader operation.

use std::io;
use std::path::{Path, PathBuf};

/// Why a metric could not be produced.
///
/// A metric that reads as zero is `Ok(0)`; every other outcome is one of these.
#[derive(Debug)]
pub enum ReadError {
    /// The pseudo-file could not be opened or read (missing, permission denied).
    Unavailable { path: PathBuf, source: io::Error },
    /// The file was read but the sought key or line is absent.
    KeyNotFound { path: PathBuf, key: String },
    /// The field exists but could not be parsed.
    Malformed { path: PathBuf, detail: String },
    /// The `/proc/[pid]` directory does not exist (process exited).
    ProcessGone(u32),
}

impl ReadError {
    pub(crate) fn unavailable(path: &Path, source: io::Error) -> Self {
        ReadError::Unavailable {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn key_not_found(path: &Path, key: impl Into<String>) -> Self {
        ReadError::KeyNotFound {
            path: path.to_path_buf(),
            key: key.into(),
        }
    }

    pub(crate) fn malformed(path: &Path, detail: impl Into<String>) -> Self {
        ReadError::Malformed {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }

    /// Path of the pseudo-file involved, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ReadError::Unavailable { path, .. }
            | ReadError::KeyNotFound { path, .. }
            | ReadError::Malformed { path, .. } => Some(path),
            ReadError::ProcessGone(_) => None,
        }
    }

    /// `true` when the source file could not be read at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ReadError::Unavailable { .. } | ReadError::ProcessGone(_)
        )
    }
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::Unavailable { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            ReadError::KeyNotFound { path, key } => {
                write!(f, "{} not found in {}", key, path.display())
            }
            ReadError::Malformed { path, detail } => {
                write!(f, "malformed {}: {}", path.display(), detail)
            }
            ReadError::ProcessGone(pid) => write!(f, "process {} disappeared", pid),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Unavailable { source, .. } => Some(source),
            _ => None,
        }
    }
}
