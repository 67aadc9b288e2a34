//! Filesystem seam between the reader and the pseudo-files it parses.
//!
//! The `FileSystem` trait lets the reader work against the real `/proc` on
//! Linux or against an in-memory tree in tests and on other platforms.

use std::io;
use std::path::{Path, PathBuf};

/// Abstraction for the read-only filesystem operations the reader needs.
pub trait FileSystem: Send + Sync {
    /// Reads a whole file into memory.
    ///
    /// The file handle is owned by the call and closed before it returns,
    /// on success and on error alike.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// `true` if anything (file or directory) lives at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Checks if a path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Lists entries in a directory as full paths.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// The host filesystem, through `std::fs`.
///
/// Point the reader's config at another root (a container's `/proc`, a
/// captured tree) to read a different host.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }
}
