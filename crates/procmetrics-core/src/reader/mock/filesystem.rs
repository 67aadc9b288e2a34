//! In-memory `/proc` and `/etc` tree for exercising the reader anywhere.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::reader::traits::FileSystem;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    File(String),
    Dir,
    /// Present but unreadable, like `/proc/[pid]/environ` of another user.
    Denied,
}

/// In-memory filesystem.
///
/// Paths are kept in a sorted map, so `read_dir` lists entries in a stable
/// order. Adding a path creates its missing parent directories.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    nodes: BTreeMap<PathBuf, Node>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.insert(path.as_ref(), Node::File(content.into()));
    }

    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), Node::Dir);
    }

    /// Marks `path` as existing but unreadable: reads fail with `PermissionDenied`.
    pub fn deny(&mut self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), Node::Denied);
    }

    /// Removes a file or an empty marker, leaving its directory in place.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if self.nodes.get(path) != Some(&Node::Dir) {
            self.nodes.remove(path);
        }
    }

    /// Adds `/proc/[pid]/` with the three files the reader consumes.
    ///
    /// `cmdline` is NUL-separated, as the kernel writes it.
    pub fn add_process(&mut self, pid: u32, stat: &str, status: &str, cmdline: &str) {
        let dir = PathBuf::from("/proc").join(pid.to_string());
        self.add_file(dir.join("stat"), stat);
        self.add_file(dir.join("status"), status);
        self.add_file(dir.join("cmdline"), cmdline);
    }

    /// Copies a captured directory tree into memory under `mount_point`.
    ///
    /// Files that are not valid UTF-8 are skipped.
    pub fn from_snapshot(dir: &Path, mount_point: &Path) -> io::Result<Self> {
        let mut fs = Self::new();
        fs.copy_tree(dir, mount_point)?;
        Ok(fs)
    }

    fn copy_tree(&mut self, real: &Path, virt: &Path) -> io::Result<()> {
        self.add_dir(virt);
        for entry in std::fs::read_dir(real)? {
            let entry = entry?;
            let target = virt.join(entry.file_name());
            let kind = entry.file_type()?;
            if kind.is_dir() {
                self.copy_tree(&entry.path(), &target)?;
            } else if kind.is_file()
                && let Ok(content) = std::fs::read_to_string(entry.path())
            {
                self.add_file(&target, content);
            }
        }
        Ok(())
    }

    fn insert(&mut self, path: &Path, node: Node) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.nodes
                .entry(ancestor.to_path_buf())
                .or_insert(Node::Dir);
        }
        self.nodes.insert(path.to_path_buf(), node);
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file: {}", path.display()),
    )
}

fn denied(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("permission denied: {}", path.display()),
    )
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        match self.nodes.get(path) {
            Some(Node::File(content)) => Ok(content.clone()),
            Some(Node::Denied) => Err(denied(path)),
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("is a directory: {}", path.display()),
            )),
            None => Err(not_found(path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.nodes.get(path) == Some(&Node::Dir)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        match self.nodes.get(path) {
            Some(Node::Dir) => {}
            Some(Node::Denied) => return Err(denied(path)),
            _ => return Err(not_found(path)),
        }
        Ok(self
            .nodes
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_file_creates_parents() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/meminfo", "MemTotal: 16384 kB\n");

        assert!(fs.exists(Path::new("/proc/meminfo")));
        assert!(fs.is_dir(Path::new("/proc")));
        assert!(fs.is_dir(Path::new("/")));
        assert!(!fs.is_dir(Path::new("/proc/meminfo")));
        assert_eq!(
            fs.read_to_string(Path::new("/proc/meminfo")).unwrap(),
            "MemTotal: 16384 kB\n"
        );
    }

    #[test]
    fn test_read_dir_lists_direct_children_sorted() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/2/stat", "2 (kthreadd) S");
        fs.add_file("/proc/1/stat", "1 (init) S");
        fs.add_file("/proc/1/status", "Name:\tinit\n");
        fs.add_file("/proc/uptime", "1.00 1.00\n");

        assert_eq!(
            fs.read_dir(Path::new("/proc")).unwrap(),
            vec![
                PathBuf::from("/proc/1"),
                PathBuf::from("/proc/2"),
                PathBuf::from("/proc/uptime"),
            ]
        );
        assert_eq!(fs.read_dir(Path::new("/proc/1")).unwrap().len(), 2);
        assert!(fs.read_dir(Path::new("/proc/uptime")).is_err());
    }

    #[test]
    fn test_add_process() {
        let mut fs = MockFs::new();
        fs.add_process(1234, "1234 (bash) S 1", "Uid:\t1000\n", "/bin/bash\0");

        assert!(fs.is_dir(Path::new("/proc/1234")));
        for file in ["stat", "status", "cmdline"] {
            assert!(fs.exists(&Path::new("/proc/1234").join(file)));
        }
    }

    #[test]
    fn test_remove_file_keeps_directory() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/1/stat", "1 (init) S");
        fs.remove_file("/proc/1/stat");
        fs.remove_file("/proc/1");

        assert!(!fs.exists(Path::new("/proc/1/stat")));
        assert!(fs.is_dir(Path::new("/proc/1")));
    }

    #[test]
    fn test_missing_and_denied() {
        let mut fs = MockFs::new();
        fs.deny("/proc/1/status");

        let err = fs.read_to_string(Path::new("/nonexistent")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let err = fs.read_to_string(Path::new("/proc/1/status")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(fs.exists(Path::new("/proc/1/status")));
        assert!(fs.is_dir(Path::new("/proc/1")));
    }

    #[test]
    fn test_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("7")).unwrap();
        std::fs::write(dir.path().join("7").join("cmdline"), "sleep\0").unwrap();
        std::fs::write(dir.path().join("uptime"), "1.00 2.00\n").unwrap();

        let fs = MockFs::from_snapshot(dir.path(), Path::new("/proc")).unwrap();
        assert!(fs.is_dir(Path::new("/proc/7")));
        assert_eq!(
            fs.read_to_string(Path::new("/proc/7/cmdline")).unwrap(),
            "sleep\0"
        );
        assert_eq!(
            fs.read_to_string(Path::new("/proc/uptime")).unwrap(),
            "1.00 2.00\n"
        );
    }
}
