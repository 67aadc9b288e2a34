//! Reader configuration: filesystem roots, clock rate and parsing semantics.

use std::path::{Path, PathBuf};

/// Clock ticks per second (USER_HZ). Standard value for Linux.
pub const DEFAULT_CLOCK_TICKS: u64 = 100;

/// Selects how the reader treats the known quirks of the legacy parser.
///
/// `Conventional` reads each metric from the file the kernel documents for it.
/// `Literal` reproduces the legacy results bit for bit so that existing
/// dashboards keep their numbers. Callers switching modes see different values
/// for the operations listed on each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Semantics {
    /// - `processes` / `procs_running` come from `/proc/stat`.
    /// - `ram` is the `VmRSS:` value in kB.
    /// - per-process active jiffies are `utime + stime`; a `(comm)` field
    ///   containing spaces counts as one field.
    /// - per-process uptime is system uptime minus the start time.
    /// - `command` has NUL separators replaced by spaces.
    /// - `PRETTY_NAME` is split on the first `=` and unquoted.
    /// - the `jiffies` key also matches `jiffies:`.
    #[default]
    Conventional,
    /// - `processes` / `procs_running` come from `/proc/meminfo`.
    /// - `ram` is the first `Mems_allowed:` token.
    /// - per-process active jiffies are the digits of `utime` and `stime`
    ///   joined as text, then parsed.
    /// - per-process uptime is the leading integer of the stat line divided by
    ///   the clock rate.
    /// - `command` is the first line of `cmdline`, verbatim.
    /// - `PRETTY_NAME` goes through space/quote normalization and has `_`
    ///   turned back into spaces.
    /// - the `jiffies` key must match exactly.
    Literal,
}

/// Where and how the reader looks for its pseudo-files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Process information root. Default: `/proc`.
    pub proc_path: PathBuf,
    /// System configuration root holding `os-release` and `passwd`. Default: `/etc`.
    pub etc_path: PathBuf,
    /// Clock ticks per second used to turn jiffies into seconds. Default: 100.
    pub clock_ticks: u64,
    pub semantics: Semantics,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            proc_path: PathBuf::from("/proc"),
            etc_path: PathBuf::from("/etc"),
            clock_ticks: DEFAULT_CLOCK_TICKS,
            semantics: Semantics::Conventional,
        }
    }
}

impl ReaderConfig {
    /// Creates a config rooted at custom `/proc` and `/etc` directories.
    pub fn new(proc_path: impl Into<PathBuf>, etc_path: impl Into<PathBuf>) -> Self {
        Self {
            proc_path: proc_path.into(),
            etc_path: etc_path.into(),
            ..Self::default()
        }
    }

    pub fn with_proc_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.proc_path = path.into();
        self
    }

    pub fn with_etc_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.etc_path = path.into();
        self
    }

    pub fn with_clock_ticks(mut self, clock_ticks: u64) -> Self {
        self.clock_ticks = clock_ticks;
        self
    }

    pub fn with_semantics(mut self, semantics: Semantics) -> Self {
        self.semantics = semantics;
        self
    }

    /// Clock rate used for division; never zero.
    pub fn ticks_per_second(&self) -> u64 {
        self.clock_ticks.max(1)
    }

    pub(crate) fn proc_file(&self, name: &str) -> PathBuf {
        self.proc_path.join(name)
    }

    pub(crate) fn pid_dir(&self, pid: u32) -> PathBuf {
        self.proc_path.join(pid.to_string())
    }

    pub(crate) fn pid_file(&self, pid: u32, name: &str) -> PathBuf {
        self.pid_dir(pid).join(name)
    }

    pub(crate) fn etc_file(&self, name: &str) -> PathBuf {
        self.etc_path.join(name)
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_path
    }
}
