//! The metrics reader: one filesystem, one config, stateless operations.
//!
//! System-wide operations live in `system.rs`, per-process ones in
//! `process.rs`. This file holds the shared read helper and the aggregate
//! snapshot operations.

use std::path::Path;

use tracing::{debug, trace};

use crate::model::{ProcessSnapshot, SystemSnapshot};
use crate::reader::config::ReaderConfig;
use crate::reader::error::ReadError;
use crate::reader::fallback::Fallback;
use crate::reader::traits::FileSystem;

/// Reads metrics from `/proc` and `/etc` through a [`FileSystem`].
///
/// Holds no state besides its configuration: every call reads its file anew,
/// so calls may be issued in any order and at any cadence.
pub struct MetricsReader<F: FileSystem> {
    pub(crate) fs: F,
    pub(crate) config: ReaderConfig,
}

impl<F: FileSystem> MetricsReader<F> {
    /// Creates a new reader.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `config` - Roots, clock rate and semantics
    pub fn new(fs: F, config: ReaderConfig) -> Self {
        Self { fs, config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// View of this reader that returns zero-values instead of errors.
    pub fn fallback(&self) -> Fallback<'_, F> {
        Fallback::new(self)
    }

    /// Reads a whole pseudo-file. The handle is closed before this returns.
    pub(crate) fn read(&self, path: &Path) -> Result<String, ReadError> {
        trace!(path = %path.display(), "reading");
        self.fs
            .read_to_string(path)
            .map_err(|e| ReadError::unavailable(path, e))
    }

    /// Reads every system-wide metric once.
    ///
    /// Failed metrics are `None`; the failure is logged at debug level.
    pub fn snapshot(&self) -> SystemSnapshot {
        let cpu = observe("cpu_aggregate", self.cpu_aggregate());
        SystemSnapshot {
            operating_system: observe("operating_system", self.operating_system()),
            kernel: observe("kernel", self.kernel()),
            memory_used_kb: observe("memory_utilization", self.memory_utilization()),
            uptime_secs: observe("uptime", self.uptime()),
            jiffies: observe("jiffies", self.jiffies()),
            active_jiffies: cpu.map(|c| c.active()),
            idle_jiffies: cpu.map(|c| c.idle_total()),
            cpu,
            total_processes: observe("total_processes", self.total_processes()),
            running_processes: observe("running_processes", self.running_processes()),
            pids: observe("pids", self.pids()),
        }
    }

    /// Reads every per-process metric for `pid`.
    ///
    /// Returns [`ReadError::ProcessGone`] if `/proc/[pid]` does not exist.
    /// Individual metrics that fail are `None`.
    pub fn process(&self, pid: u32) -> Result<ProcessSnapshot, ReadError> {
        if !self.fs.is_dir(&self.config.pid_dir(pid)) {
            return Err(ReadError::ProcessGone(pid));
        }

        let uid = observe("uid", self.uid(pid));
        let user = match uid {
            Some(uid) => observe("user", self.username_for(uid)),
            None => None,
        };

        Ok(ProcessSnapshot {
            pid,
            active_jiffies: observe("process_active_jiffies", self.process_active_jiffies(pid)),
            start_ticks: observe("process_start_ticks", self.process_start_ticks(pid)),
            uptime_secs: observe("process_uptime", self.process_uptime(pid)),
            ram: observe("ram", self.ram(pid)),
            uid,
            user,
            command: observe("command", self.command(pid)),
        })
    }

    /// Snapshots every live process. Processes that exit mid-scan are skipped.
    pub fn processes(&self) -> Result<Vec<ProcessSnapshot>, ReadError> {
        let pids = self.pids()?;
        let mut processes = Vec::with_capacity(pids.len());
        for pid in pids {
            match self.process(pid) {
                Ok(snapshot) => processes.push(snapshot),
                Err(e) => debug!(pid, error = %e, "skipping process"),
            }
        }
        Ok(processes)
    }
}

/// Converts a result to an option, logging the error.
pub(crate) fn observe<T>(op: &'static str, result: Result<T, ReadError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(op, error = %e, "metric unavailable");
            None
        }
    }
}
