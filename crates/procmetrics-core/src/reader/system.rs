//! System-wide operations: `/etc/os-release`, `/proc/version`, `/proc/meminfo`,
//! `/proc/stat`, `/proc/uptime`, `/proc/timer_list` and the PID list.

use tracing::trace;

use crate::model::{CpuAggregate, MemorySnapshot, SystemIdentity};
use crate::reader::config::Semantics;
use crate::reader::error::ReadError;
use crate::reader::parser::{
    find_key, find_key_lenient, first_token, parse_cpu_counters, parse_kernel_version,
    parse_meminfo, parse_os_release_value, parse_os_release_value_literal, parse_pid_name,
    parse_u64_field, parse_uptime_secs,
};
use crate::reader::reader::MetricsReader;
use crate::reader::traits::FileSystem;

const OS_RELEASE: &str = "os-release";
const PRETTY_NAME: &str = "PRETTY_NAME";
const VERSION: &str = "version";
const MEMINFO: &str = "meminfo";
const UPTIME: &str = "uptime";
const STAT: &str = "stat";
const TIMER_LIST: &str = "timer_list";

impl<F: FileSystem> MetricsReader<F> {
    /// Operating system name from `PRETTY_NAME` in `/etc/os-release`.
    pub fn operating_system(&self) -> Result<String, ReadError> {
        let path = self.config.etc_file(OS_RELEASE);
        let content = self.read(&path)?;
        let value = match self.config.semantics {
            Semantics::Conventional => parse_os_release_value(&content, PRETTY_NAME),
            Semantics::Literal => parse_os_release_value_literal(&content, PRETTY_NAME),
        };
        value.ok_or_else(|| ReadError::key_not_found(&path, PRETTY_NAME))
    }

    /// Kernel release: third token of the first line of `/proc/version`.
    pub fn kernel(&self) -> Result<String, ReadError> {
        let path = self.config.proc_file(VERSION);
        let content = self.read(&path)?;
        parse_kernel_version(&content).map_err(|e| ReadError::malformed(&path, e.message))
    }

    /// Operating system name and kernel release together.
    pub fn identity(&self) -> Result<SystemIdentity, ReadError> {
        Ok(SystemIdentity {
            pretty_name: self.operating_system()?,
            kernel_version: self.kernel()?,
        })
    }

    /// PIDs of live processes: all-digit directory names under the process root.
    ///
    /// Order follows directory enumeration. A process listed here may be gone
    /// by the time it is queried.
    pub fn pids(&self) -> Result<Vec<u32>, ReadError> {
        let root = self.config.proc_root();
        let entries = self
            .fs
            .read_dir(root)
            .map_err(|e| ReadError::unavailable(root, e))?;

        let mut pids = Vec::new();
        for entry in entries {
            if let Some(pid) = entry
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(parse_pid_name)
                && self.fs.is_dir(&entry)
            {
                pids.push(pid);
            }
        }
        trace!(count = pids.len(), "enumerated pids");
        Ok(pids)
    }

    /// All numeric entries of `/proc/meminfo`, in kB.
    pub fn memory_snapshot(&self) -> Result<MemorySnapshot, ReadError> {
        let content = self.read(&self.config.proc_file(MEMINFO))?;
        Ok(parse_meminfo(&content))
    }

    /// Used memory in kB: `MemTotal − MemFree`.
    ///
    /// A missing `MemFree` counts as zero; a missing `MemTotal` is an error.
    pub fn memory_utilization(&self) -> Result<f64, ReadError> {
        self.memory_snapshot()?
            .used_kb()
            .ok_or_else(|| ReadError::key_not_found(&self.config.proc_file(MEMINFO), "MemTotal:"))
    }

    /// System uptime in whole seconds from `/proc/uptime`.
    pub fn uptime(&self) -> Result<u64, ReadError> {
        let path = self.config.proc_file(UPTIME);
        let content = self.read(&path)?;
        parse_uptime_secs(&content).map_err(|e| ReadError::malformed(&path, e.message))
    }

    /// Kernel tick counter from the `jiffies` line of `/proc/timer_list`.
    pub fn jiffies(&self) -> Result<u64, ReadError> {
        let path = self.config.proc_file(TIMER_LIST);
        let content = self.read(&path)?;
        let rest = match self.config.semantics {
            Semantics::Conventional => find_key_lenient(&content, "jiffies"),
            Semantics::Literal => find_key(&content, "jiffies"),
        }
        .ok_or_else(|| ReadError::key_not_found(&path, "jiffies"))?;
        let value = first_token(rest).ok_or_else(|| ReadError::malformed(&path, "empty jiffies"))?;
        parse_u64_field(value, "jiffies").map_err(|e| ReadError::malformed(&path, e.message))
    }

    /// Aggregate CPU counters from the `cpu` line of `/proc/stat`.
    pub fn cpu_aggregate(&self) -> Result<CpuAggregate, ReadError> {
        let path = self.config.proc_file(STAT);
        let content = self.read(&path)?;
        let fields = find_key(&content, "cpu").ok_or_else(|| ReadError::key_not_found(&path, "cpu"))?;
        parse_cpu_counters(fields).map_err(|e| ReadError::malformed(&path, e.message))
    }

    /// The ten aggregate CPU counters as decimal strings, in `/proc/stat` order.
    pub fn cpu_utilization(&self) -> Result<Vec<String>, ReadError> {
        Ok(self.cpu_aggregate()?.as_strings())
    }

    /// Busy jiffies since boot: user + nice + system + irq + softirq + steal.
    pub fn active_jiffies(&self) -> Result<u64, ReadError> {
        Ok(self.cpu_aggregate()?.active())
    }

    /// Idle jiffies since boot: idle + iowait.
    pub fn idle_jiffies(&self) -> Result<u64, ReadError> {
        Ok(self.cpu_aggregate()?.idle_total())
    }

    /// Number of forks since boot (`processes`).
    pub fn total_processes(&self) -> Result<u64, ReadError> {
        self.process_counter("processes")
    }

    /// Number of runnable processes (`procs_running`).
    pub fn running_processes(&self) -> Result<u64, ReadError> {
        self.process_counter("procs_running")
    }

    fn process_counter(&self, key: &str) -> Result<u64, ReadError> {
        let file = match self.config.semantics {
            Semantics::Conventional => STAT,
            Semantics::Literal => MEMINFO,
        };
        let path = self.config.proc_file(file);
        let content = self.read(&path)?;
        let rest = find_key(&content, key).ok_or_else(|| ReadError::key_not_found(&path, key))?;
        let value = first_token(rest)
            .ok_or_else(|| ReadError::malformed(&path, format!("empty {}", key)))?;
        parse_u64_field(value, key).map_err(|e| ReadError::malformed(&path, e.message))
    }
}
