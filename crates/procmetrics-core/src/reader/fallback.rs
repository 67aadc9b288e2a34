//! Zero-value view over the reader.
//!
//! Front ends that render whatever is available and never want to branch on
//! errors use this instead of the `Result` API. Each operation maps any
//! [`ReadError`] to a fixed zero-value and logs the error at debug level, so a
//! zero here may mean "unavailable" as well as "really zero".

use tracing::debug;

use crate::reader::error::ReadError;
use crate::reader::reader::MetricsReader;
use crate::reader::traits::FileSystem;

/// Borrowed view returned by [`MetricsReader::fallback`].
pub struct Fallback<'a, F: FileSystem> {
    reader: &'a MetricsReader<F>,
}

impl<'a, F: FileSystem> Fallback<'a, F> {
    pub(crate) fn new(reader: &'a MetricsReader<F>) -> Self {
        Self { reader }
    }

    /// `""` when `PRETTY_NAME` is unavailable.
    pub fn operating_system(&self) -> String {
        or_zero("operating_system", self.reader.operating_system())
    }

    /// `""` when `/proc/version` is unreadable or too short.
    pub fn kernel(&self) -> String {
        or_zero("kernel", self.reader.kernel())
    }

    /// Empty when the process root is unreadable.
    pub fn pids(&self) -> Vec<u32> {
        or_zero("pids", self.reader.pids())
    }

    pub fn memory_utilization(&self) -> f64 {
        or_zero("memory_utilization", self.reader.memory_utilization())
    }

    pub fn uptime(&self) -> u64 {
        or_zero("uptime", self.reader.uptime())
    }

    pub fn jiffies(&self) -> u64 {
        or_zero("jiffies", self.reader.jiffies())
    }

    pub fn process_active_jiffies(&self, pid: u32) -> u64 {
        or_zero(
            "process_active_jiffies",
            self.reader.process_active_jiffies(pid),
        )
    }

    pub fn active_jiffies(&self) -> u64 {
        or_zero("active_jiffies", self.reader.active_jiffies())
    }

    pub fn idle_jiffies(&self) -> u64 {
        or_zero("idle_jiffies", self.reader.idle_jiffies())
    }

    /// Empty when the `cpu` line is missing or malformed.
    pub fn cpu_utilization(&self) -> Vec<String> {
        or_zero("cpu_utilization", self.reader.cpu_utilization())
    }

    /// `-1` when the counter is unavailable.
    pub fn total_processes(&self) -> i64 {
        or_value(
            "total_processes",
            self.reader.total_processes().map(saturate_i64),
            -1,
        )
    }

    /// `-1` when the counter is unavailable.
    pub fn running_processes(&self) -> i64 {
        or_value(
            "running_processes",
            self.reader.running_processes().map(saturate_i64),
            -1,
        )
    }

    pub fn command(&self, pid: u32) -> String {
        or_zero("command", self.reader.command(pid))
    }

    pub fn ram(&self, pid: u32) -> String {
        or_zero("ram", self.reader.ram(pid))
    }

    /// The UID as a decimal string, `""` when unavailable.
    pub fn uid(&self, pid: u32) -> String {
        or_zero("uid", self.reader.uid(pid).map(|uid| uid.to_string()))
    }

    pub fn user(&self, pid: u32) -> String {
        or_zero("user", self.reader.user(pid))
    }

    pub fn process_uptime(&self, pid: u32) -> u64 {
        or_zero("process_uptime", self.reader.process_uptime(pid))
    }
}

fn saturate_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn or_zero<T: Default>(op: &'static str, result: Result<T, ReadError>) -> T {
    or_value(op, result, T::default())
}

fn or_value<T>(op: &'static str, result: Result<T, ReadError>, zero: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            debug!(op, error = %e, "substituting zero-value");
            zero
        }
    }
}
