//! Typed results of the metrics reader.
//!
//! Every structure here is derived on demand from the current content of
//! `/proc` and `/etc` and is never cached. Two values read by different calls
//! may reflect different instants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Human-readable identity of the running system.
///
/// Source: `/etc/os-release` (`PRETTY_NAME`) and `/proc/version`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct SystemIdentity {
    /// Operating system name, e.g. `Ubuntu 24.04.1 LTS`.
    pub pretty_name: String,
    /// Kernel release, the third token of `/proc/version`.
    pub kernel_version: String,
}

/// Column of the aggregate `cpu` line in `/proc/stat`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CpuState {
    User,
    Nice,
    System,
    Idle,
    IoWait,
    Irq,
    SoftIrq,
    Steal,
    Guest,
    GuestNice,
}

impl CpuState {
    /// All columns in `/proc/stat` order.
    pub const ALL: [CpuState; 10] = [
        CpuState::User,
        CpuState::Nice,
        CpuState::System,
        CpuState::Idle,
        CpuState::IoWait,
        CpuState::Irq,
        CpuState::SoftIrq,
        CpuState::Steal,
        CpuState::Guest,
        CpuState::GuestNice,
    ];

    /// Zero-based column index after the `cpu` label.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Aggregate CPU time counters from the `cpu` line of `/proc/stat`.
///
/// All values are jiffies accumulated since boot. They only grow, so a usage
/// rate needs two samples (see [`CpuAggregate::utilization_since`]).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct CpuAggregate {
    /// Source: `/proc/stat` column 1
    pub user: u64,
    /// Source: `/proc/stat` column 2
    pub nice: u64,
    /// Source: `/proc/stat` column 3
    pub system: u64,
    /// Source: `/proc/stat` column 4
    pub idle: u64,
    /// Source: `/proc/stat` column 5
    pub iowait: u64,
    /// Source: `/proc/stat` column 6
    pub irq: u64,
    /// Source: `/proc/stat` column 7
    pub softirq: u64,
    /// Source: `/proc/stat` column 8
    pub steal: u64,
    /// Source: `/proc/stat` column 9
    pub guest: u64,
    /// Source: `/proc/stat` column 10
    pub guest_nice: u64,
}

impl CpuAggregate {
    /// Builds an aggregate from counters in `/proc/stat` column order.
    pub fn from_counters(c: [u64; 10]) -> Self {
        Self {
            user: c[0],
            nice: c[1],
            system: c[2],
            idle: c[3],
            iowait: c[4],
            irq: c[5],
            softirq: c[6],
            steal: c[7],
            guest: c[8],
            guest_nice: c[9],
        }
    }

    /// Counters in `/proc/stat` column order.
    pub fn counters(&self) -> [u64; 10] {
        CpuState::ALL.map(|state| self.get(state))
    }

    pub fn get(&self, state: CpuState) -> u64 {
        match state {
            CpuState::User => self.user,
            CpuState::Nice => self.nice,
            CpuState::System => self.system,
            CpuState::Idle => self.idle,
            CpuState::IoWait => self.iowait,
            CpuState::Irq => self.irq,
            CpuState::SoftIrq => self.softirq,
            CpuState::Steal => self.steal,
            CpuState::Guest => self.guest,
            CpuState::GuestNice => self.guest_nice,
        }
    }

    /// Busy jiffies: user + nice + system + irq + softirq + steal.
    ///
    /// Guest time is already included in user/nice by the kernel.
    pub fn active(&self) -> u64 {
        self.user
            .saturating_add(self.nice)
            .saturating_add(self.system)
            .saturating_add(self.irq)
            .saturating_add(self.softirq)
            .saturating_add(self.steal)
    }

    /// Idle jiffies: idle + iowait.
    pub fn idle_total(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    pub fn total(&self) -> u64 {
        self.active().saturating_add(self.idle_total())
    }

    /// Counters as decimal strings, in column order.
    pub fn as_strings(&self) -> Vec<String> {
        self.counters().iter().map(u64::to_string).collect()
    }

    /// Fraction of time (0.0..=1.0) the CPUs were busy between `prev` and `self`.
    ///
    /// Returns `None` when no time elapsed or a counter went backwards
    /// (samples swapped, or counters from another boot).
    pub fn utilization_since(&self, prev: &CpuAggregate) -> Option<f64> {
        let active = self.active().checked_sub(prev.active())?;
        let idle = self.idle_total().checked_sub(prev.idle_total())?;
        let total = active + idle;
        if total == 0 {
            return None;
        }
        Some(active as f64 / total as f64)
    }
}

/// Parsed `/proc/meminfo`: key → value in kB.
///
/// Keys are stored without the trailing colon; [`MemorySnapshot::get`]
/// accepts either form (`MemTotal` or `MemTotal:`).
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct MemorySnapshot {
    values: BTreeMap<String, f64>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, kb: f64) {
        self.values.insert(normalize_key(key).to_string(), kb);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(normalize_key(key)).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// `MemTotal − MemFree` in kB. A missing `MemFree` counts as zero;
    /// a missing `MemTotal` yields `None`.
    pub fn used_kb(&self) -> Option<f64> {
        let total = self.get("MemTotal")?;
        let free = self.get("MemFree").unwrap_or(0.0);
        Some(total - free)
    }
}

fn normalize_key(key: &str) -> &str {
    key.strip_suffix(':').unwrap_or(key)
}

/// Per-process metrics assembled from `/proc/[pid]/` and `/etc/passwd`.
///
/// Each field is read independently; a field is `None` when its source was
/// unreadable or malformed. The process may have exited between reads.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct ProcessSnapshot {
    pub pid: u32,
    /// utime + stime (jiffies).
    pub active_jiffies: Option<u64>,
    /// Start time after boot (jiffies), field 22 of `/proc/[pid]/stat`.
    pub start_ticks: Option<u64>,
    /// Seconds the process has been running.
    pub uptime_secs: Option<u64>,
    /// Raw memory token from `/proc/[pid]/status`.
    pub ram: Option<String>,
    pub uid: Option<u32>,
    pub user: Option<String>,
    pub command: Option<String>,
}

/// System-wide metrics read in one pass.
///
/// Not an atomic snapshot: every field comes from its own read.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct SystemSnapshot {
    pub operating_system: Option<String>,
    pub kernel: Option<String>,
    /// `MemTotal − MemFree` (kB).
    pub memory_used_kb: Option<f64>,
    pub uptime_secs: Option<u64>,
    pub jiffies: Option<u64>,
    pub cpu: Option<CpuAggregate>,
    pub active_jiffies: Option<u64>,
    pub idle_jiffies: Option<u64>,
    pub total_processes: Option<u64>,
    pub running_processes: Option<u64>,
    pub pids: Option<Vec<u32>>,
}
