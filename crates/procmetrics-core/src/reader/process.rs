//! Per-process operations over `/proc/[pid]/{stat,status,cmdline}` and `/etc/passwd`.

use crate::reader::config::Semantics;
use crate::reader::error::ReadError;
use crate::reader::parser::{
    find_key, find_username, first_token, normalize_cmdline, parse_leading_integer,
    parse_u64_field, split_stat_fields,
};
use crate::reader::reader::MetricsReader;
use crate::reader::traits::FileSystem;

/// Index of utime in `/proc/[pid]/stat` (field 14).
const UTIME: usize = 13;
/// Index of stime (field 15).
const STIME: usize = 14;
/// Index of starttime (field 22).
const STARTTIME: usize = 21;

impl<F: FileSystem> MetricsReader<F> {
    /// CPU time spent by the process: utime + stime, in jiffies.
    ///
    /// The stat line must have more than 14 fields. With
    /// [`Semantics::Literal`] the two fields are joined as text and parsed,
    /// so utime 100 and stime 50 give 10050.
    pub fn process_active_jiffies(&self, pid: u32) -> Result<u64, ReadError> {
        let path = self.config.pid_file(pid, "stat");
        let content = self.read(&path)?;
        let line = content.lines().next().unwrap_or("");
        let fields = self.stat_fields(line);
        if fields.len() <= STIME {
            return Err(ReadError::malformed(
                &path,
                format!("expected more than {} fields, got {}", STIME, fields.len()),
            ));
        }

        match self.config.semantics {
            Semantics::Conventional => {
                let utime = parse_u64_field(fields[UTIME], "utime")
                    .map_err(|e| ReadError::malformed(&path, e.message))?;
                let stime = parse_u64_field(fields[STIME], "stime")
                    .map_err(|e| ReadError::malformed(&path, e.message))?;
                Ok(utime.saturating_add(stime))
            }
            Semantics::Literal => {
                let joined = format!("{}{}", fields[UTIME], fields[STIME]);
                parse_u64_field(&joined, "utime/stime")
                    .map_err(|e| ReadError::malformed(&path, e.message))
            }
        }
    }

    /// Start time of the process after boot, in jiffies (field 22).
    pub fn process_start_ticks(&self, pid: u32) -> Result<u64, ReadError> {
        let path = self.config.pid_file(pid, "stat");
        let content = self.read(&path)?;
        let line = content.lines().next().unwrap_or("");
        let fields = self.stat_fields(line);
        let value = fields.get(STARTTIME).ok_or_else(|| {
            ReadError::malformed(&path, format!("missing starttime, got {} fields", fields.len()))
        })?;
        parse_u64_field(value, "starttime").map_err(|e| ReadError::malformed(&path, e.message))
    }

    /// Seconds the process has been running.
    ///
    /// Conventional: system uptime minus `starttime / clock_ticks`, floored at
    /// zero. Literal: the leading integer of the stat line (the PID) divided
    /// by the clock rate.
    pub fn process_uptime(&self, pid: u32) -> Result<u64, ReadError> {
        let hz = self.config.ticks_per_second();
        match self.config.semantics {
            Semantics::Conventional => {
                let start = self.process_start_ticks(pid)?;
                let system = self.uptime()?;
                Ok(system.saturating_sub(start / hz))
            }
            Semantics::Literal => {
                let path = self.config.pid_file(pid, "stat");
                let content = self.read(&path)?;
                let line = content.lines().next().unwrap_or("");
                let value = parse_leading_integer(line)
                    .and_then(|v| u64::try_from(v).ok())
                    .ok_or_else(|| ReadError::malformed(&path, "no leading integer"))?;
                Ok(value / hz)
            }
        }
    }

    /// Command line of the process.
    ///
    /// Kernel threads have an empty `cmdline`; that is `Ok("")`, not an error.
    pub fn command(&self, pid: u32) -> Result<String, ReadError> {
        let content = self.read(&self.config.pid_file(pid, "cmdline"))?;
        Ok(match self.config.semantics {
            Semantics::Conventional => normalize_cmdline(&content),
            Semantics::Literal => content.lines().next().unwrap_or("").to_string(),
        })
    }

    /// Memory token from `/proc/[pid]/status`: `VmRSS:` in kB, or the
    /// `Mems_allowed:` mask with [`Semantics::Literal`].
    pub fn ram(&self, pid: u32) -> Result<String, ReadError> {
        let key = match self.config.semantics {
            Semantics::Conventional => "VmRSS:",
            Semantics::Literal => "Mems_allowed:",
        };
        let path = self.config.pid_file(pid, "status");
        let content = self.read(&path)?;
        find_key(&content, key)
            .and_then(first_token)
            .map(str::to_string)
            .ok_or_else(|| ReadError::key_not_found(&path, key))
    }

    /// Real UID of the process (first value of `Uid:`).
    pub fn uid(&self, pid: u32) -> Result<u32, ReadError> {
        let path = self.config.pid_file(pid, "status");
        let content = self.read(&path)?;
        let value = find_key(&content, "Uid:")
            .and_then(first_token)
            .ok_or_else(|| ReadError::key_not_found(&path, "Uid:"))?;
        value
            .parse()
            .map_err(|_| ReadError::malformed(&path, format!("invalid uid '{}'", value)))
    }

    /// Name of the user owning the process, from `/etc/passwd`.
    pub fn user(&self, pid: u32) -> Result<String, ReadError> {
        let uid = self.uid(pid)?;
        self.username_for(uid)
    }

    pub(crate) fn username_for(&self, uid: u32) -> Result<String, ReadError> {
        let path = self.config.etc_file("passwd");
        let content = self.read(&path)?;
        find_username(&content, uid).ok_or_else(|| ReadError::key_not_found(&path, uid.to_string()))
    }

    fn stat_fields<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self.config.semantics {
            Semantics::Conventional => split_stat_fields(line),
            Semantics::Literal => line.split_whitespace().collect(),
        }
    }
}
