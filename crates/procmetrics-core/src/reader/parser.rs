//! Parsers for `/proc` and `/etc` text formats.
//!
//! These are pure functions over file content. They never touch the
//! filesystem, so every format quirk is testable with string inputs.

use crate::model::{CpuAggregate, MemorySnapshot};

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

// ============ Key lookup ============

/// Returns the rest of the first line whose first whitespace token is `key`.
///
/// Works for `key value` files (`/proc/stat`) and `Key:\tvalue` files
/// (`/proc/[pid]/status`, `/proc/meminfo`) when `key` includes the colon.
pub fn find_key<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    find_key_by(content, |token| token == key)
}

/// Like [`find_key`], but also matches `key:`.
pub fn find_key_lenient<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    find_key_by(content, |token| {
        token == key || token.strip_suffix(':') == Some(key)
    })
}

fn find_key_by<'a>(content: &'a str, matches: impl Fn(&str) -> bool) -> Option<&'a str> {
    content.lines().find_map(|line| {
        let line = line.trim_start();
        let token = line.split_whitespace().next()?;
        matches(token).then(|| line[token.len()..].trim())
    })
}

/// First whitespace-delimited token of `s`.
pub fn first_token(s: &str) -> Option<&str> {
    s.split_whitespace().next()
}

/// Parses an unsigned counter, naming the field in the error.
pub fn parse_u64_field(value: &str, name: &str) -> Result<u64, ParseError> {
    value
        .parse()
        .map_err(|_| ParseError::new(format!("invalid {} '{}'", name, value)))
}

/// Parses a leading (optionally signed) decimal integer and ignores the rest,
/// e.g. `"1000 (bash) S"` → `1000`. Returns `None` when there are no digits.
pub fn parse_leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

// ============ /etc/os-release ============

/// Returns the value of `key` from `/etc/os-release` content.
///
/// Format: `KEY=value` or `KEY="value with spaces"`, one per line.
pub fn parse_os_release_value(content: &str, key: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };
        if k.trim() != key {
            continue;
        }
        let v = v.trim();
        let unquoted = v
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .or_else(|| v.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
            .unwrap_or(v);
        return Some(unquoted.to_string());
    }
    None
}

/// Legacy `/etc/os-release` lookup.
///
/// Spaces become `_`, `=` and `"` become spaces, the line is read as
/// `key value` pairs and `_` in the value is turned back into spaces.
/// Underscores that were in the original value are lost.
pub fn parse_os_release_value_literal(content: &str, key: &str) -> Option<String> {
    for line in content.lines() {
        let normalized: String = line
            .chars()
            .map(|c| match c {
                ' ' => '_',
                '=' | '"' => ' ',
                c => c,
            })
            .collect();
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        for pair in tokens.chunks_exact(2) {
            if pair[0] == key {
                return Some(pair[1].replace('_', " "));
            }
        }
    }
    None
}

// ============ /proc/version ============

/// Extracts the kernel release from `/proc/version`.
///
/// Format: `Linux version 6.8.0-45-generic (buildd@...) ...`
pub fn parse_kernel_version(content: &str) -> Result<String, ParseError> {
    let line = content.lines().next().unwrap_or("");
    line.split_whitespace()
        .nth(2)
        .map(str::to_string)
        .ok_or_else(|| ParseError::new("expected at least 3 fields in version"))
}

// ============ /proc directory ============

/// Parses a `/proc` entry name as a PID. Only non-empty, all-digit names qualify.
pub fn parse_pid_name(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

// ============ /proc/meminfo ============

/// Parses `/proc/meminfo` content into a key → kB map.
///
/// Format: `Key:   value [kB]`. Lines whose value is not a number are skipped.
pub fn parse_meminfo(content: &str) -> MemorySnapshot {
    let mut info = MemorySnapshot::new();
    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        if let Ok(value) = value.parse::<f64>() {
            info.insert(key, value);
        }
    }
    info
}

// ============ /proc/stat ============

/// Parses the counters that follow the `cpu` label in `/proc/stat`.
///
/// Kernels older than 2.6.33 print fewer than 10 columns; missing trailing
/// columns are zero. At least user, nice, system and idle must be present.
pub fn parse_cpu_counters(fields: &str) -> Result<CpuAggregate, ParseError> {
    let parts: Vec<&str> = fields.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(ParseError::new(format!(
            "not enough cpu columns: expected 4+, got {}",
            parts.len()
        )));
    }

    let mut counters = [0u64; 10];
    for (slot, value) in counters.iter_mut().zip(&parts) {
        *slot = parse_u64_field(value, "cpu counter")?;
    }
    Ok(CpuAggregate::from_counters(counters))
}

// ============ /proc/uptime ============

/// Parses `/proc/uptime` into whole seconds.
///
/// Format: `<uptime_seconds> <idle_seconds>`, both with two decimals.
pub fn parse_uptime_secs(content: &str) -> Result<u64, ParseError> {
    let token = first_token(content).ok_or_else(|| ParseError::new("empty uptime"))?;
    let secs: f64 = token
        .parse()
        .map_err(|_| ParseError::new(format!("invalid uptime '{}'", token)))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(ParseError::new(format!("invalid uptime '{}'", token)));
    }
    Ok(secs.trunc() as u64)
}

// ============ /proc/[pid]/stat ============

/// Splits a `/proc/[pid]/stat` line into fields, keeping `(comm)` as one
/// field even when the command name contains spaces or parentheses.
///
/// Indexes match `proc(5)`: field 14 (utime) is at index 13.
pub fn split_stat_fields(line: &str) -> Vec<&str> {
    let line = line.trim();
    match (line.find('('), line.rfind(')')) {
        (Some(open), Some(close)) if open < close => {
            let mut fields: Vec<&str> = line[..open].split_whitespace().collect();
            fields.push(&line[open..=close]);
            fields.extend(line[close + 1..].split_whitespace());
            fields
        }
        _ => line.split_whitespace().collect(),
    }
}

// ============ /proc/[pid]/cmdline ============

/// Turns NUL-separated argv into a single space-separated command line.
pub fn normalize_cmdline(raw: &str) -> String {
    raw.replace('\0', " ").trim().to_string()
}

// ============ /etc/passwd ============

/// Returns the username of the first `/etc/passwd` entry with the given UID.
///
/// Format: username:password:uid:gid:gecos:home:shell
pub fn find_username(content: &str, uid: u32) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let mut parts = line.split(':');
        let name = parts.next()?;
        let entry_uid: u32 = parts.nth(1)?.parse().ok()?;
        (entry_uid == uid).then(|| name.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OS_RELEASE: &str = "\
NAME=\"Ubuntu\"
VERSION=\"24.04.1 LTS (Noble Numbat)\"
ID=ubuntu
ID_LIKE=debian
PRETTY_NAME=\"Ubuntu 24.04.1 LTS\"
VERSION_ID=\"24.04\"
";

    #[test]
    fn test_find_key() {
        let content = "cpu  1 2 3 4\ncpu0 1 2 3 4\nprocesses 10000\nprocs_running 2\n";
        assert_eq!(find_key(content, "cpu"), Some("1 2 3 4"));
        assert_eq!(find_key(content, "processes"), Some("10000"));
        assert_eq!(find_key(content, "procs"), None);
    }

    #[test]
    fn test_find_key_status_format() {
        let content = "Name:\tbash\nUid:\t1000\t1000\t1000\t1000\nMems_allowed:\t00000001\n";
        assert_eq!(find_key(content, "Uid:"), Some("1000\t1000\t1000\t1000"));
        assert_eq!(find_key(content, "Mems_allowed:"), Some("00000001"));
        assert_eq!(find_key(content, "Uid"), None);
    }

    #[test]
    fn test_find_key_lenient() {
        let content = "  .next_jiffies   : 4297312400\njiffies: 4297312345\n";
        assert_eq!(find_key_lenient(content, "jiffies"), Some("4297312345"));
        assert_eq!(find_key(content, "jiffies"), None);
    }

    #[test]
    fn test_parse_leading_integer() {
        assert_eq!(parse_leading_integer("1000 (bash) S 999"), Some(1000));
        assert_eq!(parse_leading_integer("  42abc"), Some(42));
        assert_eq!(parse_leading_integer("-7"), Some(-7));
        assert_eq!(parse_leading_integer("12345.67"), Some(12345));
        assert_eq!(parse_leading_integer("(bash)"), None);
        assert_eq!(parse_leading_integer(""), None);
    }

    #[test]
    fn test_parse_os_release_value() {
        assert_eq!(
            parse_os_release_value(OS_RELEASE, "PRETTY_NAME"),
            Some("Ubuntu 24.04.1 LTS".to_string())
        );
        assert_eq!(
            parse_os_release_value(OS_RELEASE, "ID"),
            Some("ubuntu".to_string())
        );
        assert_eq!(parse_os_release_value("NAME=Arch\n", "PRETTY_NAME"), None);
    }

    #[test]
    fn test_parse_os_release_value_single_quotes_and_comments() {
        let content = "# comment\nPRETTY_NAME='Debian GNU/Linux 12 (bookworm)'\n";
        assert_eq!(
            parse_os_release_value(content, "PRETTY_NAME"),
            Some("Debian GNU/Linux 12 (bookworm)".to_string())
        );
    }

    #[test]
    fn test_parse_os_release_value_literal() {
        assert_eq!(
            parse_os_release_value_literal(OS_RELEASE, "PRETTY_NAME"),
            Some("Ubuntu 24.04.1 LTS".to_string())
        );
        // Underscores in the original value do not survive
        assert_eq!(
            parse_os_release_value_literal("PRETTY_NAME=\"my_os 1\"\n", "PRETTY_NAME"),
            Some("my os 1".to_string())
        );
    }

    #[test]
    fn test_parse_kernel_version() {
        let content = "Linux version 5.15.0-foo (gcc version 11.2.0) #1 SMP\n";
        assert_eq!(parse_kernel_version(content).unwrap(), "5.15.0-foo");
        assert!(parse_kernel_version("").is_err());
        assert!(parse_kernel_version("Linux version\n").is_err());
    }

    #[test]
    fn test_parse_pid_name() {
        assert_eq!(parse_pid_name("1"), Some(1));
        assert_eq!(parse_pid_name("4194304"), Some(4194304));
        assert_eq!(parse_pid_name("abc"), None);
        assert_eq!(parse_pid_name("self"), None);
        assert_eq!(parse_pid_name("+1"), None);
        assert_eq!(parse_pid_name("12a"), None);
        assert_eq!(parse_pid_name(""), None);
        assert_eq!(parse_pid_name("99999999999999999999"), None);
    }

    #[test]
    fn test_parse_meminfo() {
        let content = "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
HugePages_Total:       0
Bogus:           n/a
";
        let info = parse_meminfo(content);
        assert_eq!(info.get("MemTotal:"), Some(16384000.0));
        assert_eq!(info.get("MemFree"), Some(8192000.0));
        assert_eq!(info.get("HugePages_Total"), Some(0.0));
        assert_eq!(info.get("Bogus"), None);
        assert_eq!(info.len(), 3);
    }

    #[test]
    fn test_parse_cpu_counters() {
        let cpu = parse_cpu_counters("10 20 30 40 50 60 70 80 90 100").unwrap();
        assert_eq!(cpu.user, 10);
        assert_eq!(cpu.idle, 40);
        assert_eq!(cpu.guest_nice, 100);
    }

    #[test]
    fn test_parse_cpu_counters_old_kernel() {
        let cpu = parse_cpu_counters("10 20 30 40 50 60 70").unwrap();
        assert_eq!(cpu.softirq, 70);
        assert_eq!(cpu.steal, 0);
        assert_eq!(cpu.guest_nice, 0);
    }

    #[test]
    fn test_parse_cpu_counters_invalid() {
        assert!(parse_cpu_counters("10 20 30").is_err());
        assert!(parse_cpu_counters("10 20 x 40").is_err());
    }

    #[test]
    fn test_parse_uptime_secs() {
        assert_eq!(parse_uptime_secs("12345.67 98765.43\n").unwrap(), 12345);
        assert_eq!(parse_uptime_secs("0.99 0.50\n").unwrap(), 0);
        assert!(parse_uptime_secs("").is_err());
        assert!(parse_uptime_secs("abc 1.0").is_err());
        assert!(parse_uptime_secs("-5.0 1.0").is_err());
    }

    #[test]
    fn test_split_stat_fields() {
        let fields = split_stat_fields("1000 (bash) S 999 1000 1000 34816 1001 4194304 5000 50000 0 0 100 50 200 100 20 0 1 0 100000");
        assert_eq!(fields[0], "1000");
        assert_eq!(fields[1], "(bash)");
        assert_eq!(fields[13], "100");
        assert_eq!(fields[14], "50");
        assert_eq!(fields[21], "100000");
    }

    #[test]
    fn test_split_stat_fields_with_spaces_in_comm() {
        let fields = split_stat_fields("5000 (Web Content) S 4999 5000 4999 0 -1 4194304 100000 0 500 0 5000 1000 0 0");
        assert_eq!(fields[1], "(Web Content)");
        assert_eq!(fields[13], "5000");
        assert_eq!(fields[14], "1000");
    }

    #[test]
    fn test_split_stat_fields_with_parentheses_in_comm() {
        let fields = split_stat_fields("5001 (test(1)) S 1");
        assert_eq!(fields, vec!["5001", "(test(1))", "S", "1"]);
    }

    #[test]
    fn test_split_stat_fields_without_comm() {
        assert_eq!(split_stat_fields("1 2 3"), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_normalize_cmdline() {
        assert_eq!(normalize_cmdline("/bin/bash\0--login\0"), "/bin/bash --login");
        assert_eq!(normalize_cmdline(""), "");
    }

    #[test]
    fn test_find_username() {
        let content = "\
root:x:0:0:root:/root:/bin/bash
# comment
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
user:x:1000:1000:User Name:/home/user:/bin/bash
shadow:x:1000:1000::/home/shadow:/bin/sh
";
        assert_eq!(find_username(content, 0), Some("root".to_string()));
        assert_eq!(find_username(content, 1), Some("daemon".to_string()));
        // First match wins
        assert_eq!(find_username(content, 1000), Some("user".to_string()));
        assert_eq!(find_username(content, 4242), None);
    }
}
