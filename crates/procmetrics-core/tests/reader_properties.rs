//! End-to-end checks against an on-disk fake `/proc` and `/etc` tree.

use std::fs;
use std::path::Path;

use procmetrics_core::{MetricsReader, ReadError, ReaderConfig, RealFs, Semantics, SystemSnapshot};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Builds `proc/` and `etc/` under a temp dir. PIDs 1, 2 and 10 exist;
/// `abc`, `self` and the `uptime` file must not be listed as processes.
fn fake_host() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "etc/os-release",
        "NAME=\"X\"\nPRETTY_NAME=\"X Y\"\nID=x\n",
    );
    write(
        root,
        "etc/passwd",
        "root:x:0:0:root:/root:/bin/bash\nalice:x:1000:1000::/home/alice:/bin/sh\n",
    );

    write(
        root,
        "proc/version",
        "Linux version 5.15.0-foo (builder@host) (gcc 11.2.0) #1 SMP\n",
    );
    write(root, "proc/meminfo", "MemTotal:  1000 kB\nMemFree:  300 kB\n");
    write(
        root,
        "proc/stat",
        "cpu 10 20 30 40 50 60 70 80 90 100\ncpu0 10 20 30 40 50 60 70 80 90 100\nprocesses 42\nprocs_running 3\n",
    );
    write(root, "proc/uptime", "500.25 100.00\n");
    write(root, "proc/timer_list", "now at 1 nsecs\njiffies: 4294967596\n");

    write(
        root,
        "proc/1/stat",
        "1 (init) S 0 1 1 0 -1 4194560 0 0 0 0 120 30 0 0 20 0 1 0 200 0 0",
    );
    write(root, "proc/1/status", "Name:\tinit\nUid:\t0\t0\t0\t0\nVmRSS:\t  4096 kB\n");
    write(root, "proc/1/cmdline", "/sbin/init\0");

    write(
        root,
        "proc/2/stat",
        "2 (kworker/0:1) S 0 0 0 0 -1 0 0 0 0 0 7 3 0 0 20 0 1 0 50 0 0",
    );
    write(root, "proc/2/status", "Name:\tkworker/0:1\nUid:\t1000\t1000\t1000\t1000\n");
    write(root, "proc/2/cmdline", "");

    write(root, "proc/10/stat", "10 (short) S 1");
    write(root, "proc/10/status", "Name:\tshort\nUid:\t4242\t4242\t4242\t4242\n");
    write(root, "proc/10/cmdline", "sleep\0infinity\0");

    fs::create_dir_all(root.join("proc/abc")).unwrap();
    fs::create_dir_all(root.join("proc/self")).unwrap();

    dir
}

fn reader(dir: &TempDir) -> MetricsReader<RealFs> {
    let config = ReaderConfig::new(dir.path().join("proc"), dir.path().join("etc"));
    MetricsReader::new(RealFs::new(), config)
}

#[test]
fn test_operating_system_restores_spacing() {
    let dir = fake_host();
    assert_eq!(reader(&dir).operating_system().unwrap(), "X Y");

    let literal = MetricsReader::new(
        RealFs::new(),
        reader(&dir).config().clone().with_semantics(Semantics::Literal),
    );
    assert_eq!(literal.operating_system().unwrap(), "X Y");
}

#[test]
fn test_kernel_release() {
    let dir = fake_host();
    assert_eq!(reader(&dir).kernel().unwrap(), "5.15.0-foo");
}

#[test]
fn test_pids_are_numeric_directories() {
    let dir = fake_host();
    let mut pids = reader(&dir).pids().unwrap();
    pids.sort_unstable();
    assert_eq!(pids, vec![1, 2, 10]);
}

#[test]
fn test_memory_utilization() {
    let dir = fake_host();
    assert_eq!(reader(&dir).memory_utilization().unwrap(), 700.0);

    write(dir.path(), "proc/meminfo", "MemTotal:  1000 kB\n");
    assert_eq!(reader(&dir).memory_utilization().unwrap(), 1000.0);
}

#[test]
fn test_cpu_counters() {
    let dir = fake_host();
    let r = reader(&dir);

    let expected: Vec<String> = (1..=10).map(|i| (i * 10).to_string()).collect();
    assert_eq!(r.cpu_utilization().unwrap(), expected);
    assert_eq!(r.active_jiffies().unwrap(), 270);
    assert_eq!(r.idle_jiffies().unwrap(), 90);
    assert_eq!(r.total_processes().unwrap(), 42);
    assert_eq!(r.running_processes().unwrap(), 3);
    assert_eq!(r.jiffies().unwrap(), 4294967596);
    assert_eq!(r.uptime().unwrap(), 500);
}

#[test]
fn test_process_metrics() {
    let dir = fake_host();
    let r = reader(&dir);

    assert_eq!(r.process_active_jiffies(1).unwrap(), 150);
    assert_eq!(r.process_active_jiffies(2).unwrap(), 10);
    assert_eq!(r.process_uptime(1).unwrap(), 498);
    assert_eq!(r.process_uptime(2).unwrap(), 500);
    assert_eq!(r.command(1).unwrap(), "/sbin/init");
    assert_eq!(r.command(2).unwrap(), "");
    assert_eq!(r.command(10).unwrap(), "sleep infinity");
    assert_eq!(r.ram(1).unwrap(), "4096");
}

#[test]
fn test_short_stat_line_is_malformed() {
    let dir = fake_host();
    let r = reader(&dir);

    let err = r.process_active_jiffies(10).unwrap_err();
    assert!(matches!(err, ReadError::Malformed { .. }));
    assert_eq!(r.fallback().process_active_jiffies(10), 0);
}

#[test]
fn test_user_resolution() {
    let dir = fake_host();
    let r = reader(&dir);

    assert_eq!(r.user(1).unwrap(), "root");
    assert_eq!(r.user(2).unwrap(), "alice");

    let err = r.user(10).unwrap_err();
    assert!(matches!(err, ReadError::KeyNotFound { ref key, .. } if key == "4242"));
    assert_eq!(r.fallback().user(10), "");
}

#[test]
fn test_missing_host_uses_zero_values() {
    let dir = tempfile::tempdir().unwrap();
    let r = reader(&dir);

    assert!(r.kernel().unwrap_err().is_unavailable());
    let f = r.fallback();
    assert_eq!(f.kernel(), "");
    assert!(f.pids().is_empty());
    assert_eq!(f.total_processes(), -1);
    assert_eq!(r.snapshot(), SystemSnapshot::default());
}

#[test]
fn test_repeated_calls_are_identical() {
    let dir = fake_host();
    let r = reader(&dir);

    assert_eq!(r.snapshot(), r.snapshot());
    assert_eq!(r.process(1).unwrap(), r.process(1).unwrap());
    assert_eq!(r.operating_system().unwrap(), r.operating_system().unwrap());
    assert_eq!(r.cpu_utilization().unwrap(), r.cpu_utilization().unwrap());
}

#[test]
fn test_snapshot_serializes() {
    let dir = fake_host();
    let snapshot = reader(&dir).snapshot();

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["kernel"], "5.15.0-foo");
    assert_eq!(json["memory_used_kb"], 700.0);
    assert_eq!(json["cpu"]["steal"], 80);

    let back: SystemSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(back, snapshot);
}
