//! Ready-made `/proc` and `/etc` trees.
//!
//! `typical_system` is a small healthy host. The `with_*` variants add one
//! awkward case each on top of it; `malformed_system` garbles every file.

use super::filesystem::MockFs;

const MEMINFO: &str = "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          310112 kB
Cached:          3120544 kB
Shmem:             88512 kB
SwapTotal:       4096000 kB
SwapFree:        4001792 kB
HugePages_Total:       0
Hugepagesize:       2048 kB
";

const PASSWD: &str = "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
www-data:x:33:33:www-data:/var/www:/usr/sbin/nologin
sshd:x:105:65534::/run/sshd:/usr/sbin/nologin
user:x:1000:1000:Dev User,,,:/home/user:/bin/zsh
nobody:x:65534:65534:nobody:/nonexistent:/usr/sbin/nologin
";

/// `Name`, `Pid`, `PPid`, `Uid` and optionally `VmRSS` in status-file layout.
fn status(name: &str, pid: u32, ppid: u32, uid: u32, rss_kb: Option<u64>) -> String {
    let mut s = format!(
        "Name:\t{name}\nUmask:\t0022\nState:\tS (sleeping)\nTgid:\t{pid}\nPid:\t{pid}\nPPid:\t{ppid}\n\
         Uid:\t{uid}\t{uid}\t{uid}\t{uid}\nGid:\t{uid}\t{uid}\t{uid}\t{uid}\n"
    );
    if let Some(kb) = rss_kb {
        s.push_str(&format!("VmRSS:\t{kb:>8} kB\n"));
    }
    s.push_str("Threads:\t1\nMems_allowed:\t00000000,00000001\nMems_allowed_list:\t0\n");
    s
}

impl MockFs {
    /// A healthy host running systemd (PID 1, root), an interactive bash
    /// (PID 1000, user) and an nginx master (PID 1001, www-data).
    ///
    /// `/proc` also holds non-process entries (`self`, `irq`, `sys`).
    pub fn typical_system() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/etc/os-release",
            "\
NAME=\"Ubuntu\"
VERSION_ID=\"24.04\"
VERSION=\"24.04.1 LTS (Noble Numbat)\"
PRETTY_NAME=\"Ubuntu 24.04.1 LTS\"
ID=ubuntu
ID_LIKE=debian
",
        );
        fs.add_file("/etc/passwd", PASSWD);

        fs.add_file(
            "/proc/version",
            "Linux version 6.8.0-45-generic (buildd@lcy02-amd64-075) (x86_64-linux-gnu-gcc-13 (Ubuntu 13.2.0-23ubuntu4) 13.2.0) #45-Ubuntu SMP PREEMPT_DYNAMIC\n",
        );
        fs.add_file("/proc/uptime", "12345.67 48211.90\n");
        fs.add_file("/proc/meminfo", MEMINFO);
        fs.add_file(
            "/proc/stat",
            "\
cpu  48213 1022 9731 512384 2210 0 311 0 0 0
cpu0 24500 611 4870 255902 1190 0 160 0 0 0
cpu1 23713 411 4861 256482 1020 0 151 0 0 0
ctxt 9913342
btime 1727600000
processes 10000
procs_running 2
procs_blocked 0
",
        );
        fs.add_file(
            "/proc/timer_list",
            "\
Timer List Version: v0.9
now at 12345670021453 nsecs

cpu: 0
 clock 0:
  .base:       0
  .expires_next   : 12345672000000 nsecs
  .last_jiffies   : 4297312344
  .next_jiffies   : 4297312346
  .idle_jiffies   : 4297312344

Tick Device: mode:     1
Per CPU device: 0
jiffies: 4297312345
",
        );

        fs.add_file("/proc/sys/kernel/pid_max", "4194304\n");
        fs.add_dir("/proc/irq");
        fs.add_dir("/proc/self");

        fs.add_process(
            1,
            "1 (systemd) S 0 1 1 0 -1 4194560 81234 2210456 97 1201 1000 500 3011 2254 20 0 1 0 1 172036096 3212 18446744073709551615 1 1 0 0 0 0 671173123 4096 1260 0 0 0 17 2 0 0 0 0 0",
            &status("systemd", 1, 0, 0, Some(12000)),
            "/sbin/init\0splash\0",
        );
        fs.add_process(
            1000,
            "1000 (bash) S 987 1000 1000 34817 1000 4194560 4410 38120 3 12 100 50 66 41 20 0 1 0 100000 11907072 1352 18446744073709551615 1 1 0 0 0 0 65536 3670020 1266777851 0 0 0 17 1 0 0 0 0 0",
            &status("bash", 1000, 987, 1000, Some(8000)),
            "/bin/bash\0--login\0",
        );
        fs.add_process(
            1001,
            "1001 (nginx) S 1 1001 1001 0 -1 1077952832 2871 0 14 0 250 120 0 0 20 0 1 0 200000 57524224 1490 18446744073709551615 1 1 0 0 0 0 0 4096 18947 0 0 0 17 0 0 0 0 0 0",
            &status("nginx", 1001, 1, 33, Some(6000)),
            "nginx: master process /usr/sbin/nginx -g daemon off;\0",
        );

        fs
    }

    /// Adds `kthreadd` (PID 2): empty cmdline and no `VmRSS:` line.
    pub fn with_kernel_thread() -> Self {
        let mut fs = Self::typical_system();
        fs.add_process(
            2,
            "2 (kthreadd) S 0 0 0 0 -1 2129984 0 0 0 0 0 7 0 0 20 0 1 0 2 0 0 18446744073709551615 0 0 0 0 0 0 0 2147483647 0 0 0 0 17 1 0 0 0 0 0",
            &status("kthreadd", 2, 0, 0, None),
            "",
        );
        fs
    }

    /// Adds a comm with a space (`Web Content`, PID 5000) and one with
    /// nested parentheses (`test(1)`, PID 5001).
    pub fn with_special_names() -> Self {
        let mut fs = Self::typical_system();
        fs.add_process(
            5000,
            "5000 (Web Content) S 4987 4987 4987 0 -1 4194560 231044 0 1211 0 5000 1000 0 0 20 0 29 0 500000 2811744256 51200 18446744073709551615 1 1 0 0 0 0 0 69634 1082134264 0 0 0 17 3 0 0 0 0 0",
            &status("Web Content", 5000, 4987, 1000, Some(200000)),
            "/usr/lib/firefox/firefox\0-contentproc\0-childID\0",
        );
        fs.add_process(
            5001,
            "5001 (test(1)) S 1 5001 5001 0 -1 4194304 212 0 0 0 10 5 0 0 20 0 1 0 500100 4468736 210 18446744073709551615 1 1 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0",
            &status("test(1)", 5001, 1, 1000, Some(1000)),
            "./test(1)\0",
        );
        fs
    }

    /// `/proc/meminfo` also carries `processes` and `procs_running`, which is
    /// where the literal semantics looks for process counts.
    pub fn with_process_counts_in_meminfo() -> Self {
        let mut fs = Self::typical_system();
        fs.add_file(
            "/proc/meminfo",
            format!("{MEMINFO}processes 321\nprocs_running 3\n"),
        );
        fs
    }

    /// Every file is present but garbled or truncated. PID 3000 has a
    /// five-field stat line and a non-numeric UID.
    pub fn malformed_system() -> Self {
        let mut fs = Self::new();

        fs.add_file("/etc/os-release", "NAME=\"Mystery\"\n");
        fs.add_file("/etc/passwd", "root:x:0:0:root:/root:/bin/bash\n");
        fs.add_file("/proc/version", "\n");
        fs.add_file("/proc/uptime", "garbage 1.0\n");
        fs.add_file("/proc/meminfo", "MemFree:  300 kB\n");
        fs.add_file(
            "/proc/stat",
            "cpu  a b c d e f g h i j\nprocesses many\nprocs_running -\n",
        );
        fs.add_file("/proc/timer_list", "jiffies: soon\n");
        fs.add_process(
            3000,
            "3000 (short) S 1 2",
            "Name:\tshort\nUid:\tnobody\n",
            "short\0",
        );

        fs
    }
}
