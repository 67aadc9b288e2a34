use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

use procmetrics_core::{
    MetricsReader, ProcessSnapshot, ReaderConfig, RealFs, Semantics, SystemSnapshot,
};

/// Prints OS and process metrics read from /proc and /etc.
#[derive(Parser)]
#[command(
    name = "procmetrics-dump",
    about = "Print OS and process metrics from /proc and /etc",
    version
)]
struct Args {
    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: PathBuf,

    /// Path to /etc directory holding os-release and passwd.
    #[arg(long, default_value = "/etc")]
    etc_path: PathBuf,

    /// Clock ticks per second used to convert process start times.
    #[arg(long, default_value_t = procmetrics_core::reader::DEFAULT_CLOCK_TICKS)]
    clock_ticks: u64,

    /// Reproduce the legacy parsing quirks instead of the conventional reading.
    #[arg(long)]
    literal: bool,

    /// Report these processes (repeatable).
    #[arg(short, long = "pid", value_name = "PID")]
    pids: Vec<u32>,

    /// Report every live process.
    #[arg(long, conflicts_with = "pids")]
    processes: bool,

    /// Sample the cpu line twice this many milliseconds apart and report busy percent.
    #[arg(long, value_name = "MS")]
    cpu_sample: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Serialize)]
struct Report {
    system: SystemSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpu_busy_percent: Option<f64>,
    processes: Vec<ProcessSnapshot>,
}

/// Initializes the tracing subscriber. Logs go to stderr so stdout stays parseable.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "procmetrics_dump={level},procmetrics_core={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let semantics = if args.literal {
        Semantics::Literal
    } else {
        Semantics::Conventional
    };
    let config = ReaderConfig::new(&args.proc_path, &args.etc_path)
        .with_clock_ticks(args.clock_ticks)
        .with_semantics(semantics);
    debug!(
        proc = %args.proc_path.display(),
        etc = %args.etc_path.display(),
        clock_ticks = args.clock_ticks,
        ?semantics,
        "reader configured"
    );

    let reader = MetricsReader::new(RealFs::new(), config);

    let cpu_busy_percent = args.cpu_sample.and_then(|ms| sample_cpu(&reader, ms));
    let system = reader.snapshot();
    let processes = match collect_processes(&reader, &args) {
        Ok(processes) => processes,
        Err(e) => {
            error!("cannot list processes: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = Report {
        system,
        cpu_busy_percent,
        processes,
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("cannot serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_text(&report);
    }

    ExitCode::SUCCESS
}

fn collect_processes(
    reader: &MetricsReader<RealFs>,
    args: &Args,
) -> Result<Vec<ProcessSnapshot>, procmetrics_core::ReadError> {
    if args.processes {
        let processes = reader.processes()?;
        info!("read {} processes", processes.len());
        return Ok(processes);
    }

    let mut processes = Vec::with_capacity(args.pids.len());
    for &pid in &args.pids {
        match reader.process(pid) {
            Ok(snapshot) => processes.push(snapshot),
            Err(e) => error!(pid, "{}", e),
        }
    }
    Ok(processes)
}

fn sample_cpu(reader: &MetricsReader<RealFs>, interval_ms: u64) -> Option<f64> {
    let first = reader
        .cpu_aggregate()
        .inspect_err(|e| error!("cpu sample failed: {}", e))
        .ok()?;
    thread::sleep(Duration::from_millis(interval_ms));
    let second = reader
        .cpu_aggregate()
        .inspect_err(|e| error!("cpu sample failed: {}", e))
        .ok()?;
    second.utilization_since(&first).map(|u| u * 100.0)
}

// ── Text output ──────────────────────────────────────────────────────────────

fn dash<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}

fn print_text(report: &Report) {
    let s = &report.system;
    println!("OS:                {}", dash(&s.operating_system));
    println!("Kernel:            {}", dash(&s.kernel));
    println!(
        "Memory used:       {}",
        s.memory_used_kb
            .map(|kb| format!("{kb:.0} kB"))
            .unwrap_or_else(|| "-".to_string())
    );
    println!("Uptime:            {}", dash(&s.uptime_secs.map(|u| format!("{u} s"))));
    println!("Jiffies:           {}", dash(&s.jiffies));
    println!("Active jiffies:    {}", dash(&s.active_jiffies));
    println!("Idle jiffies:      {}", dash(&s.idle_jiffies));
    if let Some(busy) = report.cpu_busy_percent {
        println!("CPU busy:          {busy:.1}%");
    }
    println!("Processes total:   {}", dash(&s.total_processes));
    println!("Processes running: {}", dash(&s.running_processes));
    println!(
        "PIDs:              {}",
        dash(&s.pids.as_ref().map(Vec::len))
    );

    if report.processes.is_empty() {
        return;
    }

    println!();
    println!(
        "{:>8}  {:<12}  {:>10}  {:>10}  {:>8}  COMMAND",
        "PID", "USER", "RAM(kB)", "JIFFIES", "UPTIME"
    );
    for p in &report.processes {
        println!(
            "{:>8}  {:<12}  {:>10}  {:>10}  {:>8}  {}",
            p.pid,
            dash(&p.user),
            dash(&p.ram),
            dash(&p.active_jiffies),
            dash(&p.uptime_secs),
            dash(&p.command),
        );
    }
}
