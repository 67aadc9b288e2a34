//! Metrics reader for Linux `/proc` and `/etc` text interfaces.
//!
//! Each operation reads one pseudo-file, extracts one metric and returns it
//! as a `Result`. Nothing is cached between calls.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     MetricsReader                        │
//! │  ┌────────────────────┐   ┌───────────────────────────┐  │
//! │  │  system operations │   │   process operations      │  │
//! │  │  - /etc/os-release │   │   - /proc/[pid]/stat      │  │
//! │  │  - /proc/meminfo   │   │   - /proc/[pid]/status    │  │
//! │  │  - /proc/stat      │   │   - /proc/[pid]/cmdline   │  │
//! │  │  - /proc/uptime    │   │   - /etc/passwd           │  │
//! │  └─────────┬──────────┘   └─────────────┬─────────────┘  │
//! │            └──────────────┬─────────────┘                │
//! │                    ┌──────▼──────┐      ┌────────────┐   │
//! │                    │  FileSystem │      │  Fallback  │   │
//! │                    └──────┬──────┘      │ zero-values│   │
//! └───────────────────────────┼─────────────┴────────────┴───┘
//!                    ┌────────┴────────┐
//!             ┌──────▼──────┐   ┌──────▼──────┐
//!             │   RealFs    │   │   MockFs    │
//!             └─────────────┘   └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use procmetrics_core::reader::{MetricsReader, ReaderConfig, RealFs};
//!
//! let reader = MetricsReader::new(RealFs::new(), ReaderConfig::default());
//! let used_kb = reader.memory_utilization()?;
//! ```
//!
//! ```
//! use procmetrics_core::reader::{MetricsReader, MockFs, ReaderConfig};
//!
//! let reader = MetricsReader::new(MockFs::typical_system(), ReaderConfig::default());
//! assert_eq!(reader.kernel().unwrap(), "6.8.0-45-generic");
//! assert_eq!(reader.fallback().total_processes(), 10000);
//! ```

mod config;
mod error;
mod fallback;
pub mod mock;
pub mod parser;
mod process;
#[allow(clippy::module_inception)]
mod reader;
mod system;
pub mod traits;

pub use config::{DEFAULT_CLOCK_TICKS, ReaderConfig, Semantics};
pub use error::ReadError;
pub use fallback::Fallback;
pub use mock::MockFs;
pub use reader::MetricsReader;
pub use traits::{FileSystem, RealFs};
