//! Point-in-time OS and process metrics from `/proc` and `/etc`.
//!
//! Provides:
//! - `reader`: the metrics reader, its filesystem seam, parsers and mock filesystem
//! - `model`: typed results (CPU aggregate, memory snapshot, process snapshot)

pub mod model;
pub mod reader;

pub use model::{
    CpuAggregate, CpuState, MemorySnapshot, ProcessSnapshot, SystemIdentity, SystemSnapshot,
};
pub use reader::{
    FileSystem, Fallback, MetricsReader, MockFs, ReadError, ReaderConfig, RealFs, Semantics,
};
