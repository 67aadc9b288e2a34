//! Mock filesystem for testing.
//!
//! Provides `MockFs` and pre-built scenarios so the reader can be exercised
//! without a Linux `/proc`.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
