//! Foundational low-level utilities shared across DTN report crates.
//!
//! Provides the atomic file-write helper used by report exports and the
//! duration helpers used when presenting captured test durations.

pub mod atomic_io;
pub mod time_utils;

pub use atomic_io::write_text_atomic;
pub use time_utils::{current_unix_timestamp, format_duration, parse_duration_seconds};
