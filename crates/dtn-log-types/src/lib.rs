//! Shared data model for DTN throughput-log ingestion.
//!
//! Holds the structured record recovered from a harness log: metadata,
//! per-phase tables and health telemetry, the file-wide drop counters, and
//! the pass/fail verdict produced by reconciliation.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod drop_accumulator;
mod parse_result;
mod phase;

pub use drop_accumulator::{DropAccumulator, PortId};
pub use parse_result::{HealthSnapshots, Metadata, ParseResult, PortMismatch};
pub use phase::{Phase, TableRow};

/// Placeholder rendered for values the log never supplied.
pub const NOT_AVAILABLE: &str = "N/A";

/// Metadata key written by the validator.
pub const TEST_RESULT_KEY: &str = "Test Result";

/// Errors raised while reading a harness log.
///
/// Malformed content is never an error; only the input source itself can fail.
#[derive(Debug, Error)]
pub enum LogIngestError {
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read log line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Binary outcome of drop-counter reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Verdict {
    #[default]
    Pass,
    Fail,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
        }
    }

    pub fn is_pass(self) -> bool {
        self == Self::Pass
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
