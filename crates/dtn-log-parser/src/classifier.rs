//! Line classification for the DTN harness log grammar.
//!
//! Every function here is pure: a trimmed line goes in, a [`LineClass`]
//! comes out. Lines that match nothing become [`LineClass::Unrecognized`]
//! instead of an error so the stream parser never has to recover.

use std::sync::OnceLock;

use dtn_log_types::{PortId, TableRow};
use regex::Regex;

pub const PHASE_START_SENTINEL: &str = "========== [TEST";
pub const PHASE_RESET_SENTINEL: &str = "========== [WARM-UP";
pub const HEALTH_TAG: &str = "[HEALTH]";

const ASSISTANT_OPEN_PREFIX: &str = "============ ASSISTANT FPGA";
const ASSISTANT_TABLE_PREFIX: &str = "---- ASSISTANT FPGA Port Status";
const MANAGER_OPEN_PREFIX: &str = "============ MANAGER FPGA";
const MANAGER_TABLE_PREFIX: &str = "---- MANAGER FPGA Port Status";
const HEALTH_CLOSE_PREFIX: &str = "================================================";

const COLUMN_SEPARATOR: char = '║';
const LIGHT_COLUMN_SEPARATOR: char = '│';
const RX_COLUMN_HEADER_MARKER: &str = "RX Pkts";
const PORT12_RX_HEADER: &str = "Port 12 RX";
const PORT13_RX_HEADER: &str = "Port 13 RX";

/// Header labels recognized as metadata when followed by a colon.
pub const DEFAULT_METADATA_KEYS: [&str; 8] = [
    "Date/Time",
    "Test Name",
    "Serial Number",
    "Tester Name",
    "Quality Checker",
    "Unit Name",
    "Revision Date",
    "Revision",
];

/// Structural markers inside a `[HEALTH]` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthMarker {
    AssistantOpen,
    AssistantTable,
    ManagerOpen,
    ManagerTable,
    Close,
}

/// Which table grammar a separator-bearing row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableRowKind {
    /// `<digits> ║ ...` port-statistics row.
    Main,
    /// `P<digits> ║ ...` multi-target row.
    RawMulti,
    /// Anything else; routed by the per-port RX cursor.
    PortRx,
}

impl TableRowKind {
    /// Minimum cell count for a row of this kind to be kept.
    pub fn min_cells(self) -> usize {
        match self {
            Self::Main => 12,
            Self::RawMulti => 11,
            Self::PortRx => 6,
        }
    }
}

/// Per-port extended RX table announced by a one-line header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RxPort {
    Port12,
    Port13,
}

/// Classification of one trimmed, non-empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    Metadata {
        key: &'a str,
        value: &'a str,
    },
    PhaseStart {
        name: String,
        duration: Option<String>,
    },
    PhaseReset,
    Health {
        marker: Option<HealthMarker>,
        /// Line with the health tag removed and trimmed.
        content: String,
    },
    TableRow {
        kind: TableRowKind,
        cells: TableRow,
        /// Repeated column-header row of a per-port RX table.
        is_column_header: bool,
    },
    PortRxHeader(RxPort),
    Unrecognized,
}

/// Classifies `line` in priority order: metadata, phase start, phase reset,
/// health, table row, plain text.
pub fn classify_line<'a>(line: &'a str, metadata_keys: &[String]) -> LineClass<'a> {
    if let Some((key, value)) = split_metadata(line, metadata_keys) {
        return LineClass::Metadata { key, value };
    }
    if line.starts_with(PHASE_START_SENTINEL) {
        return LineClass::PhaseStart {
            name: phase_display_name(line),
            duration: extract_duration(line),
        };
    }
    if line.starts_with(PHASE_RESET_SENTINEL) {
        return LineClass::PhaseReset;
    }
    if line.contains(HEALTH_TAG) {
        let content = line.replace(HEALTH_TAG, "").trim().to_string();
        return LineClass::Health {
            marker: health_marker(&content),
            content,
        };
    }
    if let Some((kind, cells)) = split_table_row(line) {
        return LineClass::TableRow {
            kind,
            cells,
            is_column_header: line.contains(RX_COLUMN_HEADER_MARKER),
        };
    }
    if line.contains(PORT12_RX_HEADER) {
        return LineClass::PortRxHeader(RxPort::Port12);
    }
    if line.contains(PORT13_RX_HEADER) {
        return LineClass::PortRxHeader(RxPort::Port13);
    }
    LineClass::Unrecognized
}

fn split_metadata<'a>(line: &'a str, metadata_keys: &[String]) -> Option<(&'a str, &'a str)> {
    if !metadata_keys.iter().any(|key| line.starts_with(key.as_str())) {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), value.trim()))
}

/// Strips marker decoration and normalizes the unit spelling.
pub fn phase_display_name(marker: &str) -> String {
    marker
        .trim_matches(|ch: char| matches!(ch, '=' | ' ' | '[' | ']'))
        .replace("sn", "sec")
}

/// Returns the first `<digits><unit>` token as `"<digits>s"`.
pub fn extract_duration(marker: &str) -> Option<String> {
    static DURATION: OnceLock<Regex> = OnceLock::new();
    let pattern = DURATION
        .get_or_init(|| Regex::new(r"([0-9]+)\s*(sn|sec)").expect("duration pattern compiles"));
    let captures = pattern.captures(marker)?;
    Some(format!("{}s", &captures[1]))
}

fn health_marker(content: &str) -> Option<HealthMarker> {
    if content.starts_with(ASSISTANT_OPEN_PREFIX) {
        Some(HealthMarker::AssistantOpen)
    } else if content.starts_with(ASSISTANT_TABLE_PREFIX) {
        Some(HealthMarker::AssistantTable)
    } else if content.starts_with(MANAGER_OPEN_PREFIX) {
        Some(HealthMarker::ManagerOpen)
    } else if content.starts_with(MANAGER_TABLE_PREFIX) {
        Some(HealthMarker::ManagerTable)
    } else if content.starts_with(HEALTH_CLOSE_PREFIX) {
        Some(HealthMarker::Close)
    } else {
        None
    }
}

fn split_table_row(line: &str) -> Option<(TableRowKind, TableRow)> {
    let normalized = line.replace(LIGHT_COLUMN_SEPARATOR, "║");
    let cleaned = normalized.trim_matches(|ch: char| ch == COLUMN_SEPARATOR || ch == ' ');
    if !cleaned.contains(COLUMN_SEPARATOR) {
        return None;
    }
    let kind = if leading_token_matches(cleaned, false) {
        TableRowKind::Main
    } else if leading_token_matches(cleaned, true) {
        TableRowKind::RawMulti
    } else {
        TableRowKind::PortRx
    };
    let cells = cleaned
        .split(COLUMN_SEPARATOR)
        .map(|cell| cell.trim().to_string())
        .collect();
    Some((kind, cells))
}

/// Matches `^\d+\s*║`, or `^P\d+\s*║` when `prefixed`.
fn leading_token_matches(cleaned: &str, prefixed: bool) -> bool {
    let rest = if prefixed {
        match cleaned.strip_prefix('P') {
            Some(rest) => rest,
            None => return false,
        }
    } else {
        cleaned
    };
    let after_digits = rest.trim_start_matches(|ch: char| ch.is_ascii_digit());
    if after_digits.len() == rest.len() {
        return false;
    }
    after_digits.trim_start().starts_with(COLUMN_SEPARATOR)
}

/// A line matching the numeric health-counter pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCounters {
    Sample { port: PortId, drops: u64 },
    /// The pattern matched but the port id does not fit a [`PortId`].
    UnrepresentablePort,
}

impl HealthCounters {
    pub fn sample(self) -> Option<(PortId, u64)> {
        match self {
            Self::Sample { port, drops } => Some((port, drops)),
            Self::UnrepresentablePort => None,
        }
    }
}

/// Matches a numeric health-counter line and sums its drop counters.
///
/// The line carries a port id, two non-drop counters, then five droppable
/// event counters whose sum is the cumulative drop count for the port.
/// Counters too large for `u64` saturate.
pub fn parse_health_counters(line: &str) -> Option<HealthCounters> {
    static COUNTERS: OnceLock<Regex> = OnceLock::new();
    let pattern = COUNTERS.get_or_init(|| {
        Regex::new(
            r"\[HEALTH\]\s+([0-9]+)\s+\|\s+[0-9]+\s+\|\s+[0-9]+\s+\|\s+([0-9]+)\s+\|\s+([0-9]+)\s+\|\s+([0-9]+)\s+\|\s+([0-9]+)\s+\|\s+([0-9]+)\s+\|",
        )
        .expect("health counter pattern compiles")
    });
    let captures = pattern.captures(line)?;
    let Ok(port) = captures[1].parse::<PortId>() else {
        return Some(HealthCounters::UnrepresentablePort);
    };
    let drops = (2..=6)
        .map(|index| captures[index].parse::<u64>().unwrap_or(u64::MAX))
        .fold(0u64, u64::saturating_add);
    Some(HealthCounters::Sample { port, drops })
}

/// Splits a health-table line on `|`, dropping empty cells.
pub fn split_health_cells(content: &str) -> TableRow {
    content
        .split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// True for the header and rule rows repeated at the top of every health table.
pub fn is_health_table_header(content: &str) -> bool {
    content.starts_with("Port |") || content.starts_with("-----|")
}
