use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DropAccumulator, Phase, PortId, TableRow, Verdict, NOT_AVAILABLE};

/// Recognized header fields keyed by their label.
pub type Metadata = BTreeMap<String, String>;

/// Raw first/last health blocks per side, including open marker and close rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshots {
    pub first_assistant_block: Vec<String>,
    pub last_assistant_block: Vec<String>,
    pub first_manager_block: Vec<String>,
    pub last_manager_block: Vec<String>,
}

/// One port whose table-reported loss disagrees with the device counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMismatch {
    pub port: PortId,
    pub table_lost: i64,
    pub real_drops: i64,
}

impl fmt::Display for PortMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Port {} mismatch -> table: {} | device: {}",
            self.port, self.table_lost, self.real_drops
        )
    }
}

/// Finished, immutable outcome of one parse + validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub metadata: Metadata,
    /// Retained phases after warm-up removal and renumbering.
    pub phases: Vec<Phase>,
    /// Captured test duration as `"<N>s"`, already corrected.
    pub test_duration: Option<String>,
    pub reference_phase_name: Option<String>,
    pub verdict: Verdict,
    pub mismatches: Vec<PortMismatch>,
    pub health_blocks: HealthSnapshots,
    pub drop_counters: DropAccumulator,
}

impl ParseResult {
    /// True when no phase survived filtering; callers produce no document.
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Main table of the last retained phase, used for front-matter summaries.
    pub fn summary_table(&self) -> Option<&[TableRow]> {
        self.phases.last().map(|phase| phase.main_table.as_slice())
    }

    pub fn duration_display(&self) -> &str {
        self.test_duration.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Duration rendered as `"Ns (HH:MM:SS)"`, or `"N/A"`.
    pub fn formatted_duration(&self) -> String {
        dtn_core::format_duration(self.duration_display())
    }

    pub fn reference_phase_display(&self) -> &str {
        self.reference_phase_name.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn mismatch_descriptions(&self) -> Vec<String> {
        self.mismatches.iter().map(ToString::to_string).collect()
    }
}
