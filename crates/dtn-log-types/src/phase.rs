use serde::{Deserialize, Serialize};

/// One parsed line of a tabular section, split into trimmed cells.
pub type TableRow = Vec<String>;

/// One timed test segment recovered from the log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Display name taken from the phase-start marker.
    pub name: String,
    /// Set once any numeric health-counter line is seen inside the phase span.
    pub has_telemetry: bool,
    /// Port-statistics rows (`<port> ║ ...`, at least 12 cells).
    pub main_table: Vec<TableRow>,
    /// Multi-target rows (`P<n> ║ ...`, at least 11 cells).
    pub raw_multi_table: Vec<TableRow>,
    pub port12_table: Vec<TableRow>,
    pub port13_table: Vec<TableRow>,
    pub ast_meta: Vec<String>,
    pub ast_table: Vec<TableRow>,
    pub mgr_meta: Vec<String>,
    pub mgr_table: Vec<TableRow>,
}

impl Phase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns true when the phase can serve as the reconciliation reference.
    pub fn is_reference_candidate(&self) -> bool {
        self.has_telemetry && !self.main_table.is_empty()
    }
}
