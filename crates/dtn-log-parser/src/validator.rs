//! Reconciles table-reported packet loss against health drop counters.

use dtn_log_types::{DropAccumulator, Phase, PortId, PortMismatch, TableRow, Verdict};

/// Ordinal of the `Lost` column in a main-table row.
pub const LOST_COLUMN: usize = 9;

/// Outcome of reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub reference_phase_name: Option<String>,
    pub verdict: Verdict,
    pub mismatches: Vec<PortMismatch>,
}

/// Returns the last phase carrying both telemetry and a main table.
pub fn select_reference_phase(phases: &[Phase]) -> Option<&Phase> {
    phases
        .iter()
        .rev()
        .find(|phase| phase.is_reference_candidate())
}

/// Compares each port's `Lost` cell with `last_seen - first_seen` drops.
///
/// Without a reference phase the verdict is `Pass`. Rows whose port or loss
/// cell is not an integer are skipped.
pub fn validate(phases: &[Phase], drops: &DropAccumulator) -> Validation {
    let Some(reference) = select_reference_phase(phases) else {
        tracing::debug!("no reference phase; defaulting verdict to pass");
        return Validation::default();
    };

    let mismatches: Vec<PortMismatch> = reference
        .main_table
        .iter()
        .filter_map(|row| reconcile_row(row, drops))
        .collect();
    for mismatch in &mismatches {
        tracing::warn!(
            port = mismatch.port,
            table_lost = mismatch.table_lost,
            real_drops = mismatch.real_drops,
            "lost counter mismatch"
        );
    }

    let verdict = if mismatches.is_empty() {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    Validation {
        reference_phase_name: Some(reference.name.clone()),
        verdict,
        mismatches,
    }
}

fn reconcile_row(row: &TableRow, drops: &DropAccumulator) -> Option<PortMismatch> {
    let port = parse_port(row.first()?)?;
    let table_lost = parse_counter(row.get(LOST_COLUMN)?)?;
    let real_drops = drops.real_drops(port);
    (real_drops != table_lost).then_some(PortMismatch {
        port,
        table_lost,
        real_drops,
    })
}

fn parse_port(cell: &str) -> Option<PortId> {
    if cell.is_empty() || !cell.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    cell.parse().ok()
}

/// Parses a loss cell, ignoring thousands separators.
fn parse_counter(cell: &str) -> Option<i64> {
    cell.replace(',', "").trim().parse().ok()
}
