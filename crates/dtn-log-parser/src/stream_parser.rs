//! Single-pass stream parser for DTN harness logs.

use dtn_log_types::{DropAccumulator, HealthSnapshots, Metadata, Phase, TableRow};

use crate::classifier::{
    classify_line, is_health_table_header, parse_health_counters, split_health_cells,
    HealthMarker, LineClass, TableRowKind,
};
use crate::state::{HealthRoute, HealthSide, ParserState, TableCursor};
use crate::ParserOptions;

const HEALTH_TABLE_MIN_CELLS: usize = 8;

/// Everything collected from the stream before post-processing.
#[derive(Debug, Clone, Default)]
pub struct ParsedStream {
    pub metadata: Metadata,
    /// Phases in log order, telemetry-less ones included.
    pub phases: Vec<Phase>,
    /// First duration token seen on a phase-start marker, as `"<N>s"`.
    pub test_duration: Option<String>,
    pub health_blocks: HealthSnapshots,
    pub drops: DropAccumulator,
}

/// Line-at-a-time state machine; feed lines in input order, then [`finish`].
///
/// [`finish`]: StreamParser::finish
#[derive(Debug, Default)]
pub struct StreamParser {
    options: ParserOptions,
    state: ParserState,
    out: ParsedStream,
    assistant_block: Vec<String>,
    manager_block: Vec<String>,
}

impl StreamParser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Consumes one raw line. Blank and unrecognized lines are skipped.
    pub fn feed_line(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        match classify_line(line, &self.options.metadata_keys) {
            LineClass::Metadata { key, value } => {
                self.out.metadata.insert(key.to_string(), value.to_string());
            }
            LineClass::PhaseStart { name, duration } => self.start_phase(name, duration),
            LineClass::PhaseReset => self.reset_phase(),
            LineClass::Health { marker, content } => self.health_line(line, marker, &content),
            LineClass::TableRow {
                kind,
                cells,
                is_column_header,
            } => self.table_row(kind, cells, is_column_header),
            LineClass::PortRxHeader(port) => {
                if self.state.phase.is_some() && self.state.cursor == TableCursor::MainTable {
                    self.state.cursor = TableCursor::awaiting(port);
                }
            }
            LineClass::Unrecognized => {}
        }
    }

    /// Closes any open phase and hands back the collected stream.
    pub fn finish(mut self) -> ParsedStream {
        if let Some(phase) = self.state.phase.take() {
            self.commit_phase(phase);
        }
        self.out
    }

    fn start_phase(&mut self, name: String, duration: Option<String>) {
        if let Some(previous) = self.state.phase.take() {
            self.commit_phase(previous);
        }
        if self.out.test_duration.is_none() {
            self.out.test_duration = duration;
        }
        tracing::trace!(phase = %name, "phase opened");
        self.state.phase = Some(Phase::new(name));
        self.state.cursor = TableCursor::MainTable;
    }

    fn reset_phase(&mut self) {
        if let Some(discarded) = self.state.phase.take() {
            tracing::debug!(phase = %discarded.name, "phase discarded by reset marker");
        }
        self.state.cursor = TableCursor::MainTable;
    }

    fn commit_phase(&mut self, phase: Phase) {
        tracing::debug!(
            phase = %phase.name,
            has_telemetry = phase.has_telemetry,
            main_rows = phase.main_table.len(),
            "phase committed"
        );
        self.out.phases.push(phase);
    }

    fn health_line(&mut self, line: &str, marker: Option<HealthMarker>, content: &str) {
        match marker {
            Some(HealthMarker::AssistantOpen) => {
                self.state.open_health_block(HealthSide::Assistant);
                self.assistant_block = vec![line.to_string()];
            }
            Some(HealthMarker::ManagerOpen) => {
                self.state.open_health_block(HealthSide::Manager);
                self.manager_block = vec![line.to_string()];
            }
            Some(HealthMarker::AssistantTable) => {
                self.state.open_health_table(HealthSide::Assistant);
            }
            Some(HealthMarker::ManagerTable) => {
                self.state.open_health_table(HealthSide::Manager);
            }
            Some(HealthMarker::Close) => {
                if let Some(side) = self.state.capture {
                    self.commit_health_block(side, line);
                }
                self.state.close_health_block();
            }
            None => {
                match self.state.capture {
                    Some(HealthSide::Assistant) => self.assistant_block.push(line.to_string()),
                    Some(HealthSide::Manager) => self.manager_block.push(line.to_string()),
                    None => {}
                }
                self.route_health_content(content);
            }
        }

        if let Some(counters) = parse_health_counters(line) {
            match counters.sample() {
                Some((port, drops)) => self.out.drops.record(port, drops),
                None => tracing::debug!(line, "health counter port id out of range"),
            }
            if let Some(phase) = self.state.phase.as_mut() {
                phase.has_telemetry = true;
            }
        }
    }

    fn commit_health_block(&mut self, side: HealthSide, close_line: &str) {
        let (buffer, first, last) = match side {
            HealthSide::Assistant => (
                &mut self.assistant_block,
                &mut self.out.health_blocks.first_assistant_block,
                &mut self.out.health_blocks.last_assistant_block,
            ),
            HealthSide::Manager => (
                &mut self.manager_block,
                &mut self.out.health_blocks.first_manager_block,
                &mut self.out.health_blocks.last_manager_block,
            ),
        };
        buffer.push(close_line.to_string());
        *last = std::mem::take(buffer);
        if first.is_empty() {
            first.clone_from(last);
        }
        tracing::trace!(side = ?side, lines = last.len(), "health block committed");
    }

    fn route_health_content(&mut self, content: &str) {
        let (Some(phase), Some(route)) = (self.state.phase.as_mut(), self.state.route) else {
            return;
        };
        match route {
            HealthRoute::AssistMeta => phase.ast_meta.push(content.to_string()),
            HealthRoute::ManagerMeta => phase.mgr_meta.push(content.to_string()),
            HealthRoute::AssistTable => push_health_row(&mut phase.ast_table, content),
            HealthRoute::ManagerTable => push_health_row(&mut phase.mgr_table, content),
        }
    }

    fn table_row(&mut self, kind: TableRowKind, cells: TableRow, is_column_header: bool) {
        let Some(phase) = self.state.phase.as_mut() else {
            return;
        };
        let floor = kind.min_cells();
        match kind {
            TableRowKind::Main => {
                if cells.len() >= floor {
                    phase.main_table.push(cells);
                }
            }
            TableRowKind::RawMulti => {
                if cells.len() >= floor {
                    phase.raw_multi_table.push(cells);
                }
            }
            TableRowKind::PortRx => {
                let target = match self.state.cursor {
                    TableCursor::AwaitingPort12Row => &mut phase.port12_table,
                    TableCursor::AwaitingPort13Row => &mut phase.port13_table,
                    TableCursor::MainTable => return,
                };
                if is_column_header {
                    return;
                }
                if cells.len() >= floor {
                    target.push(cells);
                }
                self.state.cursor = TableCursor::MainTable;
            }
        }
    }
}

fn push_health_row(table: &mut Vec<TableRow>, content: &str) {
    if is_health_table_header(content) {
        return;
    }
    let cells = split_health_cells(content);
    if cells.len() >= HEALTH_TABLE_MIN_CELLS {
        table.push(cells);
    }
}
