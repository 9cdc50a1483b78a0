//! Composite parser state.
//!
//! The log interleaves independent grammars, so the parser tracks several
//! small axes side by side instead of one flattened state enum.

use dtn_log_types::Phase;

use crate::classifier::RxPort;

/// Which health block is currently being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthSide {
    Assistant,
    Manager,
}

/// Where lines inside a health block are routed within the open phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthRoute {
    AssistMeta,
    AssistTable,
    ManagerMeta,
    ManagerTable,
}

impl HealthRoute {
    pub fn meta_for(side: HealthSide) -> Self {
        match side {
            HealthSide::Assistant => Self::AssistMeta,
            HealthSide::Manager => Self::ManagerMeta,
        }
    }

    pub fn table_for(side: HealthSide) -> Self {
        match side {
            HealthSide::Assistant => Self::AssistTable,
            HealthSide::Manager => Self::ManagerTable,
        }
    }
}

/// Transient per-port RX cursor, meaningful only while a phase is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TableCursor {
    #[default]
    MainTable,
    AwaitingPort12Row,
    AwaitingPort13Row,
}

impl TableCursor {
    pub fn awaiting(port: RxPort) -> Self {
        match port {
            RxPort::Port12 => Self::AwaitingPort12Row,
            RxPort::Port13 => Self::AwaitingPort13Row,
        }
    }
}

/// All order-dependent state of one parsing pass.
///
/// `phase == None` is the no-phase state.
#[derive(Debug, Clone, Default)]
pub struct ParserState {
    pub phase: Option<Phase>,
    pub capture: Option<HealthSide>,
    pub route: Option<HealthRoute>,
    pub cursor: TableCursor,
}

impl ParserState {
    pub fn open_health_block(&mut self, side: HealthSide) {
        self.capture = Some(side);
        self.route = Some(HealthRoute::meta_for(side));
    }

    pub fn open_health_table(&mut self, side: HealthSide) {
        self.route = Some(HealthRoute::table_for(side));
    }

    pub fn close_health_block(&mut self) {
        self.capture = None;
        self.route = None;
    }
}
