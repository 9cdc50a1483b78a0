use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Network port number as printed by the harness.
pub type PortId = u32;

/// File-wide first/last cumulative drop counters per port.
///
/// Phase boundaries never reset these values; the counters are monotonic
/// hardware totals sampled at arbitrary points in the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropAccumulator {
    first_seen: BTreeMap<PortId, u64>,
    last_seen: BTreeMap<PortId, u64>,
}

impl DropAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one sample. The first sample per port is kept forever; the
    /// last sample is overwritten on every call.
    pub fn record(&mut self, port: PortId, drops: u64) {
        self.first_seen.entry(port).or_insert(drops);
        self.last_seen.insert(port, drops);
    }

    pub fn first_seen(&self, port: PortId) -> Option<u64> {
        self.first_seen.get(&port).copied()
    }

    pub fn last_seen(&self, port: PortId) -> Option<u64> {
        self.last_seen.get(&port).copied()
    }

    /// Drops observed on `port` across the whole file; missing samples count as zero.
    pub fn real_drops(&self, port: PortId) -> i64 {
        let last = clamp_i64(self.last_seen(port).unwrap_or(0));
        let first = clamp_i64(self.first_seen(port).unwrap_or(0));
        last.saturating_sub(first)
    }

    pub fn ports(&self) -> impl Iterator<Item = PortId> + '_ {
        self.last_seen.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
