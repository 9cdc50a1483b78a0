//! Fixed correction policy applied once the whole stream is consumed.
//!
//! The harness labels each phase one second late and opens with a warm-up
//! measurement, so retained phases are renumbered and the first telemetry
//! phase is dropped.

use std::sync::OnceLock;

use dtn_core::parse_duration_seconds;
use dtn_log_types::Phase;
use regex::Regex;

/// Keeps telemetry-bearing phases, drops the warm-up one, and renumbers names.
pub fn retain_reportable_phases(phases: Vec<Phase>) -> Vec<Phase> {
    let total = phases.len();
    let mut retained: Vec<Phase> = phases
        .into_iter()
        .filter(|phase| phase.has_telemetry)
        .skip(1)
        .collect();
    for phase in &mut retained {
        phase.name = decrement_embedded_numbers(&phase.name);
    }
    tracing::debug!(
        parsed = total,
        retained = retained.len(),
        "phase post-processing complete"
    );
    retained
}

/// Decrements every integer literal in `text` by one, floored at zero.
///
/// Literals too large for `u64` are left untouched.
pub fn decrement_embedded_numbers(text: &str) -> String {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let pattern = DIGITS.get_or_init(|| Regex::new(r"[0-9]+").expect("digit pattern compiles"));
    pattern
        .replace_all(text, |captures: &regex::Captures<'_>| {
            let literal = &captures[0];
            match literal.parse::<u64>() {
                Ok(value) => value.saturating_sub(1).to_string(),
                Err(_) => literal.to_string(),
            }
        })
        .into_owned()
}

/// Applies the same one-second correction to the captured test duration.
pub fn correct_test_duration(duration: Option<String>) -> Option<String> {
    let raw = duration?;
    match parse_duration_seconds(&raw) {
        Some(seconds) => Some(format!("{}s", seconds.saturating_sub(1))),
        None => Some(raw),
    }
}
