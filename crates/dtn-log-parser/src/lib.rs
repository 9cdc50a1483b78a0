//! Parser and validator for DTN network-throughput harness logs.
//!
//! A single pass classifies each line, drives the composite state machine,
//! and accumulates file-wide drop counters. After the stream ends the phase
//! list is filtered and renumbered, then the last telemetry-bearing phase is
//! reconciled against the counters to produce a pass/fail verdict.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use dtn_log_types::{LogIngestError, ParseResult, TEST_RESULT_KEY};

pub mod classifier;
mod input;
pub mod post_process;
mod state;
mod stream_parser;
pub mod validator;

pub use classifier::{classify_line, LineClass, DEFAULT_METADATA_KEYS};
pub use input::{decode_dropping_invalid, LossyLines};
pub use post_process::{
    correct_test_duration, decrement_embedded_numbers, retain_reportable_phases,
};
pub use state::{HealthRoute, HealthSide, ParserState, TableCursor};
pub use stream_parser::{ParsedStream, StreamParser};
pub use validator::{select_reference_phase, validate, Validation, LOST_COLUMN};

/// Library-level parser knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Labels recognized as metadata when a line starts with one and has a colon.
    pub metadata_keys: Vec<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            metadata_keys: DEFAULT_METADATA_KEYS
                .iter()
                .map(|key| key.to_string())
                .collect(),
        }
    }
}

/// Opens `path` and parses it. Only open/read failures are errors.
pub fn parse_log_file(
    path: &Path,
    options: &ParserOptions,
) -> Result<ParseResult, LogIngestError> {
    let file = File::open(path).map_err(|source| LogIngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "parsing harness log");
    parse_log_reader(BufReader::new(file), options)
}

/// Parses every line of `reader`, tolerating invalid UTF-8.
pub fn parse_log_reader<R: BufRead>(
    reader: R,
    options: &ParserOptions,
) -> Result<ParseResult, LogIngestError> {
    let mut parser = StreamParser::new(options.clone());
    for line in LossyLines::new(reader) {
        parser.feed_line(&line?);
    }
    Ok(finalize(parser.finish()))
}

/// Parses an in-memory log.
pub fn parse_log_str(text: &str, options: &ParserOptions) -> ParseResult {
    let mut parser = StreamParser::new(options.clone());
    for line in text.lines() {
        parser.feed_line(line);
    }
    finalize(parser.finish())
}

/// Post-processes a finished stream and reconciles its counters.
pub fn finalize(stream: ParsedStream) -> ParseResult {
    let ParsedStream {
        mut metadata,
        phases,
        test_duration,
        health_blocks,
        drops,
    } = stream;

    let phases = retain_reportable_phases(phases);
    let test_duration = correct_test_duration(test_duration);
    let validation = validate(&phases, &drops);
    metadata.insert(
        TEST_RESULT_KEY.to_string(),
        validation.verdict.as_str().to_string(),
    );
    tracing::info!(
        phases = phases.len(),
        verdict = %validation.verdict,
        mismatches = validation.mismatches.len(),
        "harness log validated"
    );

    ParseResult {
        metadata,
        phases,
        test_duration,
        reference_phase_name: validation.reference_phase_name,
        verdict: validation.verdict,
        mismatches: validation.mismatches,
        health_blocks,
        drop_counters: drops,
    }
}
