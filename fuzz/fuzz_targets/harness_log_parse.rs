#![no_main]

use dtn_log_parser::{parse_log_reader, ParserOptions};
use dtn_log_types::{Verdict, TEST_RESULT_KEY};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let result = match parse_log_reader(data, &ParserOptions::default()) {
        Ok(result) => result,
        Err(error) => panic!("in-memory input must never fail to read: {error}"),
    };
    assert!(result.phases.iter().all(|phase| phase.has_telemetry));
    assert_eq!(result.verdict == Verdict::Fail, !result.mismatches.is_empty());
    assert_eq!(
        result.metadata.get(TEST_RESULT_KEY).map(String::as_str),
        Some(result.verdict.as_str())
    );
    if result.reference_phase_name.is_none() {
        assert_eq!(result.verdict, Verdict::Pass);
    }
});
