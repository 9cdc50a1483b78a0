use std::path::PathBuf;

use dtn_log_parser::{parse_log_file, parse_log_str, ParserOptions};
use dtn_log_types::{ParseResult, PortMismatch, Verdict, NOT_AVAILABLE, TEST_RESULT_KEY};
use proptest::prelude::*;

const SOAK_FIXTURE: &str = include_str!("fixtures/dtn_soak_sample.log");

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("dtn_soak_sample.log")
}

fn parse(text: &str) -> ParseResult {
    parse_log_str(text, &ParserOptions::default())
}

fn main_row(port: u32, lost: &str) -> String {
    format!("{port}║10║640║0.1║10║640║0.1║10║0║{lost}║0║0.0")
}

fn health_line(port: u32, dropped: u64) -> String {
    format!("[HEALTH] {port} | 0 | 0 | {dropped} | 0 | 0 | 0 | 0 |")
}

#[test]
fn integration_soak_fixture_recovers_phases_tables_and_verdict() {
    let result = parse_log_file(&fixture_path(), &ParserOptions::default()).expect("parse fixture");

    assert_eq!(result.metadata.len(), 9);
    assert_eq!(
        result.metadata.get("Test Name").map(String::as_str),
        Some("DTN 34-port soak")
    );
    assert_eq!(
        result.metadata.get("Revision Date").map(String::as_str),
        Some("19/02/2026")
    );
    assert_eq!(result.metadata.get("Revision").map(String::as_str), Some("0.0A"));
    assert_eq!(
        result.metadata.get(TEST_RESULT_KEY).map(String::as_str),
        Some("Pass")
    );

    let names: Vec<&str> = result.phases.iter().map(|phase| phase.name.as_str()).collect();
    assert_eq!(names, vec!["TEST     1 sec", "TEST     2 sec"]);
    assert_eq!(result.test_duration.as_deref(), Some("0s"));
    assert_eq!(result.formatted_duration(), "0s (00:00:00)");
    assert_eq!(result.reference_phase_name.as_deref(), Some("TEST     2 sec"));
    assert_eq!(result.verdict, Verdict::Pass);
    assert!(result.mismatches.is_empty());

    let second = &result.phases[0];
    assert_eq!(second.main_table.len(), 2);
    assert_eq!(second.main_table[1][9], "3");
    assert_eq!(second.raw_multi_table.len(), 1);
    assert_eq!(second.ast_meta, vec!["Temperature: 42C", "Uptime: 121 s"]);
    assert_eq!(second.ast_table.len(), 2);
    assert_eq!(second.mgr_meta, vec!["Voltage: 0.9V"]);
    assert_eq!(second.mgr_table.len(), 1);
    assert!(second.port12_table.is_empty());

    let third = &result.phases[1];
    assert_eq!(third.port12_table.len(), 1);
    assert_eq!(third.port12_table[0][0], "Port 2");
    assert!(third.mgr_table.is_empty());

    assert_eq!(result.drop_counters.real_drops(1), 3);
    assert_eq!(result.drop_counters.first_seen(0), Some(0));
    assert_eq!(result.drop_counters.last_seen(32), Some(0));

    let blocks = &result.health_blocks;
    assert_eq!(blocks.first_assistant_block.len(), 8);
    assert_eq!(blocks.last_assistant_block.len(), 5);
    assert_eq!(blocks.first_manager_block.len(), 5);
    assert_eq!(blocks.last_manager_block.len(), 4);
    assert!(blocks.first_assistant_block[1].contains("Temperature: 41C"));

    let summary = result.summary_table().expect("summary table");
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0][1], "3,000");
}

#[test]
fn regression_soak_fixture_flags_disagreeing_lost_column() {
    let tampered = SOAK_FIXTURE.replace(
        "2,997 │ 191,808 │ 0.51 │ 2,997 │ 0 │ 3 │",
        "2,997 │ 191,808 │ 0.51 │ 2,997 │ 0 │ 5 │",
    );
    assert_ne!(tampered, SOAK_FIXTURE);
    let result = parse(&tampered);
    assert_eq!(result.verdict, Verdict::Fail);
    assert_eq!(
        result.mismatch_descriptions(),
        vec!["Port 1 mismatch -> table: 5 | device: 3".to_string()]
    );
    assert_eq!(
        result.metadata.get(TEST_RESULT_KEY).map(String::as_str),
        Some("Fail")
    );
}

#[test]
fn functional_single_telemetry_phase_is_dropped_as_warm_up() {
    let log = [
        "========== [TEST 3 sn] ==========".to_string(),
        "[HEALTH] 1 | 0 | 0 | 1 | 0 | 0 | 0 | 2 |".to_string(),
        main_row(1, "1"),
    ]
    .join("\n");
    let result = parse(&log);
    assert!(result.is_empty());
    assert_eq!(result.verdict, Verdict::Pass);
    assert!(result.mismatches.is_empty());
    assert_eq!(result.test_duration.as_deref(), Some("2s"));
    assert_eq!(result.drop_counters.first_seen(1), Some(3));
}

#[test]
fn functional_second_identical_phase_survives_renumbered() {
    let block = [
        "========== [TEST 3 sn] ==========".to_string(),
        "[HEALTH] 1 | 0 | 0 | 1 | 0 | 0 | 0 | 2 |".to_string(),
        main_row(1, "0"),
    ]
    .join("\n");
    let result = parse(&format!("{block}\n{block}\n"));
    assert_eq!(result.phases.len(), 1);
    assert_eq!(result.phases[0].name, "TEST 2 sec");
    assert_eq!(result.test_duration.as_deref(), Some("2s"));
    assert_eq!(result.verdict, Verdict::Pass);
    assert_eq!(result.reference_phase_name.as_deref(), Some("TEST 2 sec"));
}

#[test]
fn functional_lost_column_disagreement_records_exactly_one_mismatch() {
    let log = [
        "========== [TEST 1 sn] ==========".to_string(),
        health_line(1, 0),
        "========== [TEST 2 sn] ==========".to_string(),
        health_line(1, 1),
        main_row(1, "5"),
        main_row(2, "0"),
    ]
    .join("\n");
    let result = parse(&log);
    assert_eq!(result.verdict, Verdict::Fail);
    assert_eq!(
        result.mismatches,
        vec![PortMismatch {
            port: 1,
            table_lost: 5,
            real_drops: 1,
        }]
    );
}

#[test]
fn functional_metadata_only_log_has_nothing_to_report() {
    let result = parse("Test Name: bench\nSerial Number: SN-1\nTester Name:\n");
    assert!(result.is_empty());
    assert_eq!(result.verdict, Verdict::Pass);
    assert_eq!(result.reference_phase_display(), NOT_AVAILABLE);
    assert_eq!(result.duration_display(), NOT_AVAILABLE);
    assert_eq!(result.metadata.get("Tester Name").map(String::as_str), Some(""));
}

#[test]
fn integration_reparsing_rendered_tables_is_idempotent() {
    let baseline = parse(SOAK_FIXTURE);
    let mut rendered = vec![
        "========== [TEST 1 sn] ==========".to_string(),
        health_line(0, 0),
    ];
    for (index, phase) in baseline.phases.iter().enumerate() {
        rendered.push(format!("========== [TEST {} sn] ==========", index + 2));
        rendered.push(health_line(0, 0));
        rendered.extend(phase.main_table.iter().map(|row| row.join(" ║ ")));
        rendered.extend(phase.raw_multi_table.iter().map(|row| row.join(" ║ ")));
        for row in &phase.port12_table {
            rendered.push("Port 12 RX".to_string());
            rendered.push(row.join(" ║ "));
        }
        for row in &phase.port13_table {
            rendered.push("Port 13 RX".to_string());
            rendered.push(row.join(" ║ "));
        }
    }

    let reparsed = parse(&rendered.join("\n"));
    assert_eq!(reparsed.phases.len(), baseline.phases.len());
    for (left, right) in baseline.phases.iter().zip(&reparsed.phases) {
        assert_eq!(left.main_table, right.main_table);
        assert_eq!(left.raw_multi_table, right.raw_multi_table);
        assert_eq!(left.port12_table, right.port12_table);
        assert_eq!(left.port13_table, right.port13_table);
    }
}

#[test]
fn integration_export_round_trips_through_json() {
    let result = parse(SOAK_FIXTURE);
    let encoded = serde_json::to_string(&result).expect("encode result");
    let decoded: ParseResult = serde_json::from_str(&encoded).expect("decode result");
    assert_eq!(decoded, result);
}

fn render_phase_log(telemetry: &[bool]) -> String {
    let mut lines = Vec::new();
    for (index, has_telemetry) in telemetry.iter().enumerate() {
        lines.push(format!("========== [TEST {} sn] ==========", index + 1));
        lines.push(main_row(0, "0"));
        if *has_telemetry {
            lines.push(health_line(0, 0));
        }
    }
    lines.join("\n")
}

fn render_samples(samples: &[(u32, u64)], boundaries: &[bool]) -> String {
    let mut lines = Vec::new();
    for (index, (port, dropped)) in samples.iter().enumerate() {
        if boundaries.get(index).copied().unwrap_or(false) {
            lines.push(format!("========== [TEST {} sn] ==========", index + 1));
        }
        lines.push(health_line(*port, *dropped));
    }
    lines.join("\n")
}

proptest! {
    #[test]
    fn property_retained_phase_count_drops_first_telemetry_phase(
        telemetry in proptest::collection::vec(any::<bool>(), 0..10)
    ) {
        let result = parse(&render_phase_log(&telemetry));
        let with_telemetry: Vec<usize> = telemetry
            .iter()
            .enumerate()
            .filter_map(|(index, flag)| flag.then_some(index))
            .collect();
        prop_assert_eq!(result.phases.len(), with_telemetry.len().saturating_sub(1));
        for (phase, telemetry_index) in result.phases.iter().zip(with_telemetry.iter().skip(1)) {
            prop_assert!(phase.has_telemetry);
            prop_assert_eq!(&phase.name, &format!("TEST {telemetry_index} sec"));
        }
        prop_assert_eq!(result.verdict == Verdict::Fail, !result.mismatches.is_empty());
    }

    #[test]
    fn property_drop_counters_ignore_phase_grouping(
        samples in proptest::collection::vec((0u32..4, 0u64..1_000), 0..24),
        boundaries in proptest::collection::vec(any::<bool>(), 0..24)
    ) {
        let flat = parse(&render_samples(&samples, &[]));
        let grouped = parse(&render_samples(&samples, &boundaries));
        prop_assert_eq!(flat.drop_counters, grouped.drop_counters);
    }

    #[test]
    fn property_verdict_fails_iff_mismatches_exist(
        lost in proptest::collection::vec(0u64..4, 1..6),
        final_drops in proptest::collection::vec(0u64..4, 1..6)
    ) {
        let mut lines = vec![
            "========== [TEST 1 sn] ==========".to_string(),
            health_line(0, 0),
            "========== [TEST 2 sn] ==========".to_string(),
        ];
        for (port, dropped) in final_drops.iter().enumerate() {
            lines.push(health_line(port as u32, *dropped));
        }
        for (port, value) in lost.iter().enumerate() {
            lines.push(main_row(port as u32, &value.to_string()));
        }
        let result = parse(&lines.join("\n"));
        prop_assert_eq!(result.verdict == Verdict::Fail, !result.mismatches.is_empty());
        prop_assert_eq!(result.verdict.as_str(), result.metadata[TEST_RESULT_KEY].as_str());
    }

    #[test]
    fn property_arbitrary_input_never_panics(input in any::<String>()) {
        let result = parse(&input);
        prop_assert!(result.phases.iter().all(|phase| phase.has_telemetry));
        prop_assert_eq!(result.verdict == Verdict::Fail, !result.mismatches.is_empty());
    }
}
