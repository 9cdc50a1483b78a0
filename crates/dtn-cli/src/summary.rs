use std::path::Path;

use dtn_log_types::ParseResult;

/// Renders the operator-facing console summary of a parse.
pub(crate) fn render_summary(
    input: &Path,
    result: &ParseResult,
    show_health_blocks: bool,
) -> String {
    let mut lines = vec![
        format!("dtn report summary: input={}", input.display()),
        format!("  metadata_fields={}", result.metadata.len()),
        format!("  test_duration={}", result.formatted_duration()),
        format!("  valid_phases={}", result.phases.len()),
        format!("  reference_phase={}", result.reference_phase_display()),
        format!("  test_result={}", result.verdict),
    ];

    if !result.mismatches.is_empty() {
        lines.push("  mismatches:".to_string());
        for description in result.mismatch_descriptions() {
            lines.push(format!("    - {description}"));
        }
    }

    if let Some(summary) = result.summary_table() {
        lines.push(format!("  summary_table_rows={}", summary.len()));
    }

    if show_health_blocks {
        let blocks = &result.health_blocks;
        for (label, block) in [
            ("first_assistant_block", &blocks.first_assistant_block),
            ("last_assistant_block", &blocks.last_assistant_block),
            ("first_manager_block", &blocks.first_manager_block),
            ("last_manager_block", &blocks.last_manager_block),
        ] {
            lines.push(format!("  {label}:"));
            if block.is_empty() {
                lines.push("    none".to_string());
            }
            lines.extend(block.iter().map(|line| format!("    {line}")));
        }
    }

    lines.join("\n")
}
