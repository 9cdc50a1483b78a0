use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use dtn_log_types::ParseResult;
use serde::Serialize;

pub(crate) const REPORT_EXPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct ReportExport<'a> {
    schema_version: u32,
    generated_at: String,
    input: String,
    formatted_duration: String,
    mismatch_descriptions: Vec<String>,
    result: &'a ParseResult,
}

pub(crate) fn render_report_json(input: &Path, result: &ParseResult) -> Result<String> {
    let export = ReportExport {
        schema_version: REPORT_EXPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        input: input.display().to_string(),
        formatted_duration: result.formatted_duration(),
        mismatch_descriptions: result.mismatch_descriptions(),
        result,
    };
    serde_json::to_string_pretty(&export).context("failed to serialize report export")
}

pub(crate) fn write_report_json(
    destination: &Path,
    input: &Path,
    result: &ParseResult,
) -> Result<()> {
    let payload = render_report_json(input, result)?;
    dtn_core::write_text_atomic(destination, &payload)
        .with_context(|| format!("failed to write report export {}", destination.display()))
}
