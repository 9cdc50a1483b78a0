mod bootstrap_helpers;
mod cli_args;
mod export;
mod summary;

use anyhow::{Context, Result};
use clap::Parser;
use dtn_log_parser::{parse_log_file, ParserOptions};

use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::Cli;
use crate::export::write_report_json;
use crate::summary::render_summary;

const VERDICT_FAIL_EXIT_CODE: i32 = 2;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let result = parse_log_file(&cli.input, &ParserOptions::default())
        .with_context(|| format!("failed to ingest {}", cli.input.display()))?;

    println!("{}", render_summary(&cli.input, &result, cli.show_health_blocks));

    if result.is_empty() {
        tracing::warn!(
            input = %cli.input.display(),
            "no telemetry-bearing phases remain; nothing to report"
        );
        println!("no valid test phases with health data; report export skipped");
        return Ok(());
    }

    if let Some(destination) = cli.json_out.as_deref() {
        write_report_json(destination, &cli.input, &result)?;
        tracing::info!(path = %destination.display(), "report export written");
        println!("report export written: {}", destination.display());
    }

    if cli.fail_on_mismatch && !result.verdict.is_pass() {
        std::process::exit(VERDICT_FAIL_EXIT_CODE);
    }
    Ok(())
}
