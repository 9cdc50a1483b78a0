use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "dtn-report",
    about = "Parse a DTN throughput harness log and reconcile per-port packet loss",
    version
)]
/// Command-line options for the `dtn-report` binary.
pub struct Cli {
    #[arg(
        short = 'i',
        long,
        env = "DTN_REPORT_INPUT",
        help = "Path to the harness log to parse."
    )]
    pub input: PathBuf,

    #[arg(
        long = "json-out",
        env = "DTN_REPORT_JSON_OUT",
        help = "Optional path for the JSON export of the parse result. Written atomically; skipped when no phase survives filtering."
    )]
    pub json_out: Option<PathBuf>,

    #[arg(
        long = "log-level",
        env = "DTN_REPORT_LOG_LEVEL",
        help = "Tracing filter directive (for example `debug` or `dtn_log_parser=trace`). Overrides RUST_LOG."
    )]
    pub log_level: Option<String>,

    #[arg(
        long = "show-health-blocks",
        default_value_t = false,
        help = "Print the first and last assistant/manager health block snapshots."
    )]
    pub show_health_blocks: bool,

    #[arg(
        long = "fail-on-mismatch",
        default_value_t = false,
        help = "Exit with status 2 when the verdict is Fail."
    )]
    pub fail_on_mismatch: bool,
}
