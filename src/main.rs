use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use ocr_smoke::config::config::{DEFAULT_BASE_URL, HarnessConfig, parse_duration};

/// End-to-end smoke checks for the OCR platform API:
/// auth, upload, document CRUD, profile and stats, in a fixed order.
#[derive(Parser, Debug)]
#[command(name = "ocr-smoke")]
#[command(about = "🚀 Run the OCR platform backend API checks")]
#[command(long_about = "Run every OCR platform API check once, in order, against a live deployment.
Prints a pass/fail line per check and exits 0 only when all of them pass.")]
struct Args {
    /// Service origin
    #[arg(long, default_value = DEFAULT_BASE_URL, help = "Origin of the service under test")]
    base_url: String,

    /// Pause after upload
    #[arg(long, default_value = "3s",
          help = "How long to wait for OCR processing after upload: 500ms, 3s, 1m")]
    processing_wait: String,

    /// Per-request timeout in seconds
    #[arg(long, help = "Per-request timeout in seconds (default: HTTP client default)")]
    timeout_secs: Option<u64>,

    /// Debug-level diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    ocr_smoke::logging::init(args.verbose);

    let processing_wait = parse_duration(&args.processing_wait)?;
    let config = HarnessConfig::new(args.base_url, processing_wait)
        .with_request_timeout(args.timeout_secs.map(Duration::from_secs));
    config.validate().map_err(anyhow::Error::msg)?;

    let summary = ocr_smoke::run_checks(config)?;
    Ok(if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
