//! # OCR Platform Smoke Checks
//!
//! Black-box checks for an OCR web service's HTTP API, plus a small desktop
//! click automation used by a GUI pipeline.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `config`: run configuration and per-run session state
//! - `client`: blocking HTTP client bound to one deployment
//! - `models`: response envelope helpers and typed records
//! - `fixtures`: test user and upload payloads
//! - `checks`: one function per endpoint check, plus the run plan
//! - `runner` / `report`: sequential execution and the stdout report
//! - `automation`: scripted waits and clicks through an input backend
//!
//! ## Behavior
//!
//! - **Sequential**: one request per check, in a fixed order, no retries
//! - **Non-aborting**: every failure becomes a report line and the run goes on
//! - **Exit status**: 0 when every check passed, 1 otherwise
//!
//! ## Example
//!
//! ```rust,no_run
//! use ocr_smoke::run_checks;
//! use ocr_smoke::config::config::HarnessConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let summary = run_checks(HarnessConfig::default())?;
//! std::process::exit(summary.exit_code());
//! # }
//! ```

// External crate imports
use anyhow::Result;

// Internal module imports
pub mod automation;
pub mod checks;
pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod models;
pub mod report;
pub mod runner;

/// Re-export error types for convenience
pub use error::{HarnessError, HarnessResult, HasRecoverySuggestion};
pub use runner::{RunSummary, TestRunner};

/// Runs the full check plan against `config` and prints the report to stdout.
///
/// # Errors
///
/// Returns an error only when the configuration is invalid or stdout cannot
/// be written. Check failures are reported in the returned summary.
pub fn run_checks(config: config::config::HarnessConfig) -> Result<RunSummary> {
    let mut runner = TestRunner::new(config)?;
    let mut reporter = report::Reporter::stdout();
    Ok(runner.run(&mut reporter)?)
}
