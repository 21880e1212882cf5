use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use ocr_smoke::HasRecoverySuggestion;
use ocr_smoke::automation::{self, ThreadSleeper, Workflow};
use ocr_smoke::config::config::parse_duration;

/// Scripted GUI click: wait for the desktop to settle, click once, exit.
#[derive(Parser, Debug)]
#[command(name = "autoclick")]
#[command(about = "🖱️ Replay a scripted mouse click on the desktop")]
struct Args {
    /// JSON workflow file; overrides --delay/--x/--y/--settle
    #[arg(long)]
    workflow: Option<PathBuf>,

    /// Warm-up delay before the click
    #[arg(long, default_value = "2s", help = "Initial delay before clicking: 500ms, 2s")]
    delay: String,

    /// Screen X coordinate
    #[arg(long, default_value_t = 150)]
    x: i32,

    /// Screen Y coordinate
    #[arg(long, default_value_t = 300)]
    y: i32,

    /// Pause after the click before exiting
    #[arg(long, default_value = "500ms")]
    settle: String,

    /// Log the clicks instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Debug-level diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn build_workflow(args: &Args) -> Result<Workflow> {
    match &args.workflow {
        Some(path) => Ok(Workflow::load(path)?),
        None => {
            let delay = automation::wait_millis("--delay", parse_duration(&args.delay)?)?;
            let settle = automation::wait_millis("--settle", parse_duration(&args.settle)?)?;
            Ok(Workflow::single_click(delay, args.x, args.y, settle))
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    ocr_smoke::logging::init(args.verbose);

    let workflow = build_workflow(&args)?;
    let result = automation::open_backend(args.dry_run)
        .and_then(|mut backend| workflow.run(backend.as_mut(), &mut ThreadSleeper));

    match result {
        Ok(_) => {
            println!("✓ Automation completed successfully!");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("✗ Error during automation: {}", e);
            if let Some(context) = &e.context().context {
                println!("  During: {}", context);
            }
            if let Some(hint) = e.recovery_suggestion() {
                println!("  Hint: {}", hint);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
