//! # GUI Automation
//!
//! Replays a short scripted workflow of waits and mouse clicks against the
//! desktop. The default workflow is a single left click at (150, 300) after
//! a two second warm-up, followed by a half second settle delay.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │   Workflow   │───▶│ InputBackend │───▶│  X server (XTest) │
//! │ wait / click │    │   trait      │    │  or dry-run log   │
//! └──────────────┘    └──────────────┘    └──────────────────┘
//! ```
//!
//! Workflows can be loaded from JSON:
//!
//! ```json
//! { "steps": [ { "wait": { "ms": 2000 } },
//!              { "click": { "x": 150, "y": 300, "button": "left" } } ] }
//! ```
//!
//! There is no retry and no check that a click had any effect.

#[cfg(all(target_os = "linux", feature = "x11-input"))]
pub mod x11;

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{HarnessError, HarnessResult};

/// Longest single wait a workflow may contain.
pub const MAX_WAIT_MS: u64 = 60_000;

/// Mouse button to press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// X11 core protocol button number.
    pub fn x11_code(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Middle => 2,
            Self::Right => 3,
        }
    }
}

/// One workflow step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Wait {
        ms: u64,
    },
    Click {
        x: i32,
        y: i32,
        #[serde(default)]
        button: MouseButton,
    },
}

/// Source of synthetic input events.
pub trait InputBackend {
    /// Human-readable backend name for logs and errors.
    fn name(&self) -> &'static str;

    /// Moves the pointer to (`x`, `y`) in root-window coordinates and clicks `button`.
    fn click(&mut self, x: i16, y: i16, button: MouseButton) -> HarnessResult<()>;
}

/// Blocking pause between steps.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// [`Sleeper`] backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Backend that only records and logs the clicks it is asked to perform.
#[derive(Debug, Default, Clone)]
pub struct DryRunBackend {
    pub clicks: Vec<(i16, i16, MouseButton)>,
}

impl InputBackend for DryRunBackend {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn click(&mut self, x: i16, y: i16, button: MouseButton) -> HarnessResult<()> {
        info!(x, y, ?button, "dry-run click");
        self.clicks.push((x, y, button));
        Ok(())
    }
}

/// Opens the platform input backend, or the dry-run backend when requested.
pub fn open_backend(dry_run: bool) -> HarnessResult<Box<dyn InputBackend>> {
    if dry_run {
        return Ok(Box::new(DryRunBackend::default()));
    }

    platform_backend()
}

#[cfg(all(target_os = "linux", feature = "x11-input"))]
fn platform_backend() -> HarnessResult<Box<dyn InputBackend>> {
    Ok(Box::new(x11::X11Backend::connect()?))
}

#[cfg(not(all(target_os = "linux", feature = "x11-input")))]
fn platform_backend() -> HarnessResult<Box<dyn InputBackend>> {
    Err(HarnessError::automation(
        "none",
        "no input backend compiled in; build on Linux with the x11-input feature",
    )
    .with_recovery_suggestion("run with --dry-run to preview the workflow"))
}

/// An ordered list of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub steps: Vec<Action>,
}

impl Default for Workflow {
    /// Wait 2 s, left click at (150, 300), wait 0.5 s.
    fn default() -> Self {
        Self::single_click(2000, 150, 300, 500)
    }
}

/// Converts `duration` to a wait step length, rejecting anything above
/// [`MAX_WAIT_MS`]. `field` names the setting in the error.
pub fn wait_millis(field: &str, duration: Duration) -> HarnessResult<u64> {
    u64::try_from(duration.as_millis())
        .ok()
        .filter(|ms| *ms <= MAX_WAIT_MS)
        .ok_or_else(|| {
            HarnessError::config(
                field,
                format!("{:?}", duration),
                format!("must not exceed {} ms", MAX_WAIT_MS),
            )
        })
}

impl Workflow {
    /// Warm-up wait, one left click, settle wait. Zero-length waits are omitted.
    pub fn single_click(delay_ms: u64, x: i32, y: i32, settle_ms: u64) -> Self {
        let mut steps = Vec::with_capacity(3);
        if delay_ms > 0 {
            steps.push(Action::Wait { ms: delay_ms });
        }
        steps.push(Action::Click {
            x,
            y,
            button: MouseButton::Left,
        });
        if settle_ms > 0 {
            steps.push(Action::Wait { ms: settle_ms });
        }
        Self { steps }
    }

    /// Parses and validates a JSON workflow.
    pub fn from_json(json: &str) -> HarnessResult<Self> {
        let workflow: Workflow = serde_json::from_str(json)
            .map_err(|e| HarnessError::config("workflow", "<json>", e.to_string()))?;
        workflow.validate()?;
        Ok(workflow)
    }

    /// Reads a workflow file.
    pub fn load(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            HarnessError::io("read workflow", e).with_path(path.display().to_string())
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> HarnessResult<()> {
        if self.steps.is_empty() {
            return Err(HarnessError::config("workflow.steps", "[]", "must contain at least one step"));
        }
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                Action::Wait { ms } if *ms > MAX_WAIT_MS => {
                    return Err(HarnessError::config(
                        format!("workflow.steps[{}].wait.ms", index),
                        ms.to_string(),
                        format!("must not exceed {}", MAX_WAIT_MS),
                    ));
                }
                Action::Click { x, y, .. } => {
                    to_coordinate(*x).ok_or_else(|| coordinate_error(index, "x", *x))?;
                    to_coordinate(*y).ok_or_else(|| coordinate_error(index, "y", *y))?;
                }
                Action::Wait { .. } => {}
            }
        }
        Ok(())
    }

    /// Number of click steps.
    pub fn click_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Action::Click { .. }))
            .count()
    }

    /// Executes the steps in order and stops at the first backend error.
    pub fn run(
        &self,
        backend: &mut dyn InputBackend,
        sleeper: &mut dyn Sleeper,
    ) -> HarnessResult<usize> {
        self.validate()?;
        let mut clicks = 0;
        for (index, step) in self.steps.iter().enumerate() {
            match *step {
                Action::Wait { ms } => {
                    debug!(step = index, ms, "waiting");
                    sleeper.sleep(Duration::from_millis(ms));
                }
                Action::Click { x, y, button } => {
                    let (x, y) = match (to_coordinate(x), to_coordinate(y)) {
                        (Some(x), Some(y)) => (x, y),
                        _ => return Err(coordinate_error(index, "x/y", x)),
                    };
                    info!(step = index, x, y, ?button, backend = backend.name(), "clicking");
                    backend
                        .click(x, y, button)
                        .map_err(|e| e.with_context(format!("workflow step {}", index)))?;
                    clicks += 1;
                }
            }
        }
        Ok(clicks)
    }
}

fn to_coordinate(value: i32) -> Option<i16> {
    i16::try_from(value).ok().filter(|v| *v >= 0)
}

fn coordinate_error(index: usize, axis: &str, value: i32) -> HarnessError {
    HarnessError::config(
        format!("workflow.steps[{}].click.{}", index, axis),
        value.to_string(),
        "must be between 0 and 32767",
    )
}
