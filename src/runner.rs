//! # Check Runner
//!
//! Runs the check plan once, in order, against one service deployment.
//!
//! ## Execution model
//!
//! - Single-threaded and strictly sequential; the only pause is the
//!   post-upload processing wait
//! - A failed check never aborts the run; later checks only fail early
//!   when they need a token or document id an earlier check did not produce
//! - The aggregate result maps to the process exit code: 0 when every
//!   check passed, 1 otherwise

use std::io::{self, Write};

use tracing::info;

use crate::checks::{CheckContext, CheckGroup, CheckOutcome, default_plan};
use crate::client::ApiClient;
use crate::config::config::HarnessConfig;
use crate::config::session::TestSession;
use crate::error::HarnessResult;
use crate::fixtures::TestUser;
use crate::report::Reporter;

/// Outcomes of a finished run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<CheckOutcome>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }

    /// Process exit code for this run.
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() { 0 } else { 1 }
    }

    /// Looks up an outcome by check name.
    pub fn outcome(&self, name: &str) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

/// Owns the check context and the plan for one run.
pub struct TestRunner {
    ctx: CheckContext,
    plan: Vec<CheckGroup>,
}

impl TestRunner {
    /// Builds a runner with the default plan and fixture user.
    pub fn new(config: HarnessConfig) -> HarnessResult<Self> {
        Self::with_user(config, TestUser::default())
    }

    pub fn with_user(config: HarnessConfig, user: TestUser) -> HarnessResult<Self> {
        let client = ApiClient::new(config)?;
        Ok(Self {
            ctx: CheckContext::new(client, user),
            plan: default_plan(),
        })
    }

    pub fn session(&self) -> &TestSession {
        &self.ctx.session
    }

    /// Runs every check and writes the report to `reporter`.
    pub fn run<W: Write>(&mut self, reporter: &mut Reporter<W>) -> io::Result<RunSummary> {
        info!(base_url = %self.ctx.client.config().base_url, "starting API checks");
        reporter.banner()?;

        let mut summary = RunSummary::default();
        for group in &self.plan {
            reporter.group(group.title)?;
            for check in &group.checks {
                let outcome = (check.run)(&mut self.ctx);
                reporter.outcome(&outcome)?;
                summary.outcomes.push(outcome);
            }
        }

        reporter.summary(summary.passed(), summary.total())?;
        info!(
            passed = summary.passed(),
            total = summary.total(),
            "API checks finished"
        );
        Ok(summary)
    }
}
