//! Usage statistics check.

use super::{CheckContext, CheckOutcome};
use crate::error::HarnessResult;
use crate::models::{expect_success, require};

pub const STATS: &str = "GET /api/stats";

pub fn get_stats(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(STATS, try_stats(ctx))
}

fn try_stats(ctx: &mut CheckContext) -> HarnessResult<String> {
    let token = ctx.session.require_token(STATS)?;
    let response = ctx.client.get(STATS, "/stats", Some(token), &[])?;
    response.expect_status(STATS, 200)?;
    let body = response.json(STATS)?;
    expect_success(STATS, &body)?;

    let total = require(STATS, &body, "/data/totalDocuments")?;
    let completed = body
        .pointer("/data/completedDocuments")
        .map(|v| v.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    Ok(format!("Total docs: {}, Completed: {}", total, completed))
}
