//! Profile checks: rename, password rotation, and restoring the fixture
//! password at cleanup so the next run can log in again.

use serde_json::json;

use super::{CheckContext, CheckOutcome};
use crate::error::{HarnessError, HarnessResult};
use crate::fixtures::{ROTATED_PASSWORD, UPDATED_NAME};
use crate::models::{expect_success, require, require_str};

pub const UPDATE_NAME: &str = "PATCH /api/profile (name)";
pub const UPDATE_PASSWORD: &str = "PATCH /api/profile (password)";
pub const RESTORE_PASSWORD: &str = "PATCH /api/profile (restore password)";

/// Renames the user and checks the returned name.
pub fn update_name(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(UPDATE_NAME, try_update_name(ctx))
}

fn try_update_name(ctx: &mut CheckContext) -> HarnessResult<String> {
    let token = ctx.session.require_token(UPDATE_NAME)?;
    let response =
        ctx.client
            .patch_json(UPDATE_NAME, "/profile", Some(token), &json!({ "name": UPDATED_NAME }))?;
    response.expect_status(UPDATE_NAME, 200)?;
    let body = response.json(UPDATE_NAME)?;
    expect_success(UPDATE_NAME, &body)?;
    require(UPDATE_NAME, &body, "/data/user")?;

    let name = require_str(UPDATE_NAME, &body, "/data/user/name")?;
    if name != UPDATED_NAME {
        return Err(HarnessError::mismatch(UPDATE_NAME, "data.user.name", UPDATED_NAME, name));
    }
    Ok(format!("Name updated to: {}", name))
}

fn change_password(
    ctx: &mut CheckContext,
    operation: &str,
    new_password: &str,
) -> HarnessResult<()> {
    let token = ctx.session.require_token(operation)?;
    let body = json!({
        "oldPassword": ctx.session.password(),
        "newPassword": new_password,
    });
    let response = ctx.client.patch_json(operation, "/profile", Some(token), &body)?;
    response.expect_status(operation, 200)?;
    expect_success(operation, &response.json(operation)?)?;
    ctx.session.set_password(new_password);
    Ok(())
}

/// Rotates the password from the session's current one to [`ROTATED_PASSWORD`].
pub fn update_password(ctx: &mut CheckContext) -> CheckOutcome {
    let result = change_password(ctx, UPDATE_PASSWORD, ROTATED_PASSWORD)
        .map(|()| "Password updated successfully".to_string());
    CheckOutcome::from_result(UPDATE_PASSWORD, result)
}

/// Changes the password back to the fixture value. Passes without a request
/// when the password was never rotated.
pub fn restore_password(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(RESTORE_PASSWORD, try_restore(ctx))
}

fn try_restore(ctx: &mut CheckContext) -> HarnessResult<String> {
    if ctx.session.password() == ctx.user.password {
        return Ok("Password unchanged, nothing to restore".to_string());
    }
    let original = ctx.user.password.clone();
    change_password(ctx, RESTORE_PASSWORD, &original)?;
    Ok("Password restored".to_string())
}
