//! Authentication checks: signup (with login fallback), current user, and
//! rejection of unauthenticated requests.

use serde_json::Value;

use super::{CheckContext, CheckOutcome};
use crate::error::{HarnessError, HarnessResult};
use crate::models::{expect_success, require, require_id, require_str};

pub const SIGNUP: &str = "POST /api/auth/signup";
pub const LOGIN: &str = "POST /api/auth/login";
pub const ME: &str = "GET /api/auth/me";
pub const UNAUTHORIZED: &str = "Unauthorized access protection";

enum Signup {
    Created,
    AlreadyExists,
}

/// Signs the fixture user up. A 400 means the account exists already, in
/// which case the outcome is that of [`login`].
pub fn signup(ctx: &mut CheckContext) -> CheckOutcome {
    match try_signup(ctx) {
        Ok(Signup::Created) => CheckOutcome::pass(SIGNUP, "User created successfully"),
        Ok(Signup::AlreadyExists) => {
            tracing::info!(email = %ctx.user.email, "user already exists, logging in");
            login(ctx)
        }
        Err(e) => CheckOutcome::fail(SIGNUP, &e),
    }
}

fn try_signup(ctx: &mut CheckContext) -> HarnessResult<Signup> {
    let response = ctx
        .client
        .post_json(SIGNUP, "/auth/signup", None, &ctx.user.signup_body())?;
    if response.status == 400 {
        return Ok(Signup::AlreadyExists);
    }
    response.expect_status(SIGNUP, 200)?;
    let body = response.json(SIGNUP)?;
    store_credentials(ctx, SIGNUP, &body)?;
    Ok(Signup::Created)
}

/// Logs in with the session's current password.
pub fn login(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(LOGIN, try_login(ctx))
}

fn try_login(ctx: &mut CheckContext) -> HarnessResult<String> {
    let body = ctx.user.login_body(ctx.session.password());
    let response = ctx.client.post_json(LOGIN, "/auth/login", None, &body)?;
    response.expect_status(LOGIN, 200)?;
    let body = response.json(LOGIN)?;
    store_credentials(ctx, LOGIN, &body)?;
    Ok("Login successful".to_string())
}

fn store_credentials(ctx: &mut CheckContext, operation: &str, body: &Value) -> HarnessResult<()> {
    expect_success(operation, body)?;
    let token = require_str(operation, body, "/data/token")?.to_string();
    let user_id = require_id(operation, body, "/data/user/id")?;
    ctx.session.authenticate(token, user_id);
    Ok(())
}

/// Fetches the current user and checks it is the account we signed in as.
pub fn me(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(ME, try_me(ctx))
}

fn try_me(ctx: &mut CheckContext) -> HarnessResult<String> {
    let token = ctx.session.require_token(ME)?;
    let response = ctx.client.get(ME, "/auth/me", Some(token), &[])?;
    response.expect_status(ME, 200)?;
    let body = response.json(ME)?;
    expect_success(ME, &body)?;
    require(ME, &body, "/data/user")?;

    let email = require_str(ME, &body, "/data/user/email")?;
    if email != ctx.user.email {
        return Err(HarnessError::mismatch(ME, "data.user.email", &ctx.user.email, email));
    }
    tracing::debug!(
        user_id = ctx.session.user_id().unwrap_or("<unknown>"),
        email,
        "current user confirmed"
    );
    Ok(format!("User: {}", email))
}

/// `GET /api/auth/me` without credentials must be refused with 401.
pub fn unauthorized_access(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(UNAUTHORIZED, try_unauthorized(ctx))
}

fn try_unauthorized(ctx: &mut CheckContext) -> HarnessResult<String> {
    let response = ctx.client.get(UNAUTHORIZED, "/auth/me", None, &[])?;
    if response.status != 401 {
        return Err(HarnessError::unexpected_status(UNAUTHORIZED, 401, response.status, ""));
    }
    Ok("Correctly blocked unauthorized access".to_string())
}
