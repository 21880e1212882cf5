//! # API Checks
//!
//! One function per endpoint check. Each check sends a single request with
//! the session's credentials, judges it by status code and expected JSON
//! keys, and returns a [`CheckOutcome`]. Errors never escape a check: they
//! are folded into a failed outcome so the run always continues.
//!
//! Checks that need data from an earlier step (the token, the uploaded
//! document id) fail immediately with a precondition error when it is
//! missing, without touching the network.

pub mod auth;
pub mod documents;
pub mod profile;
pub mod stats;
pub mod upload;

use tracing::warn;

use crate::client::ApiClient;
use crate::config::session::TestSession;
use crate::error::{HarnessError, HarnessResult};
use crate::fixtures::TestUser;

/// Everything a check may read or update.
pub struct CheckContext {
    pub client: ApiClient,
    pub session: TestSession,
    pub user: TestUser,
}

impl CheckContext {
    /// Creates a context with an unauthenticated session for `user`.
    pub fn new(client: ApiClient, user: TestUser) -> Self {
        let session = TestSession::new(user.password.clone());
        Self {
            client,
            session,
            user,
        }
    }
}

/// Result of one check as printed in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    pub detail: String,
    /// Error category of a failure, `None` for passes.
    pub category: Option<&'static str>,
}

impl CheckOutcome {
    pub fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: detail.into(),
            category: None,
        }
    }

    pub fn fail(name: impl Into<String>, error: &HarnessError) -> Self {
        let name = name.into();
        warn!(check = %name, category = error.category(), error = %error, "check failed");
        Self {
            name,
            passed: false,
            detail: error.detail(),
            category: Some(error.category()),
        }
    }

    /// Converts a check body's result into an outcome named `name`.
    pub fn from_result(name: impl Into<String>, result: HarnessResult<String>) -> Self {
        match result {
            Ok(detail) => Self::pass(name, detail),
            Err(error) => Self::fail(name, &error),
        }
    }
}

/// A named check in the fixed run order.
#[derive(Clone, Copy)]
pub struct Check {
    pub name: &'static str,
    pub run: fn(&mut CheckContext) -> CheckOutcome,
}

/// A titled group of checks, printed as a section header.
#[derive(Clone)]
pub struct CheckGroup {
    pub title: &'static str,
    pub checks: Vec<Check>,
}

/// The full run plan: authentication, upload, document CRUD, profile,
/// statistics, then cleanup.
pub fn default_plan() -> Vec<CheckGroup> {
    vec![
        CheckGroup {
            title: "🔐 Authentication Tests",
            checks: vec![
                Check { name: auth::SIGNUP, run: auth::signup },
                Check { name: auth::ME, run: auth::me },
                Check { name: auth::UNAUTHORIZED, run: auth::unauthorized_access },
            ],
        },
        CheckGroup {
            title: "📤 OCR Upload Tests",
            checks: vec![
                Check { name: upload::UPLOAD, run: upload::upload_image },
                Check { name: upload::UPLOAD_INVALID, run: upload::upload_invalid_file },
            ],
        },
        CheckGroup {
            title: "📄 Document CRUD Tests",
            checks: vec![
                Check { name: documents::LIST, run: documents::list_documents },
                Check { name: documents::LIST_FILTERED, run: documents::list_documents_filtered },
                Check { name: documents::GET, run: documents::get_document },
                Check { name: documents::UPDATE, run: documents::update_document },
            ],
        },
        CheckGroup {
            title: "👤 Profile Management Tests",
            checks: vec![
                Check { name: profile::UPDATE_NAME, run: profile::update_name },
                Check { name: profile::UPDATE_PASSWORD, run: profile::update_password },
            ],
        },
        CheckGroup {
            title: "📊 Statistics Tests",
            checks: vec![Check { name: stats::STATS, run: stats::get_stats }],
        },
        CheckGroup {
            title: "🧹 Cleanup Tests",
            checks: vec![
                Check { name: documents::DELETE, run: documents::delete_document },
                Check { name: documents::GET_AFTER_DELETE, run: documents::get_deleted_document },
                Check { name: profile::RESTORE_PASSWORD, run: profile::restore_password },
            ],
        },
    ]
}
