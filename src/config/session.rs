//! # Test Session
//!
//! Transient state carried between checks during one run: the bearer token,
//! the authenticated user id, the document created by the upload check and
//! the password currently valid for the test user.
//!
//! The session is created empty, filled by signup/login and upload, and
//! dropped at process exit. Nothing is persisted.

use crate::error::{HarnessError, HarnessResult};

/// Per-run state shared by the checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSession {
    token: Option<String>,
    user_id: Option<String>,
    document_id: Option<String>,
    password: String,
}

impl TestSession {
    /// Creates an unauthenticated session whose current password is `password`.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            ..Self::default()
        }
    }

    /// Records the credentials returned by signup or login.
    pub fn authenticate(&mut self, token: impl Into<String>, user_id: impl Into<String>) {
        self.token = Some(token.into());
        self.user_id = Some(user_id.into());
    }

    /// The bearer token, if signup or login succeeded.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the token or the "No token available" precondition failure for
    /// `operation`.
    pub fn require_token(&self, operation: &str) -> HarnessResult<&str> {
        self.token()
            .ok_or_else(|| HarnessError::precondition(operation, "No token available"))
    }

    pub fn set_document_id(&mut self, id: impl Into<String>) {
        self.document_id = Some(id.into());
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    /// Returns the uploaded document id or the precondition failure for `operation`.
    pub fn require_document_id(&self, operation: &str) -> HarnessResult<&str> {
        self.document_id()
            .ok_or_else(|| HarnessError::precondition(operation, "No test document ID available"))
    }

    /// Forgets the document after it has been deleted.
    pub fn clear_document_id(&mut self) -> Option<String> {
        self.document_id.take()
    }

    /// The password the service currently accepts for the test user.
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }
}
