//! # Response Models
//!
//! The service wraps every payload in `{ "success": bool, "data": {...} }` or
//! `{ "success": false, "error": "..." }`. The helpers here check that
//! envelope and pull required fields out of `data` by JSON pointer, so a
//! missing key is reported by name.
//!
//! The typed records only cover fields the checks actually read. Everything
//! else in the service's documents is ignored.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{HarnessError, HarnessResult};

/// Processing state of a server-side document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    /// Any value the service reports that is not one of the known states.
    Other(String),
}

impl DocumentStatus {
    /// Wire representation, as used in the `status` query filter.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for DocumentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => Self::Pending,
            "PROCESSING" => Self::Processing,
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            _ => Self::Other(s),
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields of a document the checks inspect.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    #[serde(default)]
    pub status: Option<DocumentStatus>,
    #[serde(default)]
    pub ocr_text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Pagination block of the document list.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub total: u64,
}

/// Checks `success == true` in an envelope.
///
/// When the service reports `success: false` its `error` string is surfaced
/// as the mismatch value.
pub fn expect_success(operation: &str, body: &Value) -> HarnessResult<()> {
    match body.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(()),
        Some(false) => {
            let error = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("<no error message>");
            Err(HarnessError::mismatch(operation, "success", "true", format!("false ({})", error)))
        }
        None => Err(HarnessError::missing_field(operation, "success", body.to_string())),
    }
}

/// Looks up `pointer` (e.g. `/data/user/id`) and fails with a missing-field
/// error naming it.
pub fn require<'v>(operation: &str, body: &'v Value, pointer: &str) -> HarnessResult<&'v Value> {
    match body.pointer(pointer) {
        Some(Value::Null) | None => Err(HarnessError::missing_field(
            operation,
            field_name(pointer),
            body.to_string(),
        )),
        Some(value) => Ok(value),
    }
}

/// Like [`require`] but the value must be a string.
pub fn require_str<'v>(operation: &str, body: &'v Value, pointer: &str) -> HarnessResult<&'v str> {
    let value = require(operation, body, pointer)?;
    value.as_str().ok_or_else(|| {
        HarnessError::mismatch(operation, field_name(pointer), "a string", value.to_string())
    })
}

/// Reads an identifier that the service may send as a string or a number.
pub fn require_id(operation: &str, body: &Value, pointer: &str) -> HarnessResult<String> {
    let value = require(operation, body, pointer)?;
    id_to_string(value).ok_or_else(|| {
        HarnessError::mismatch(operation, field_name(pointer), "a string or number", value.to_string())
    })
}

/// Deserializes the value at `pointer` into `T`.
pub fn require_as<T>(operation: &str, body: &Value, pointer: &str) -> HarnessResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    let value = require(operation, body, pointer)?;
    serde_json::from_value(value.clone()).map_err(|e| {
        HarnessError::invalid_body(operation, format!("'{}': {}", field_name(pointer), e))
    })
}

pub fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// "/data/user/id" -> "data.user.id"
fn field_name(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}
