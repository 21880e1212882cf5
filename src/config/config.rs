//! # Harness Configuration
//!
//! Configuration for one smoke-check run against an OCR platform deployment.
//! It is the common interface between the CLI and the check runner.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Default | Description |
//! |-----------|------|---------|-------------|
//! | `base_url` | `String` | `http://localhost:3000` | Service origin, no trailing slash |
//! | `api_prefix` | `String` | `/api` | Path prefix of every endpoint |
//! | `language` | `String` | `eng` | OCR language code sent with uploads |
//! | `processing_wait` | `Duration` | 3s | Pause after upload before reading the document |
//! | `request_timeout` | `Option<Duration>` | none | Per-request timeout; `None` keeps the client default |
//!
//! ## Duration Formats
//!
//! The CLI accepts the same duration syntax for every time value:
//! - Raw seconds: `3` or `3s`
//! - Milliseconds: `500ms`
//! - Minutes: `1m`
//! - Hours: `1h`
//!
//! ## Examples
//!
//! ```rust
//! use ocr_smoke::config::config::HarnessConfig;
//!
//! let config = HarnessConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.api_url("/auth/me"), "http://localhost:3000/api/auth/me");
//! ```

use std::time::Duration;

use anyhow::{Result, anyhow};

/// Default service origin used when no `--base-url` is given.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration for a smoke-check run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Origin of the service under test, e.g. `http://localhost:3000`.
    ///
    /// A trailing slash is tolerated and stripped when building URLs.
    pub base_url: String,

    /// Path prefix shared by all endpoints.
    pub api_prefix: String,

    /// Language code attached to the OCR upload.
    pub language: String,

    /// How long to wait after a successful upload so the service can finish
    /// processing before the document is read back.
    pub processing_wait: Duration,

    /// Optional per-request timeout.
    pub request_timeout: Option<Duration>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: "/api".to_string(),
            language: "eng".to_string(),
            processing_wait: Duration::from_secs(3),
            request_timeout: None,
        }
    }
}

impl HarnessConfig {
    /// Creates a configuration for `base_url` with default values elsewhere.
    pub fn new(base_url: impl Into<String>, processing_wait: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            processing_wait,
            ..Self::default()
        }
    }

    /// Sets a per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err("Base URL must not be empty".to_string());
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(format!(
                "Base URL must start with http:// or https:// (got {})",
                base
            ));
        }
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err("API prefix must start with '/'".to_string());
        }
        if self.language.trim().is_empty() {
            return Err("Language code must not be empty".to_string());
        }
        if self.request_timeout == Some(Duration::ZERO) {
            return Err("Request timeout must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Builds the absolute URL of an endpoint path such as `/auth/me`.
    pub fn api_url(&self, path: &str) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let prefix = self.api_prefix.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}{}", base, prefix, path)
        } else {
            format!("{}{}/{}", base, prefix, path)
        }
    }
}

/// Parse a duration string like "500ms", "3s", "2m", "1h".
///
/// A bare number is read as seconds.
pub fn parse_duration(duration: &str) -> Result<Duration> {
    let duration = duration.trim();
    if let Ok(seconds) = duration.parse::<u64>() {
        return Ok(Duration::from_secs(seconds));
    }

    if let Some(num_str) = duration.strip_suffix("ms") {
        let millis: u64 = num_str
            .parse()
            .map_err(|_| anyhow!("Invalid number in duration: {}", num_str))?;
        return Ok(Duration::from_millis(millis));
    }

    let unit_start = duration.len() - duration.chars().last().map_or(0, char::len_utf8);
    if unit_start == 0 {
        return Err(anyhow!("Invalid duration format: {}", duration));
    }

    let (num_str, unit) = duration.split_at(unit_start);
    let num: u64 = num_str
        .parse()
        .map_err(|_| anyhow!("Invalid number in duration: {}", num_str))?;

    let scale = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        _ => {
            return Err(anyhow!(
                "Invalid duration unit: {}. Use 'ms', 's', 'm' or 'h'",
                unit
            ));
        }
    };
    num.checked_mul(scale)
        .map(Duration::from_secs)
        .ok_or_else(|| anyhow!("Duration too large: {}", duration))
}
