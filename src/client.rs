//! # API Client
//!
//! Thin blocking HTTP client for the OCR platform API. Every call is a single
//! request; there is no retry, backoff or connection reuse policy beyond what
//! `reqwest` does by default.
//!
//! Responses are returned as [`ApiResponse`] (status code plus raw body) so
//! the checks can judge the status first and decode the JSON only when the
//! status matches.

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, multipart::Form};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};

/// Status code and body of one API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Decodes the body as JSON.
    pub fn json(&self, operation: &str) -> HarnessResult<Value> {
        serde_json::from_str(&self.body).map_err(|e| {
            HarnessError::invalid_body(operation, format!("{} (body: {})", e, self.body))
        })
    }

    /// Fails with [`HarnessError::UnexpectedStatus`] unless the status is `expected`.
    pub fn expect_status(&self, operation: &str, expected: u16) -> HarnessResult<&Self> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(HarnessError::unexpected_status(
                operation,
                expected,
                self.status,
                self.body.clone(),
            ))
        }
    }
}

/// Blocking client bound to one service deployment.
pub struct ApiClient {
    http: Client,
    config: HarnessConfig,
}

impl ApiClient {
    /// Builds a client for `config`.
    ///
    /// The configuration is validated first; a request timeout is only set
    /// when the configuration carries one.
    pub fn new(config: HarnessConfig) -> HarnessResult<Self> {
        config
            .validate()
            .map_err(|reason| HarnessError::config("base_url", &config.base_url, reason))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| HarnessError::transport("build HTTP client", e))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// `GET {path}` with optional bearer token and query parameters.
    pub fn get(
        &self,
        operation: &str,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
    ) -> HarnessResult<ApiResponse> {
        let mut request = self.request(Method::GET, path, token);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(operation, request)
    }

    /// `POST {path}` with a JSON body.
    pub fn post_json(
        &self,
        operation: &str,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> HarnessResult<ApiResponse> {
        let request = self.request(Method::POST, path, token).json(body);
        self.send(operation, request)
    }

    /// `PATCH {path}` with a JSON body.
    pub fn patch_json(
        &self,
        operation: &str,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> HarnessResult<ApiResponse> {
        let request = self.request(Method::PATCH, path, token).json(body);
        self.send(operation, request)
    }

    /// `DELETE {path}`.
    pub fn delete(
        &self,
        operation: &str,
        path: &str,
        token: Option<&str>,
    ) -> HarnessResult<ApiResponse> {
        let request = self.request(Method::DELETE, path, token);
        self.send(operation, request)
    }

    /// `POST {path}` with a multipart form body.
    pub fn post_multipart(
        &self,
        operation: &str,
        path: &str,
        token: Option<&str>,
        form: Form,
    ) -> HarnessResult<ApiResponse> {
        let request = self.request(Method::POST, path, token).multipart(form);
        self.send(operation, request)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = self.config.api_url(path);
        let request = self.http.request(method, url);
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, operation: &str, request: RequestBuilder) -> HarnessResult<ApiResponse> {
        let response = request.send().map_err(|e| {
            warn!(operation, error = %e, "request failed");
            HarnessError::transport(operation, e)
        })?;

        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response
            .text()
            .map_err(|e| HarnessError::transport(operation, e))?;

        debug!(operation, %url, status, bytes = body.len(), "response received");
        Ok(ApiResponse { status, body })
    }
}
