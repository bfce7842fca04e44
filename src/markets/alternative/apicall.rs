//! # alternative.me API Adapter
//!
//! Wraps `KyHttp` with the status handling used for the public Fear & Greed
//! endpoint. The endpoint needs no authentication, so requests go out bare;
//! headers are only sent when added through [`AlternativeApi::set_header`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use crate::retrieve::ky_http::{KyHttp, KyOptions};
use crate::core::error::FngError;
use crate::loggers::Logger;
use crate::warn;

/// Adapter for the alternative.me API.
pub struct AlternativeApi {
    /// HTTP client performing a single attempt per call.
    http: KyHttp,
    /// Shared logger for structured diagnostic events.
    logger: Logger,
    /// Caller supplied request headers, empty by default.
    headers: HeaderMap,
}

impl AlternativeApi {
    /// Creates a new `AlternativeApi` with default options.
    pub fn new(logger: Logger) -> Self {
        Self::new_with_opts(logger, None)
    }

    /// Creates a new `AlternativeApi` whose client honors `options`.
    pub fn new_with_opts(logger: Logger, options: Option<KyOptions>) -> Self {
        Self {
            http: KyHttp::new_with_opts(logger.clone(), options),
            logger,
            headers: HeaderMap::new(),
        }
    }

    /// Updates or adds a specific header to the API caller.
    pub fn set_header(&mut self, key: &str, value: &str) {
        if let (Ok(name), Ok(val)) = (HeaderName::from_bytes(key.as_bytes()), HeaderValue::from_str(value)) {
            self.headers.insert(name, val);
        }
    }

    /// Returns a clone of the current header set.
    pub fn get_headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    /// Executes a GET request against `endpoint` asking for `limit` samples.
    ///
    /// # Errors
    /// Returns [`FngError::NonJsonResponse`] on a non-success HTTP status, and
    /// [`FngError::HttpError`] on transport or decode failures.
    pub async fn call(&self, endpoint: &str, limit: u32) -> Result<Value, FngError> {
        let query = [("limit", limit.to_string())];
        let api_resp = self.http.get::<Value>(endpoint, &query, self.get_headers()).await?;

        if !api_resp.success {
            let body_str = api_resp.error_body.as_deref().unwrap_or("[No Body]");
            let snippet: String = body_str.chars().take(250).collect();

            warn!(
                self.logger,
                "Fear & Greed API request failed",
                "url" => endpoint,
                "status" => api_resp.status,
                "snippet" => &snippet
            );

            return Err(FngError::NonJsonResponse {
                url: endpoint.to_string(),
                status: api_resp.status,
                body_snippet: snippet,
            });
        }

        Ok(api_resp.data.unwrap_or(Value::Null))
    }
}
