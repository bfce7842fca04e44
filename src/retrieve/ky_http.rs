//! src/retrieve/ky_http.rs
//!
//! KyHttp: thin HTTP helper with single-body read, JSON decoding and structured
//! request telemetry. Each call is exactly one attempt; there is no retry layer.
use crate::core::error::FngError;
use crate::loggers::Logger;
use reqwest::{header::HeaderMap, Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// KyOptions
///
/// Public options for KyHttp.
#[derive(Clone, Debug, Default)]
pub struct KyOptions {
    /// Optional timeout for the underlying reqwest client. `None` blocks until
    /// the server answers or the connection fails.
    pub timeout: Option<Duration>,
}

/// ApiResponse<T>
///
/// Standard response wrapper returned by KyHttp methods.
#[derive(Debug)]
pub struct ApiResponse<T> {
    /// Parsed JSON body when success.
    pub data: Option<T>,

    /// Raw error body text when non-success.
    pub error_body: Option<String>,

    /// HTTP status code.
    pub status: u16,

    /// Whether the response was successful (2xx).
    pub success: bool,

    /// Response headers.
    pub headers: HeaderMap,
}

/// KyHttp
///
/// Primary HTTP helper.
#[derive(Clone)]
pub struct KyHttp {
    client: Client,
    logger: Logger,
}

impl KyHttp {
    pub fn new(logger: Logger) -> Self {
        Self::new_with_opts(logger, None)
    }

    pub fn new_with_opts(logger: Logger, opts: Option<KyOptions>) -> Self {
        let opts = opts.unwrap_or_default();
        let mut builder = Client::builder();
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|_| Client::new());

        Self { client, logger }
    }

    /// Builds the full request URL from a base and query pairs.
    pub fn build_url(url: &str, query: &[(&str, String)]) -> Result<Url, FngError> {
        if query.is_empty() {
            Url::parse(url)
        } else {
            Url::parse_with_params(url, query)
        }
        .map_err(|e| FngError::InternalError(format!("Invalid URL '{}': {}", url, e)))
    }

    async fn request<T>(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
    ) -> Result<ApiResponse<T>, FngError>
    where
        T: DeserializeOwned,
    {
        crate::info!(
            self.logger,
            "Request start",
            "method" => method.as_str(),
            "url" => url.as_str()
        );

        let resp = self
            .client
            .request(method, url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                crate::error!(self.logger, "Network failure", "url" => url.as_str(), "error" => e.to_string());
                FngError::HttpError(e.to_string())
            })?;

        let status: StatusCode = resp.status();
        let resp_headers = resp.headers().clone();
        // Read body once and reuse
        let body_text = resp.text().await.map_err(|e| {
            crate::error!(self.logger, "Body read failure", "url" => url.as_str(), "error" => e.to_string());
            FngError::HttpError(e.to_string())
        })?;

        if !status.is_success() {
            crate::warn!(
                self.logger,
                "Non-success status",
                "url" => url.as_str(),
                "status" => status.as_u16()
            );
            return Ok(ApiResponse {
                data: None,
                error_body: if body_text.is_empty() { None } else { Some(body_text) },
                status: status.as_u16(),
                success: false,
                headers: resp_headers,
            });
        }

        let parsed = serde_json::from_str::<T>(&body_text)
            .map_err(|e| FngError::HttpError(format!("JSON decode: {}", e)))?;

        crate::debug!(
            self.logger,
            "Request complete",
            "url" => url.as_str(),
            "status" => status.as_u16(),
            "bytes" => body_text.len()
        );

        Ok(ApiResponse {
            data: Some(parsed),
            error_body: None,
            status: status.as_u16(),
            success: true,
            headers: resp_headers,
        })
    }

    /// Public GET convenience
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: HeaderMap,
    ) -> Result<ApiResponse<T>, FngError> {
        let url = Self::build_url(url, query)?;
        self.request(Method::GET, url, headers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_appends_query_pairs() {
        let url = KyHttp::build_url("https://api.alternative.me/fng/", &[("limit", "90".to_string())]).unwrap();
        assert_eq!(url.as_str(), "https://api.alternative.me/fng/?limit=90");
    }

    #[test]
    fn build_url_rejects_garbage() {
        assert!(matches!(
            KyHttp::build_url("not a url", &[]),
            Err(FngError::InternalError(_))
        ));
    }
}
