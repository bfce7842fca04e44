//! # Core Error Module
//!
//! This module defines the central `FngError` type used throughout the crate.
//! It leverages `thiserror` for error message formatting and `serde` for serialization.

use serde::Serialize;
use thiserror::Error;

/// Central error type for the `fng_pine` crate.
#[derive(Debug, Error, Serialize)]
pub enum FngError {
    /// Error related to configuration loading or merging.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error related to internal logic or state.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Standard HTTP request or network failure.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Error returned when the upstream API answers with a non-success status,
    /// typically an HTML error or maintenance page.
    #[error("API returned non-JSON content from {url}. Status: {status}")]
    NonJsonResponse {
        /// The target URL that was requested.
        url: String,
        /// The HTTP status code received.
        status: u16,
        /// A snippet of the response body for diagnostic purposes.
        body_snippet: String,
    },

    /// Error returned when the JSON structure is missing expected mandatory fields.
    #[error("Malformed API response structure at {endpoint}: {details}")]
    MalformedResponse {
        /// The endpoint URL that was called.
        endpoint: String,
        /// Description of why the structure was considered malformed.
        details: String,
    },

    /// The index series could not be acquired.
    ///
    /// Every fetch-side failure (transport, status, decode, missing field) is
    /// collapsed into this variant; the string carries the underlying cause.
    #[error("Data acquisition failed: {0}")]
    AcquisitionFailed(String),

    /// A sample could not be turned into chart script text.
    #[error("Render error: {0}")]
    RenderError(String),

    /// Failure while writing an output artifact.
    #[error("I/O error at {path}: {details}")]
    IoError {
        /// The file that was being written.
        path: String,
        /// The underlying OS error message.
        details: String,
    },
}

impl FngError {
    /// Collapses any fetch-side error into [`FngError::AcquisitionFailed`].
    ///
    /// An error that already is an acquisition failure is returned unchanged.
    pub fn into_acquisition(self) -> Self {
        match self {
            FngError::AcquisitionFailed(_) => self,
            other => FngError::AcquisitionFailed(other.to_string()),
        }
    }
}
