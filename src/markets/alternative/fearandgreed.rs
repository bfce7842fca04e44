//! # Fear & Greed Index Service
//!
//! Retrieves the daily Fear & Greed Index window from alternative.me and maps
//! the `data` array of the response into an [`IndexSeries`].
//!
//! The upstream encodes `timestamp` and `value` as strings; both string and
//! numeric forms are accepted. Fields this crate does not use are carried in
//! [`IndexSample::extra`].
//!
//! [`FetchedSeries::raw`] keeps the `data` array exactly as received (key order
//! and JSON types included); that is what gets persisted. Serializing an
//! [`IndexSeries`] instead writes `timestamp` and `value` as strings with the
//! known keys first, which decodes back to an equal series.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use crate::configs::{AppConfig, DEFAULT_ENDPOINT, DEFAULT_LIMIT};
use crate::core::error::FngError;
use crate::loggers::Logger;
use crate::markets::alternative::apicall::AlternativeApi;
use crate::retrieve::ky_http::KyOptions;
use crate::{debug, error, info};

/// One daily observation of the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSample {
    /// Seconds since the Unix epoch.
    #[serde(serialize_with = "serialize_as_text", deserialize_with = "deserialize_timestamp")]
    pub timestamp: i64,
    /// Index reading, nominally 0 to 100. Not range checked.
    #[serde(serialize_with = "serialize_value", deserialize_with = "deserialize_value")]
    pub value: f64,
    /// Sentiment label, e.g. "Extreme Fear" or "Greed".
    #[serde(rename = "value_classification")]
    pub classification: String,
    /// Upstream fields passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IndexSample {
    pub fn new(timestamp: i64, value: f64, classification: &str) -> Self {
        Self {
            timestamp,
            value,
            classification: classification.to_string(),
            extra: Map::new(),
        }
    }

    /// The reading as it appears in chart script text and console output.
    pub fn value_text(&self) -> String {
        format_value(self.value)
    }
}

/// Formats a reading without a trailing `.0` for integral values.
pub fn format_value(value: f64) -> String {
    // f64 Display already prints 65.0 as "65" and never uses exponent notation
    value.to_string()
}

/// Ordered samples as delivered by the API, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexSeries(Vec<IndexSample>);

impl IndexSeries {
    pub fn new(samples: Vec<IndexSample>) -> Self {
        Self(samples)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexSample> {
        self.0.iter()
    }

    /// Most recent sample, i.e. the first one in upstream order.
    pub fn latest(&self) -> Option<&IndexSample> {
        self.0.first()
    }
}

impl From<Vec<IndexSample>> for IndexSeries {
    fn from(samples: Vec<IndexSample>) -> Self {
        Self(samples)
    }
}

impl<'a> IntoIterator for &'a IndexSeries {
    type Item = &'a IndexSample;
    type IntoIter = std::slice::Iter<'a, IndexSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Int(i) => Ok(i),
        NumberOrText::Float(f) if f.fract() == 0.0 => Ok(f as i64),
        NumberOrText::Float(f) => Err(D::Error::custom(format!("fractional timestamp: {}", f))),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{}': {}", s, e))),
    }
}

fn deserialize_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Int(i) => Ok(i as f64),
        NumberOrText::Float(f) => Ok(f),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| D::Error::custom(format!("invalid value '{}': {}", s, e))),
    }
}

fn serialize_as_text<S: Serializer>(timestamp: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_string())
}

fn serialize_value<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_value(*value))
}

/// The upstream `data` array together with its decoded form.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedSeries {
    pub raw: Value,
    pub series: IndexSeries,
}

/// Pulls the `data` array out of a decoded response body.
///
/// # Errors
/// [`FngError::MalformedResponse`] if the field is missing or its entries do
/// not have the sample shape.
pub fn extract_series(json: &Value, endpoint: &str) -> Result<IndexSeries, FngError> {
    extract_fetched(json, endpoint).map(|fetched| fetched.series)
}

/// Like [`extract_series`] but keeps the untouched `data` array as well.
pub fn extract_fetched(json: &Value, endpoint: &str) -> Result<FetchedSeries, FngError> {
    let data = json.get("data").ok_or_else(|| FngError::MalformedResponse {
        endpoint: endpoint.to_string(),
        details: "Missing 'data' field".to_string(),
    })?;

    let series = IndexSeries::deserialize(data).map_err(|e| FngError::MalformedResponse {
        endpoint: endpoint.to_string(),
        details: format!("JSON error: {}", e),
    })?;

    Ok(FetchedSeries { raw: data.clone(), series })
}

/// Service orchestrator for Fear & Greed data retrieval.
pub struct FearAndGreed {
    /// Internal API client.
    api: AlternativeApi,
    /// Shared logger for diagnostic tracking.
    logger: Logger,
    endpoint: String,
    limit: u32,
}

impl FearAndGreed {
    /// Creates a service bound to the public endpoint and the 90-day window.
    pub fn new(logger: Logger) -> Self {
        Self::with_endpoint(logger, DEFAULT_ENDPOINT, DEFAULT_LIMIT, None)
    }

    /// Creates a service from run settings.
    pub fn from_config(config: &AppConfig, logger: Logger) -> Self {
        let options = KyOptions { timeout: config.timeout() };
        Self::with_endpoint(logger, &config.endpoint, config.limit, Some(options))
    }

    pub fn with_endpoint(logger: Logger, endpoint: &str, limit: u32, options: Option<KyOptions>) -> Self {
        Self {
            api: AlternativeApi::new_with_opts(logger.clone(), options),
            logger,
            endpoint: endpoint.to_string(),
            limit,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Fetches the decoded response body without interpretation.
    pub async fn fetch_raw(&self) -> Result<Value, FngError> {
        self.api.call(&self.endpoint, self.limit).await
    }

    /// Fetches and decodes the series, keeping the precise error kind.
    pub async fn fetch_series(&self) -> Result<IndexSeries, FngError> {
        self.fetch_data().await.map(|fetched| fetched.series)
    }

    async fn fetch_data(&self) -> Result<FetchedSeries, FngError> {
        let body = self.fetch_raw().await?;
        let fetched = extract_fetched(&body, &self.endpoint)?;
        debug!(self.logger, "Series decoded", "samples" => fetched.series.len());
        Ok(fetched)
    }

    /// Fetches the series; every failure becomes [`FngError::AcquisitionFailed`].
    pub async fn fetch(&self) -> Result<IndexSeries, FngError> {
        self.fetch_with_raw().await.map(|fetched| fetched.series)
    }

    /// Same as [`FearAndGreed::fetch`] but also returns the raw `data` array.
    pub async fn fetch_with_raw(&self) -> Result<FetchedSeries, FngError> {
        match self.fetch_data().await {
            Ok(fetched) => {
                info!(
                    self.logger,
                    "Fear & Greed series fetched",
                    "endpoint" => &self.endpoint,
                    "samples" => fetched.series.len()
                );
                Ok(fetched)
            }
            Err(e) => {
                let e = e.into_acquisition();
                error!(self.logger, "Error fetching data", "endpoint" => &self.endpoint, "error" => e.to_string());
                Err(e)
            }
        }
    }
}
