//! # Batch Orchestration
//!
//! fetch, persist the raw series as JSON, render the indicator, persist it.
//! Progress lines go to the supplied writer; structured records go to the logger.

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use std::fmt::Display;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::configs::AppConfig;
use crate::core::error::FngError;
use crate::loggers::Logger;
use crate::markets::alternative::{FearAndGreed, FetchedSeries, IndexSeries};
use crate::pine::renderer;
use crate::{info, warn};

/// How a run ended when no unrecoverable error occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Both artifacts were written.
    Written {
        samples: usize,
        json_path: PathBuf,
        pine_path: PathBuf,
    },
    /// The series could not be obtained; nothing was written.
    AcquisitionFailed(String),
}

impl RunOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, RunOutcome::Written { .. })
    }
}

/// Process status for a finished run.
///
/// A handled acquisition failure still counts as a completed run (0); only an
/// error that aborted the run is non-zero.
pub fn exit_status(result: &Result<RunOutcome, FngError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Runs once against the local wall clock.
pub async fn run<W: Write>(config: &AppConfig, logger: Logger, out: &mut W) -> Result<RunOutcome, FngError> {
    run_at(config, logger, out, Local::now).await
}

/// Runs once; `clock` is read when the script is rendered.
pub async fn run_at<W, Tz, C>(
    config: &AppConfig,
    logger: Logger,
    out: &mut W,
    clock: C,
) -> Result<RunOutcome, FngError>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
    C: FnOnce() -> DateTime<Tz>,
{
    let service = FearAndGreed::from_config(config, logger.clone());
    say(out, "Fetching Fear and Greed Index data...")?;

    let FetchedSeries { raw, series } = match service.fetch_with_raw().await {
        Ok(fetched) if !fetched.series.is_empty() => fetched,
        Ok(_) => {
            warn!(logger, "Empty series", "endpoint" => &config.endpoint);
            say(out, "Failed to fetch data")?;
            return Ok(RunOutcome::AcquisitionFailed("response contained no samples".to_string()));
        }
        Err(FngError::AcquisitionFailed(cause)) => return report_failure(out, cause),
        Err(other) => return report_failure(out, other.to_string()),
    };

    say(out, &format!("Successfully fetched {} data points", series.len()))?;

    let json_path = config.json_path();
    let pine_path = config.pine_path();

    persist_json(&json_path, &raw)?;
    let script = renderer::render(&series, &clock())?;
    persist_script(&pine_path, &script)?;

    info!(
        logger,
        "Artifacts written",
        "samples" => series.len(),
        "json" => json_path.display().to_string(),
        "pine" => pine_path.display().to_string()
    );

    say(out, "Files generated successfully!")?;
    if let Some(latest) = series.latest() {
        say(
            out,
            &format!(
                "Latest Fear & Greed Index: {} ({})",
                latest.value_text(),
                latest.classification
            ),
        )?;
    }

    Ok(RunOutcome::Written {
        samples: series.len(),
        json_path,
        pine_path,
    })
}

fn report_failure<W: Write>(out: &mut W, cause: String) -> Result<RunOutcome, FngError> {
    say(out, &format!("Error fetching data: {}", cause))?;
    say(out, "Failed to fetch data")?;
    Ok(RunOutcome::AcquisitionFailed(cause))
}

fn say<W: Write>(out: &mut W, line: &str) -> Result<(), FngError> {
    writeln!(out, "{}", line).map_err(|e| FngError::InternalError(format!("console write failed: {}", e)))
}

/// Writes a JSON value (the raw `data` array) with 2-space indentation,
/// replacing any previous file.
pub fn persist_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), FngError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| FngError::InternalError(format!("JSON encode: {}", e)))?;
    write_file(path, text.as_bytes())
}

/// Writes the rendered script as UTF-8, replacing any previous file.
pub fn persist_script(path: &Path, script: &str) -> Result<(), FngError> {
    write_file(path, script.as_bytes())
}

/// Reads a series back from a file written by [`persist_json`].
pub fn load_json(path: &Path) -> Result<IndexSeries, FngError> {
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_json::from_str(&text).map_err(|e| FngError::InternalError(format!("JSON decode: {}", e)))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), FngError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, e: std::io::Error) -> FngError {
    FngError::IoError {
        path: path.display().to_string(),
        details: e.to_string(),
    }
}
