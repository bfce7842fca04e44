//! # Pine Script Renderer
//!
//! Turns an [`IndexSeries`] into a TradingView indicator by filling the three
//! placeholders of the bundled template:
//!
//! * `{data_init}`: one `array.push` pair per sample, in series order
//! * `{update_time}`: render time as `YYYY-MM-DD HH:MM`
//! * `{update_date}`: render date as `YYYY-MM-DD`
//!
//! Rendering is pure: the clock is passed in, and sample dates are computed in
//! the timezone of that clock.

use chrono::{DateTime, Datelike, Local, TimeZone};
use std::fmt::Display;
use crate::core::error::FngError;
use crate::markets::alternative::fearandgreed::{IndexSample, IndexSeries};

/// The indicator template. Everything outside the placeholders is emitted verbatim.
pub const TEMPLATE: &str = include_str!("fear_greed_index.pine");

pub const UPDATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const UPDATE_DATE_FORMAT: &str = "%Y-%m-%d";

const INDENT: &str = "    ";

/// Renders the full script for `series` stamped with `now`.
pub fn render<Tz>(series: &IndexSeries, now: &DateTime<Tz>) -> Result<String, FngError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let data_init = data_init_block(series, &now.timezone())?;
    let update_time = now.format(UPDATE_TIME_FORMAT).to_string();
    let update_date = now.format(UPDATE_DATE_FORMAT).to_string();

    Ok(fill(
        TEMPLATE,
        &[
            ("update_time", update_time.as_str()),
            ("update_date", update_date.as_str()),
            ("data_init", data_init.as_str()),
        ],
    ))
}

/// Renders against the local wall clock.
pub fn render_local(series: &IndexSeries) -> Result<String, FngError> {
    render(series, &Local::now())
}

/// Builds the initialization block: a date push then a value push per sample.
pub fn data_init_block<Tz: TimeZone>(series: &IndexSeries, tz: &Tz) -> Result<String, FngError> {
    let mut lines = Vec::with_capacity(series.len() * 2);
    for sample in series {
        lines.push(date_statement(sample, tz)?);
        lines.push(value_statement(sample));
    }
    Ok(lines.join("\n"))
}

/// `array.push(dates, timestamp(Y, M, D))` for the sample's calendar day in `tz`.
pub fn date_statement<Tz: TimeZone>(sample: &IndexSample, tz: &Tz) -> Result<String, FngError> {
    let utc = DateTime::from_timestamp(sample.timestamp, 0).ok_or_else(|| {
        FngError::RenderError(format!("timestamp {} is out of range", sample.timestamp))
    })?;
    let day = utc.with_timezone(tz);
    Ok(format!(
        "{}array.push(dates, timestamp({}, {}, {}))",
        INDENT,
        day.year(),
        day.month(),
        day.day()
    ))
}

/// `array.push(values, V)` with the reading in its console form.
pub fn value_statement(sample: &IndexSample) -> String {
    format!("{}array.push(values, {})", INDENT, sample.value_text())
}

/// Single-pass `{name}` substitution. Unknown names and stray braces are copied
/// through, and substituted text is never rescanned.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + vars.iter().map(|(_, v)| v.len()).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let replaced = tail.find('}').and_then(|close| {
            let name = &tail[1..close];
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v, close + 1))
        });

        match replaced {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
