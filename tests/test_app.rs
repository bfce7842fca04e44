//! # Orchestration Test Suite
//!
//! Runs the whole batch against a mock API and a temporary output directory.

use chrono::{TimeZone, Utc};
use fng_pine::app::{self, RunOutcome};
use fng_pine::configs::AppConfig;
use fng_pine::loggers::builder::LoggerBuilder;
use fng_pine::markets::alternative::{IndexSample, IndexSeries};
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer, dir: &std::path::Path) -> AppConfig {
    AppConfig {
        endpoint: format!("{}/fng/", server.uri()),
        output_dir: dir.to_path_buf(),
        ..AppConfig::default()
    }
}

fn fixed_clock() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 11, 15, 8, 5, 0).unwrap()
}

#[tokio::test]
async fn test_successful_run_writes_both_files() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());
    let logger = LoggerBuilder::new("app_test").build().unwrap();

    Mock::given(method("GET"))
        .and(query_param("limit", "90"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Fear and Greed Index",
            "data": [
                { "value": "65", "value_classification": "Greed", "timestamp": "1700000000", "time_until_update": "100" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut console = Vec::new();
    let outcome = app::run_at(&config, logger, &mut console, fixed_clock).await.unwrap();

    let console = String::from_utf8(console).unwrap();
    assert_eq!(
        console,
        "Fetching Fear and Greed Index data...\n\
         Successfully fetched 1 data points\n\
         Files generated successfully!\n\
         Latest Fear & Greed Index: 65 (Greed)\n"
    );

    let json_path = dir.path().join("fear_greed_data.json");
    let pine_path = dir.path().join("fear_greed_index.pine");
    assert_eq!(
        outcome,
        RunOutcome::Written { samples: 1, json_path: json_path.clone(), pine_path: pine_path.clone() }
    );

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(
        raw,
        json!([{ "value": "65", "value_classification": "Greed", "timestamp": "1700000000", "time_until_update": "100" }])
    );

    let script = std::fs::read_to_string(&pine_path).unwrap();
    assert!(script.contains("    array.push(dates, timestamp(2023, 11, 14))"));
    assert!(script.contains("    array.push(values, 65)"));
    assert!(script.contains("2023-11-15 08:05"));
}

#[tokio::test]
async fn test_persisted_json_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("series.json");
    let mut sample = IndexSample::new(1_700_000_000, 47.5, "Neutral");
    sample.extra.insert("time_until_update".into(), json!("3600"));
    let series: IndexSeries = vec![sample, IndexSample::new(1_699_913_600, 12.0, "Extreme Fear")].into();

    app::persist_json(&path, &series).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("[\n  {\n    \""));
    assert_eq!(app::load_json(&path).unwrap(), series);
}

#[tokio::test]
async fn test_failed_fetch_writes_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());
    let logger = LoggerBuilder::new("app_test").build().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut console = Vec::new();
    let outcome = app::run_at(&config, logger, &mut console, fixed_clock).await.unwrap();

    assert!(matches!(outcome, RunOutcome::AcquisitionFailed(_)));
    assert_eq!(app::exit_status(&Ok(outcome)), 0);
    let console = String::from_utf8(console).unwrap();
    assert!(console.contains("Error fetching data: "));
    assert_eq!(console.lines().last(), Some("Failed to fetch data"));
    assert!(!dir.path().join("fear_greed_data.json").exists());
    assert!(!dir.path().join("fear_greed_index.pine").exists());
}

#[tokio::test]
async fn test_empty_series_counts_as_failure() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());
    let logger = LoggerBuilder::new("app_test").build().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let mut console = Vec::new();
    let outcome = app::run_at(&config, logger, &mut console, fixed_clock).await.unwrap();

    assert!(!outcome.is_written());
    assert_eq!(
        String::from_utf8(console).unwrap(),
        "Fetching Fear and Greed Index data...\nFailed to fetch data\n"
    );
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_existing_files_are_overwritten() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());
    let logger = LoggerBuilder::new("app_test").build().unwrap();
    std::fs::write(config.pine_path(), "stale").unwrap();
    std::fs::write(config.json_path(), "stale").unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "value": 30, "value_classification": "Fear", "timestamp": 1700000000 }]
        })))
        .mount(&server)
        .await;

    let mut console = Vec::new();
    app::run_at(&config, logger, &mut console, fixed_clock).await.unwrap();

    assert!(std::fs::read_to_string(config.pine_path()).unwrap().starts_with("//@version=5"));
    assert_eq!(app::load_json(&config.json_path()).unwrap().len(), 1);
}

#[tokio::test]
async fn test_write_failure_propagates() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the output directory should be
    let blocker = dir.path().join("blocked");
    std::fs::write(&blocker, "x").unwrap();
    let config = test_config(&server, &blocker);
    let logger = LoggerBuilder::new("app_test").build().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "value": "65", "value_classification": "Greed", "timestamp": "1700000000" }]
        })))
        .mount(&server)
        .await;

    let mut console = Vec::new();
    let res = app::run_at(&config, logger, &mut console, fixed_clock).await;
    assert!(matches!(res, Err(fng_pine::FngError::IoError { .. })));
    assert_eq!(app::exit_status(&res), 1);
}

#[tokio::test]
async fn test_network_failure_writes_nothing_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    // Reserve a free port, then release it so nothing is listening
    let endpoint = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}/fng/", listener.local_addr().unwrap())
    };
    let config = AppConfig {
        endpoint,
        output_dir: dir.path().to_path_buf(),
        ..AppConfig::default()
    };
    let logger = LoggerBuilder::new("app_test").build().unwrap();

    let mut console = Vec::new();
    let result = app::run_at(&config, logger, &mut console, fixed_clock).await;

    assert!(matches!(result, Ok(RunOutcome::AcquisitionFailed(_))));
    assert_eq!(app::exit_status(&result), 0);
    let console = String::from_utf8(console).unwrap();
    let lines: Vec<&str> = console.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Fetching Fear and Greed Index data...");
    assert!(lines[1].starts_with("Error fetching data: "));
    assert_eq!(lines[2], "Failed to fetch data");
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_json_file_is_the_upstream_data_array() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());
    let logger = LoggerBuilder::new("app_test").build().unwrap();
    let data = json!([
        { "value": 65, "value_classification": "Greed", "timestamp": 1700000000, "time_until_update": "100" },
        { "value": "58", "value_classification": "Greed", "timestamp": "1699913600" }
    ]);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Fear and Greed Index", "data": data.clone() })))
        .mount(&server)
        .await;

    let mut console = Vec::new();
    app::run_at(&config, logger, &mut console, fixed_clock).await.unwrap();

    let text = std::fs::read_to_string(config.json_path()).unwrap();
    assert_eq!(text, serde_json::to_string_pretty(&data).unwrap());
    assert!(text.contains("\"value\": 65,"));
    assert!(text.find("\"value\"").unwrap() < text.find("\"timestamp\"").unwrap());

    let reloaded = app::load_json(&config.json_path()).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.latest().unwrap().value, 65.0);
}
