use fng_pine::configs::{AppConfig, ConfigManager, DEFAULT_ENDPOINT, DEFAULT_LIMIT};
use fng_pine::core::error::FngError;
use fng_pine::loggers::LogLevel;
use std::path::PathBuf;

#[test]
fn test_defaults_match_fixed_run() {
    let mgr = ConfigManager::defaults();
    let cfg = mgr.get();

    assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(cfg.limit, DEFAULT_LIMIT);
    assert_eq!(cfg.json_path(), PathBuf::from("./fear_greed_data.json"));
    assert_eq!(cfg.pine_path(), PathBuf::from("./fear_greed_index.pine"));
    assert!(cfg.timeout().is_none());
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert_eq!(mgr.source_info(), "defaults");
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mgr = ConfigManager::load(dir.path().join("absent.json")).unwrap();

    assert_eq!(mgr.source_info(), "defaults");
    assert_eq!(mgr.get().limit, DEFAULT_LIMIT);
}

#[test]
fn test_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fng_pine.json");
    std::fs::write(&path, r#"{ "limit": 30, "output_dir": "out", "log_level": "debug", "timeout_secs": 5 }"#).unwrap();

    let mgr = ConfigManager::load(&path).unwrap();
    let cfg = mgr.get();

    assert_eq!(cfg.limit, 30);
    assert_eq!(cfg.output_dir, PathBuf::from("out"));
    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert_eq!(cfg.timeout(), Some(std::time::Duration::from_secs(5)));
    assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
    assert!(mgr.source_info().starts_with("local:"));
}

#[test]
fn test_zero_limit_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fng_pine.json");
    std::fs::write(&path, r#"{ "limit": 0 }"#).unwrap();

    assert!(matches!(ConfigManager::load(&path), Err(FngError::ConfigError(_))));
}

#[test]
fn test_invalid_json_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fng_pine.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(ConfigManager::load(&path), Err(FngError::ConfigError(_))));
}

#[test]
fn test_store_validates() {
    let mgr = ConfigManager::defaults();
    let bad = AppConfig { pine_file: " ".into(), ..AppConfig::default() };

    assert!(mgr.store(bad).is_err());
    assert_eq!(mgr.get().pine_file, "fear_greed_index.pine");

    let good = AppConfig { limit: 10, ..AppConfig::default() };
    mgr.store(good).unwrap();
    assert_eq!(mgr.get().limit, 10);
}
