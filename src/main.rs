//! `fng-pine`: fetch the 90-day Fear & Greed window and write
//! `fear_greed_data.json` plus the `fear_greed_index.pine` indicator.
//!
//! Takes no arguments. Settings may be overridden through `fng_pine.json` in
//! the working directory or `FNGPINE_*` environment variables.

use std::process::ExitCode;
use std::time::Duration;

use fng_pine::app;
use fng_pine::configs::ConfigManager;
use fng_pine::loggers::LoggerBuilder;
use fng_pine::{debug, fatal};

const CONFIG_FILE: &str = "fng_pine.json";

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ConfigManager::load(CONFIG_FILE) {
        Ok(mgr) => mgr,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let settings = config.get();

    let (logger, worker) = match LoggerBuilder::new("fng-pine")
        .with_level(settings.log_level)
        .build_with_handle()
    {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!(logger, "Configuration loaded", "source" => config.source_info());

    let mut stdout = std::io::stdout();
    let result = app::run(&settings, logger.clone(), &mut stdout).await;

    if let Err(e) = &result {
        fatal!(logger, "Run aborted", "error" => e.to_string());
        eprintln!("{}", e);
    }
    let code = ExitCode::from(app::exit_status(&result));

    // Worker exits once the last sender is gone
    drop(logger);
    let _ = tokio::time::timeout(Duration::from_secs(2), worker).await;
    code
}
