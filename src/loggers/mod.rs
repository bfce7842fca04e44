//! # Structured Logging
//!
//! Records are built by the macros below and shipped over a bounded channel to
//! a background [`worker::LogWorker`], which prints one JSON line per record on
//! stderr. Stdout is left to the run's progress lines (`Fetching ...`,
//! `Successfully fetched ...`), so the two streams can be redirected apart.
//!
//! ```ignore
//! info!(logger, "Artifacts written", "samples" => 90usize, "pine" => "fear_greed_index.pine");
//! ```

pub mod builder;
pub mod core;
pub mod worker;

pub use builder::{Logger, LoggerBuilder};
pub use core::LogLevel;

/// Crates the macros expand to, so callers need not depend on them directly.
#[doc(hidden)]
pub mod __private {
    pub use chrono;
    pub use serde_json;
}

#[macro_export]
macro_rules! log_base {
    ($logger:expr, $level:expr, $msg:expr) => {
        $crate::log_base!($logger, $level, $msg, );
    };
    // Context values that fail to serialize are recorded as null
    ($logger:expr, $level:expr, $msg:expr, $( $k:expr => $v:expr ),* $(,)? ) => {
        {
            let cfg = $logger.config.load();
            if $level >= cfg.level {
                let ctx = std::collections::HashMap::<String, $crate::loggers::__private::serde_json::Value>::from([
                    $(
                        (
                            $k.to_string(),
                            $crate::loggers::__private::serde_json::to_value($v)
                                .unwrap_or($crate::loggers::__private::serde_json::Value::Null),
                        ),
                    )*
                ]);

                let record = $crate::loggers::core::LogRecord {
                    ts: $crate::loggers::__private::chrono::Utc::now(),
                    level: $level,
                    msg: $msg.to_string(),
                    component: cfg.component.clone(),
                    ctx,
                    sys: None,
                };

                // full channel or stopped worker: drop the record
                let _ = $logger.sender.try_send(record);
            }
        }
    };
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $msg:expr $(, $k:expr => $v:expr )* $(,)? ) => {
        $crate::log_base!($logger, $crate::loggers::core::LogLevel::Trace, $msg $(, $k => $v )* )
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $msg:expr $(, $k:expr => $v:expr )* $(,)? ) => {
        $crate::log_base!($logger, $crate::loggers::core::LogLevel::Debug, $msg $(, $k => $v )* )
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $msg:expr $(, $k:expr => $v:expr )* $(,)? ) => {
        $crate::log_base!($logger, $crate::loggers::core::LogLevel::Info, $msg $(, $k => $v )* )
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $msg:expr $(, $k:expr => $v:expr )* $(,)? ) => {
        $crate::log_base!($logger, $crate::loggers::core::LogLevel::Warn, $msg $(, $k => $v )* )
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $msg:expr $(, $k:expr => $v:expr )* $(,)? ) => {
        $crate::log_base!($logger, $crate::loggers::core::LogLevel::Error, $msg $(, $k => $v )* )
    };
}

#[macro_export]
macro_rules! fatal {
    ($logger:expr, $msg:expr $(, $k:expr => $v:expr )* $(,)? ) => {
        $crate::log_base!($logger, $crate::loggers::core::LogLevel::Fatal, $msg $(, $k => $v )* )
    };
}
