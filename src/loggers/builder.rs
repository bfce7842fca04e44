use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use crate::loggers::worker::LogWorker;
use crate::loggers::core::{LogLevel, LogRecord};
use std::sync::Arc;
use arc_swap::ArcSwap;

pub struct LoggerConfig {
    pub level: LogLevel,
    pub component: String,
}

#[derive(Clone)]
pub struct Logger {
    pub sender: mpsc::Sender<LogRecord>,
    pub config: Arc<ArcSwap<LoggerConfig>>,
}

impl Logger {
    /// Swaps the minimum level at runtime; clones share the change.
    pub fn set_level(&self, level: LogLevel) {
        let current = self.config.load();
        self.config.store(Arc::new(LoggerConfig {
            level,
            component: current.component.clone(),
        }));
    }
}

pub struct LoggerBuilder {
    component: String,
    level: LogLevel,
    buffer_size: usize,
}

impl LoggerBuilder {
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            level: LogLevel::Info,
            buffer_size: 1024,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn build(self) -> Result<Logger, crate::core::error::FngError> {
        self.build_with_handle().map(|(logger, _)| logger)
    }

    /// Builds the logger and returns the worker handle as well.
    ///
    /// The worker stops once every `Logger` clone has been dropped, so awaiting
    /// the handle after that point flushes all pending records.
    pub fn build_with_handle(self) -> Result<(Logger, JoinHandle<()>), crate::core::error::FngError> {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let config = Arc::new(ArcSwap::from_pointee(LoggerConfig {
            level: self.level,
            component: self.component,
        }));

        let worker = LogWorker::new(rx);
        let handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok((Logger { sender: tx, config }, handle))
    }
}
