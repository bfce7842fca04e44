use tokio::sync::mpsc;
use sysinfo::System;
use crate::loggers::core::{LogRecord, SysInfo, LogLevel};

pub struct LogWorker {
    receiver: mpsc::Receiver<LogRecord>,
    sys: System,
}

impl LogWorker {
    pub fn new(receiver: mpsc::Receiver<LogRecord>) -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        Self { receiver, sys }
    }

    pub async fn run(mut self) {
        while let Some(mut record) = self.receiver.recv().await {
            // Host snapshot only for records that signal trouble
            if record.level >= LogLevel::Warn {
                record.sys = Some(self.snapshot());
            }

            // stdout carries the run's progress lines
            if let Ok(json) = serde_json::to_string(&record) {
                eprintln!("{}", json);
            }
        }
    }

    fn snapshot(&mut self) -> SysInfo {
        self.sys.refresh_cpu();
        self.sys.refresh_memory();
        let load = System::load_average();

        SysInfo {
            cpu_usage: self.sys.global_cpu_info().cpu_usage(),
            mem_used_kb: self.sys.used_memory() / 1024,
            load_avg: vec![load.one, load.five, load.fifteen],
            uptime_secs: System::uptime(),
        }
    }
}
