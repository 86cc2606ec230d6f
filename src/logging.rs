//! Run logging.
//!
//! Console lines are for startup/shutdown and warnings; the per-tick
//! record goes to an optional run-log file as one structured STATUS
//! line, tagged with a correlation id, between START and STOP markers.

use crate::error::{AppError, Result};
use crate::models::Snapshot;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// ANSI color code for console output
    fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m", // Cyan
            LogLevel::Info => "\x1b[32m",  // Green
            LogLevel::Warn => "\x1b[33m",  // Yellow
            LogLevel::Error => "\x1b[31m", // Red
        }
    }
}

/// Logger with colored console output and an optional run-log file
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    file: Option<Mutex<File>>,
}

impl Logger {
    /// Create a console-only logger
    pub fn new(min_level: LogLevel, use_color: bool) -> Self {
        Self {
            min_level,
            use_color,
            file: None,
        }
    }

    /// Attach a run-log file, created or appended to
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .map_err(|e| {
                AppError::io(format!(
                    "Failed to open log file {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?;
        self.file = Some(Mutex::new(file));
        Ok(self)
    }

    /// Log a message at the given level
    pub fn log(&self, level: LogLevel, message: &str) {
        self.write_file_line(level.as_str(), message);

        if level >= self.min_level {
            if self.use_color {
                eprintln!(
                    "{}{}\x1b[0m {}",
                    level.color_code(),
                    level.as_str(),
                    message
                );
            } else {
                eprintln!("{} {}", level.as_str(), message);
            }
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Write the run-start marker
    pub fn start_marker(&self) {
        self.write_file_line(
            "INFO",
            &format!("=== NETPULSE START {} ===", Local::now().to_rfc3339()),
        );
    }

    /// Write the run-stop marker
    pub fn stop_marker(&self) {
        self.write_file_line(
            "INFO",
            &format!("=== NETPULSE STOP {} ===", Local::now().to_rfc3339()),
        );
    }

    /// Record one tick as a structured STATUS line.
    ///
    /// Returns the correlation id so callers can surface it in debug
    /// output next to the rendered panel.
    pub fn status(&self, snapshot: &Snapshot) -> Uuid {
        let correlation = Uuid::new_v4();
        match serde_json::to_string(snapshot) {
            Ok(payload) => {
                self.write_file_line("INFO", &format!("STATUS {} {}", correlation, payload));
            }
            Err(e) => {
                self.write_file_line("ERROR", &format!("STATUS serialization failed: {}", e));
            }
        }
        correlation
    }

    fn write_file_line(&self, level: &str, message: &str) {
        if let Some(ref file) = self.file {
            if let Ok(mut file) = file.lock() {
                let ts = Local::now().format("%Y-%m-%d %H:%M:%S");
                // Log-file write failures must never take the loop down.
                let _ = writeln!(file, "{} | {:<5} | {}", ts, level, message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DnsSample, HttpReply, HttpSample, PingSample, ResolvedHost, ThroughputSample,
    };
    use crate::types::{ProbeOutcome, ProxyMode};

    fn snapshot() -> Snapshot {
        Snapshot {
            timestamp: Local::now(),
            primary_address: None,
            throughput: ThroughputSample::ZERO,
            pings: vec![PingSample {
                target: "1.1.1.1".parse().unwrap(),
                outcome: ProbeOutcome::Failed("capability unavailable".into()),
            }],
            dns: DnsSample {
                hostname: "api.openai.com".into(),
                outcome: ProbeOutcome::Ok(ResolvedHost {
                    address: "104.18.33.45".into(),
                }),
            },
            http: HttpSample {
                host: "api.openai.com".into(),
                path: "/v1/models".into(),
                outcome: ProbeOutcome::Ok(HttpReply {
                    status: 401,
                    proxy: ProxyMode::Direct,
                }),
            },
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::Debug.as_str(), "DEBUG");
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
    }

    #[test]
    fn test_file_receives_markers_and_status() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        let logger = Logger::new(LogLevel::Error, false)
            .with_file(&path)
            .unwrap();

        logger.start_marker();
        let correlation = logger.status(&snapshot());
        logger.stop_marker();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("NETPULSE START"));
        assert!(content.contains("NETPULSE STOP"));
        assert!(content.contains("STATUS"));
        assert!(content.contains(&correlation.to_string()));
        assert!(content.contains("api.openai.com"));
    }

    #[test]
    fn test_every_level_written_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        let logger = Logger::new(LogLevel::Error, false)
            .with_file(&path)
            .unwrap();

        // Below min_level: skipped on console, still in the file.
        logger.debug("debug line");
        logger.warn("warn line");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("debug line"));
        assert!(content.contains("warn line"));
    }

    #[test]
    fn test_console_only_logger_is_silent_about_files() {
        let logger = Logger::new(LogLevel::Error, false);
        // Must not panic without a file attached.
        logger.info("to the void");
        logger.start_marker();
        logger.status(&snapshot());
        logger.stop_marker();
    }

    #[test]
    fn test_unwritable_log_path_is_an_error() {
        let result = Logger::new(LogLevel::Info, false).with_file("/nonexistent/dir/run.log");
        assert!(result.is_err());
    }
}
