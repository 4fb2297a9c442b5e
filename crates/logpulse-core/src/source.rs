//! Event sources
//!
//! A source re-reads the whole request log on every call and hands back the
//! events in file order. Nothing is cached between calls.
//!
//! The log is appended to by another process while we read it. A read takes
//! whatever bytes are present when the file is opened and read to its end at
//! that moment; lines appended mid-read may or may not be included. Reads are
//! best-effort consistent, not transactional.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::RequestEvent;
use crate::parser::parse_line;

/// Outcome of one full read of a log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadReport {
    /// Parsed events in file order
    pub events: Vec<RequestEvent>,
    /// Non-blank lines seen
    pub lines_total: usize,
    /// Non-blank lines that did not match the grammar
    pub lines_rejected: usize,
}

impl ReadReport {
    /// Parse raw log text. Blank lines are skipped without being counted.
    pub fn from_text(text: &str) -> Self {
        let mut report = ReadReport::default();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            report.lines_total += 1;
            match parse_line(line) {
                Some(event) => report.events.push(event),
                None => report.lines_rejected += 1,
            }
        }
        report
    }
}

/// Supplier of the current, ordered event sequence
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Read every event currently present, in arrival order
    async fn read_events(&self) -> Result<Vec<RequestEvent>>;
}

/// Request log stored as a plain file
#[derive(Debug, Clone)]
pub struct LogFileSource {
    path: PathBuf,
    read_timeout: Duration,
}

impl LogFileSource {
    /// Create a source for the log at `path`; reads give up after `read_timeout`
    pub fn new(path: impl Into<PathBuf>, read_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            read_timeout,
        }
    }

    /// Location of the log
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole file, keeping line counts.
    ///
    /// A missing or unreadable file is [`Error::SourceUnavailable`]; an
    /// existing empty file yields an empty report.
    pub async fn read_report(&self) -> Result<ReadReport> {
        let started = Instant::now();

        let bytes = match tokio::time::timeout(self.read_timeout, tokio::fs::read(&self.path)).await {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                metrics::counter!("logpulse_source_errors_total", "kind" => "unavailable").increment(1);
                warn!(path = %self.path.display(), error = %e, "Request log unavailable");
                return Err(Error::source_unavailable(&self.path, e));
            }
            Err(_) => {
                metrics::counter!("logpulse_source_errors_total", "kind" => "timeout").increment(1);
                warn!(path = %self.path.display(), timeout = ?self.read_timeout, "Request log read timed out");
                return Err(Error::SourceTimeout {
                    path: self.path.clone(),
                    timeout: self.read_timeout,
                });
            }
        };

        // Writers may interleave partial multi-byte sequences; never fail on them.
        let text = String::from_utf8_lossy(&bytes);
        let report = ReadReport::from_text(&text);

        metrics::counter!("logpulse_lines_parsed_total").increment(report.events.len() as u64);
        metrics::counter!("logpulse_lines_rejected_total").increment(report.lines_rejected as u64);
        metrics::histogram!("logpulse_source_read_seconds").record(started.elapsed().as_secs_f64());

        debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            lines = report.lines_total,
            rejected = report.lines_rejected,
            "Read request log"
        );

        Ok(report)
    }
}

#[async_trait]
impl EventSource for LogFileSource {
    async fn read_events(&self) -> Result<Vec<RequestEvent>> {
        Ok(self.read_report().await?.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GOOD: &str = "2025-08-14 10:15:30,042 - INFO - GET /api/v1/health status=200 0.001s";

    fn source_for(file: &tempfile::NamedTempFile) -> LogFileSource {
        LogFileSource::new(file.path(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = LogFileSource::new(dir.path().join("absent.log"), Duration::from_secs(5));

        let err = source.read_events().await.unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_empty_file_is_empty_sequence() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(source_for(&file).read_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drops_rejects_and_keeps_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "INFO:     Started server process [4242]").unwrap();
        writeln!(file, "{GOOD}").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "2025-08-14 10:15:31,000 - INFO - POST /api/v1/auth/login status=401 0.010s").unwrap();
        writeln!(file, "2025-08-14 10:15:31,500 - INFO - GET /api/v1/health status=2").unwrap();
        // identical lines are distinct events
        writeln!(file, "{GOOD}").unwrap();

        let report = source_for(&file).read_report().await.unwrap();

        assert_eq!(report.lines_total, 5);
        assert_eq!(report.lines_rejected, 2);
        let paths: Vec<_> = report.events.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["/api/v1/health", "/api/v1/auth/login", "/api/v1/health"]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_does_not_fail_the_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xff\xfe garbage\n").unwrap();
        writeln!(file, "{GOOD}").unwrap();

        let events = source_for(&file).read_events().await.unwrap();
        assert_eq!(events.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_blocked_source_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let fifo = dir.path().join("requests.fifo");
        let status = std::process::Command::new("mkfifo").arg(&fifo).status().unwrap();
        assert!(status.success());

        // A FIFO with no writer blocks `open` indefinitely
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let source = LogFileSource::new(&fifo, Duration::from_millis(200));
        let started = Instant::now();
        let result = runtime.block_on(source.read_events());
        runtime.shutdown_background();

        assert!(
            matches!(result, Err(Error::SourceTimeout { .. })),
            "got {result:?}"
        );
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unterminated_last_line_is_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{GOOD}").unwrap();

        assert_eq!(source_for(&file).read_events().await.unwrap().len(), 1);
    }
}
