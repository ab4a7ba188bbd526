use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::results::MatchRecord;

/// Where workers deliver their output.
///
/// All workers share one sink, so implementations are the single
/// mutual-exclusion point for the streams they write: two workers must
/// never interleave the bytes of two different lines. Match records and
/// error reports go to distinct channels.
pub trait ReportSink: Send + Sync {
    /// Reports one matching line.
    fn record_match(&self, path: &Path, line_number: usize, line: &str);

    /// Reports a failure that caused a file to be skipped.
    fn record_error(&self, message: &str);
}

/// Sink that prints matches to stdout and errors to stderr.
///
/// Match lines use the literal form `find<path>:<line>: <content>`
/// (no separator between `find` and the path); error lines use
/// `error: <message>`. Each stream is guarded by its own mutex so whole
/// lines are written atomically with respect to other workers.
pub struct ConsoleSink {
    stdout: Mutex<io::Stdout>,
    stderr: Mutex<io::Stderr>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            stdout: Mutex::new(io::stdout()),
            stderr: Mutex::new(io::stderr()),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for ConsoleSink {
    fn record_match(&self, path: &Path, line_number: usize, line: &str) {
        let mut out = self.stdout.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "find{}:{}: {}", path.display(), line_number, line);
    }

    fn record_error(&self, message: &str) {
        let mut err = self.stderr.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(err, "error: {}", message);
    }
}

/// Sink that collects records in memory, for tests and embedders.
#[derive(Debug, Default)]
pub struct MemorySink {
    matches: Mutex<Vec<MatchRecord>>,
    errors: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the matches recorded so far.
    pub fn matches(&self) -> Vec<MatchRecord> {
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns a snapshot of the error messages recorded so far.
    pub fn errors(&self) -> Vec<String> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReportSink for MemorySink {
    fn record_match(&self, path: &Path, line_number: usize, line: &str) {
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MatchRecord {
                path: path.to_path_buf(),
                line_number,
                line_content: line.to_string(),
            });
    }

    fn record_error(&self, message: &str) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
