use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::errors::{ScanError, ScanResult};
use crate::results::WorkerReport;
use crate::sink::ReportSink;

const BUFFER_CAPACITY: usize = 8192; // Initial buffer size for reading files

/// Scans a single file line by line, emitting a match record for every
/// line containing `needle` as a literal, case-sensitive substring.
///
/// Line numbers are 1-based; the reported content excludes the line
/// terminator. Returns the number of matching lines. The file handle is
/// dropped before returning, so a worker never holds more than one file
/// open at a time.
pub fn scan_file(path: &Path, needle: &str, sink: &dyn ReportSink) -> ScanResult<usize> {
    trace!("scanning file: {}", path.display());
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScanError::file_not_found(path),
        std::io::ErrorKind::PermissionDenied => ScanError::permission_denied(path),
        _ => ScanError::read_failed(path, e),
    })?;

    let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
    let mut line = String::with_capacity(256);
    let mut line_number = 0;
    let mut matches_found = 0;

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .map_err(|e| ScanError::read_failed(path, e))?;
        if bytes_read == 0 {
            break;
        }
        line_number += 1;

        // read_line keeps the terminator; the reported content must not.
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        if line.contains(needle) {
            trace!("match at {}:{}", path.display(), line_number);
            sink.record_match(path, line_number, &line);
            matches_found += 1;
        }
    }

    debug!(
        "scanned {} lines in {}, {} matches",
        line_number,
        path.display(),
        matches_found
    );
    Ok(matches_found)
}

/// Processes one shard: scans each file in order, containing per-file
/// failures.
///
/// A file that cannot be opened or read is reported on the sink's error
/// channel and skipped; the rest of the shard is still scanned. A bad
/// file never aborts the shard.
pub fn scan_shard(shard: &[PathBuf], needle: &str, sink: &dyn ReportSink) -> WorkerReport {
    let mut report = WorkerReport::default();

    for path in shard {
        match scan_file(path, needle, sink) {
            Ok(found) => {
                report.files_scanned += 1;
                report.matches_found += found;
            }
            Err(err) => {
                warn!("skipping {}: {}", path.display(), err);
                sink.record_error(&err.to_string());
                report.files_skipped += 1;
            }
        }
    }

    report
}
