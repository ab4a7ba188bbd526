use std::thread;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::errors::ScanResult;
use crate::partition::partition;
use crate::results::ScanSummary;
use crate::scanner::scan_shard;
use crate::sink::ReportSink;
use crate::walker::collect_files;

/// Runs a full scan: collect files under the configured root, partition
/// them round-robin across `thread_count` shards, scan every non-empty
/// shard on its own OS thread, and wait for all of them.
///
/// Threads are created fresh per scan and joined before this function
/// returns. All output flows through `sink`; within one file, matches
/// arrive in ascending line-number order, but no ordering holds across
/// workers. A worker that panics is logged and counted in the summary;
/// it never takes down the scan.
pub fn scan(config: &ScanConfig, sink: &dyn ReportSink) -> ScanResult<ScanSummary> {
    info!(
        "starting scan for {:?} under {}",
        config.needle,
        config.root_path.display()
    );

    let files = collect_files(&config.root_path);
    if files.is_empty() {
        debug!("no files to scan");
        return Ok(ScanSummary::default());
    }

    let shards = partition(files, config.thread_count);
    let mut summary = ScanSummary::default();

    thread::scope(|scope| {
        let mut handles = Vec::new();
        for (index, shard) in shards.into_iter().enumerate() {
            if shard.is_empty() {
                continue;
            }
            debug!("worker {} takes {} files", index, shard.len());
            let needle = config.needle.as_str();
            handles.push(scope.spawn(move || scan_shard(&shard, needle, sink)));
        }

        info!("spawned {} workers", handles.len());
        for handle in handles {
            match handle.join() {
                Ok(report) => summary.absorb(report),
                Err(_) => {
                    warn!("a worker panicked; its remaining files were not scanned");
                    summary.workers_failed += 1;
                }
            }
        }
    });

    info!(
        "scan complete: {} matches in {} files ({} skipped)",
        summary.matches_found, summary.files_scanned, summary.files_skipped
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemorySink, ReportSink};
    use anyhow::Result;
    use std::fs;
    use std::num::NonZeroUsize;
    use std::path::Path;
    use tempfile::tempdir;

    /// Sink that panics when asked to record a match from one particular
    /// file, taking its worker thread down mid-shard.
    struct TrippingSink {
        inner: MemorySink,
        trip_on: &'static str,
    }

    impl ReportSink for TrippingSink {
        fn record_match(&self, path: &Path, line_number: usize, line: &str) {
            if path.ends_with(self.trip_on) {
                panic!("sink refused {}", path.display());
            }
            self.inner.record_match(path, line_number, line);
        }

        fn record_error(&self, message: &str) {
            self.inner.record_error(message);
        }
    }

    #[test]
    fn test_scan_finds_matches_across_workers() -> Result<()> {
        let dir = tempdir()?;
        for i in 0..5 {
            fs::write(
                dir.path().join(format!("f{i}.txt")),
                format!("nothing\nneedle in file {i}\n"),
            )?;
        }

        let mut config = ScanConfig::new(dir.path(), "needle");
        config.thread_count = NonZeroUsize::new(2).unwrap();

        let sink = MemorySink::new();
        let summary = scan(&config, &sink)?;

        assert_eq!(summary.files_scanned, 5);
        assert_eq!(summary.files_skipped, 0);
        assert_eq!(summary.matches_found, 5);
        assert_eq!(summary.workers_failed, 0);

        let matches = sink.matches();
        assert_eq!(matches.len(), 5);
        assert!(matches.iter().all(|m| m.line_number == 2));
        Ok(())
    }

    #[test]
    fn test_panicked_worker_is_contained() -> Result<()> {
        let dir = tempdir()?;
        for i in 0..4 {
            fs::write(dir.path().join(format!("f{i}.txt")), format!("needle {i}\n"))?;
        }

        let mut config = ScanConfig::new(dir.path(), "needle");
        config.thread_count = NonZeroUsize::new(2).unwrap();

        let sink = TrippingSink {
            inner: MemorySink::new(),
            trip_on: "f1.txt",
        };
        let summary = scan(&config, &sink)?;

        // One worker dies on f1.txt and joins with Err; the scan still
        // completes and the other worker's whole shard is accounted for.
        assert_eq!(summary.workers_failed, 1);
        assert_eq!(summary.files_scanned, 2);
        assert_eq!(summary.matches_found, 2);

        let matches = sink.inner.matches();
        assert!(matches.iter().all(|m| !m.path.ends_with("f1.txt")));
        assert!(matches.len() >= 2, "surviving shard's matches missing");
        Ok(())
    }

    #[test]
    fn test_empty_directory_is_a_clean_noop() -> Result<()> {
        let dir = tempdir()?;
        let config = ScanConfig::new(dir.path(), "anything");

        let sink = MemorySink::new();
        let summary = scan(&config, &sink)?;

        assert_eq!(summary.files_scanned, 0);
        assert_eq!(summary.matches_found, 0);
        assert!(sink.matches().is_empty());
        assert!(sink.errors().is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_root_is_a_clean_noop() -> Result<()> {
        let config = ScanConfig::new("/definitely/not/a/real/dir", "anything");
        let sink = MemorySink::new();
        let summary = scan(&config, &sink)?;
        assert_eq!(summary.files_scanned, 0);
        Ok(())
    }

    #[test]
    fn test_scan_is_idempotent() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("sub"))?;
        fs::write(dir.path().join("a.txt"), "alpha needle\nbeta\n")?;
        fs::write(dir.path().join("sub/b.txt"), "gamma\nneedle again\n")?;

        let config = ScanConfig::new(dir.path(), "needle");

        let first = MemorySink::new();
        scan(&config, &first)?;
        let second = MemorySink::new();
        scan(&config, &second)?;

        let key = |sink: &MemorySink| {
            let mut pairs: Vec<_> = sink
                .matches()
                .into_iter()
                .map(|m| (m.path, m.line_number, m.line_content))
                .collect();
            pairs.sort();
            pairs
        };
        assert_eq!(key(&first), key(&second));
        Ok(())
    }

    #[test]
    fn test_single_thread_matches_parallel_results() -> Result<()> {
        let dir = tempdir()?;
        for i in 0..7 {
            fs::write(
                dir.path().join(format!("f{i}.txt")),
                format!("hit one {i}\nmiss\nhit two {i}\n"),
            )?;
        }

        let mut serial = ScanConfig::new(dir.path(), "hit");
        serial.thread_count = NonZeroUsize::new(1).unwrap();
        let mut parallel = serial.clone();
        parallel.thread_count = NonZeroUsize::new(4).unwrap();

        let serial_sink = MemorySink::new();
        scan(&serial, &serial_sink)?;
        let parallel_sink = MemorySink::new();
        scan(&parallel, &parallel_sink)?;

        let key = |sink: &MemorySink| {
            let mut pairs: Vec<_> = sink
                .matches()
                .into_iter()
                .map(|m| (m.path, m.line_number))
                .collect();
            pairs.sort();
            pairs
        };
        assert_eq!(key(&serial_sink), key(&parallel_sink));
        Ok(())
    }
}
