use std::path::PathBuf;

/// A single matching line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// The file the match was found in
    pub path: PathBuf,
    /// The 1-based line number of the match
    pub line_number: usize,
    /// The content of the matching line, without its terminator
    pub line_content: String,
}

/// What one worker accomplished over its shard.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerReport {
    /// Files read to completion
    pub files_scanned: usize,
    /// Files abandoned after a read failure
    pub files_skipped: usize,
    /// Matching lines emitted
    pub matches_found: usize,
}

/// Aggregated outcome of a whole scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanSummary {
    /// Files read to completion across all workers
    pub files_scanned: usize,
    /// Files abandoned after a read failure
    pub files_skipped: usize,
    /// Matching lines emitted across all workers
    pub matches_found: usize,
    /// Workers that panicked before finishing their shard
    pub workers_failed: usize,
}

impl ScanSummary {
    /// Folds one worker's report into the summary.
    pub fn absorb(&mut self, report: WorkerReport) {
        self.files_scanned += report.files_scanned;
        self.files_skipped += report.files_skipped;
        self.matches_found += report.matches_found;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_accumulates() {
        let mut summary = ScanSummary::default();
        summary.absorb(WorkerReport {
            files_scanned: 3,
            files_skipped: 1,
            matches_found: 7,
        });
        summary.absorb(WorkerReport {
            files_scanned: 2,
            files_skipped: 0,
            matches_found: 4,
        });

        assert_eq!(summary.files_scanned, 5);
        assert_eq!(summary.files_skipped, 1);
        assert_eq!(summary.matches_found, 11);
        assert_eq!(summary.workers_failed, 0);
    }
}
