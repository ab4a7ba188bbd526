use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Splits a flat file list into `shard_count` shards by round-robin:
/// the file at index `i` lands in shard `i % shard_count`.
///
/// Round-robin (rather than contiguous chunking) spreads large and small
/// files pseudo-evenly across workers without needing file-size
/// statistics. The shards are pairwise disjoint and together cover the
/// input exactly; trailing shards may be empty when there are fewer
/// files than shards.
pub fn partition(files: Vec<PathBuf>, shard_count: NonZeroUsize) -> Vec<Vec<PathBuf>> {
    let n = shard_count.get();
    let mut shards: Vec<Vec<PathBuf>> = Vec::with_capacity(n);
    shards.resize_with(n, Vec::new);

    for (index, file) in files.into_iter().enumerate() {
        shards[index % n].push(file);
    }

    shards
}
