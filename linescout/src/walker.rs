use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::unify_path;

/// Recursively collects every regular file under `root` into a flat list
/// of absolute paths, depth-first.
///
/// A root that does not exist or is not a directory yields an empty list
/// rather than an error. Traversal failures inside the tree (unreadable
/// subdirectories, vanished entries) are logged and skipped; the rest of
/// the walk continues.
pub fn collect_files(root: &Path) -> Vec<PathBuf> {
    let root = unify_path(root);
    if !root.is_dir() {
        warn!("root {} is not a directory, nothing to scan", root.display());
        return Vec::new();
    }

    let mut builder = WalkBuilder::new(&root);
    builder
        .standard_filters(false)
        .hidden(false)
        .follow_links(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        match entry {
            Ok(entry) => {
                if entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                    files.push(entry.into_path());
                }
            }
            Err(err) => warn!("traversal error: {}", err),
        }
    }

    debug!("collected {} files under {}", files.len(), root.display());
    files
}
