use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Summarise paths skipped during a walk of `root` (only populated with `skip_errors`).
/// Call once when the walk is exhausted.
pub fn report_skipped_paths(root: &Path, skipped: &[(PathBuf, String)]) {
    if skipped.is_empty() {
        return;
    }
    warn!(
        "Skipped {} paths under {} due to permission errors or access issues",
        skipped.len(),
        root.display()
    );
    for (path, msg) in skipped {
        debug!("  skipped: {} ({})", path.display(), msg);
    }
}
