//! Path and naming utilities

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::utils::config::WEIGHT_FLOOR;

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Record form of a relative path: lossy UTF-8 with `/` separators on every platform.
pub fn path_to_record_string(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Directory portion of a record path, or `None` when the path sits at the root.
pub fn parent_path_of(relative: &str) -> Option<String> {
    relative
        .rsplit_once('/')
        .map(|(parent, _)| parent)
        .filter(|parent| !parent.is_empty())
        .map(str::to_string)
}

/// Display weight from a leading `(N)` in a directory name: `WEIGHT_FLOOR + N`.
pub fn weight_from_name(name: &str) -> Option<i64> {
    let (digits, _) = name.strip_prefix('(')?.split_once(')')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: i64 = digits.parse().ok()?;
    WEIGHT_FLOOR.checked_add(n)
}

/// `(basename, extension)` split on the last dot. Names without a dot have no extension.
pub fn split_file_name(file_name: &str) -> (String, String) {
    let path = Path::new(file_name);
    let basename = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let extension = path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (basename, extension)
}

/// Hidden entries (`.git`, `.DS_Store`, ...) are never walked.
pub fn is_dot_entry(file_name: &str) -> bool {
    file_name.starts_with('.')
}

/// Seconds since the epoch; negative for times before it.
pub fn unix_seconds(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}

pub fn time_modified(meta: &Metadata) -> i64 {
    meta.modified().map(unix_seconds).unwrap_or(0)
}

/// Inode change time, the closest unix has to a creation timestamp for all filesystems.
#[cfg(unix)]
pub fn time_created(meta: &Metadata) -> i64 {
    use std::os::unix::fs::MetadataExt;
    meta.ctime()
}

#[cfg(not(unix))]
pub fn time_created(meta: &Metadata) -> i64 {
    meta.created().map(unix_seconds).unwrap_or(0)
}

/// Absolute form of `root` without resolving symlinks. Falls back to `root` as given.
pub fn absolute_root(root: &Path) -> PathBuf {
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}
