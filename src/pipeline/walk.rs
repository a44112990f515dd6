//! Filtered, depth-bounded walk producing [`EntryDescriptor`]s.
//!
//! Unsorted walks stream straight from `walkdir`. A walk with a [`HighWaterOrder`] is
//! materialized and sorted before its first entry is returned.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::engine::tools::{
    is_dot_entry, path_relative_to, path_to_record_string, split_file_name, time_created,
    time_modified,
};
use crate::error::SourceError;
use crate::{EntryDescriptor, Result};

use super::error_handler::report_skipped_paths;
use super::filter::{DepthFilter, NameFilter};
use super::sort::HighWaterOrder;

/// Which entries a walk yields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Files,
    Directories,
}

/// Everything one walk needs. Cheap to clone; holds no open handles.
#[derive(Clone, Debug)]
pub struct WalkSpec {
    pub root: PathBuf,
    pub kind: EntryKind,
    pub include: NameFilter,
    pub exclude: NameFilter,
    pub depth: DepthFilter,
    pub order: Option<HighWaterOrder>,
    pub skip_errors: bool,
}

impl WalkSpec {
    pub fn new(root: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            root: root.into(),
            kind,
            include: NameFilter::default(),
            exclude: NameFilter::default(),
            depth: DepthFilter::default(),
            order: None,
            skip_errors: false,
        }
    }

    /// Start walking. No I/O happens until the first `next()`.
    pub fn walk(self) -> Walk {
        Walk {
            state: WalkState::Pending,
            spec: self,
            skipped: Vec::new(),
            reported: false,
        }
    }

    fn walkdir(&self) -> walkdir::IntoIter {
        let mut wd = WalkDir::new(&self.root).follow_links(true).min_depth(1);
        if let Some(max) = self.depth.max_depth() {
            // walkdir counts the root as depth 0, so its children are at 1.
            wd = wd.max_depth(max + 1);
        }
        if self.order.is_some() {
            // Stable input order, so ties under the sort field are deterministic.
            wd = wd.sort_by_file_name();
        }
        wd.into_iter()
    }

    /// Post-prune checks: kind, depth, names.
    fn accepts(&self, entry: &DirEntry, file_name: &str) -> bool {
        let is_dir = entry.file_type().is_dir();
        match self.kind {
            EntryKind::Files if is_dir => return false,
            EntryKind::Directories if !is_dir => return false,
            _ => {}
        }
        if !self.depth.accepts(entry.depth() - 1) {
            return false;
        }
        if !self.include.is_empty() && !self.include.matches(file_name) {
            return false;
        }
        !self.exclude.matches(file_name)
    }
}

/// Raw walk with hidden entries pruned.
type Pruned = walkdir::FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>;

enum WalkState {
    Pending,
    Streaming(Pruned),
    Sorted(std::vec::IntoIter<EntryDescriptor>),
    Done,
}

/// A followed symlink whose target does not exist. Neither a file nor a directory.
fn is_dangling_link(err: &walkdir::Error) -> bool {
    let missing = err
        .io_error()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound);
    err.depth() > 0
        && missing
        && err.path().is_some_and(|p| {
            std::fs::symlink_metadata(p).is_ok_and(|m| m.file_type().is_symlink())
        })
}

fn not_hidden(entry: &DirEntry) -> bool {
    entry.depth() == 0 || !is_dot_entry(&entry.file_name().to_string_lossy())
}

/// Iterator over the entries of one [`WalkSpec`].
pub struct Walk {
    spec: WalkSpec,
    state: WalkState,
    skipped: Vec<(PathBuf, String)>,
    reported: bool,
}

impl Walk {
    pub fn spec(&self) -> &WalkSpec {
        &self.spec
    }

    /// Paths skipped so far because of access errors (only with `skip_errors`).
    pub fn skipped(&self) -> &[(PathBuf, String)] {
        &self.skipped
    }

    fn stream(spec: &WalkSpec) -> Pruned {
        spec.walkdir().filter_entry(not_hidden as fn(&DirEntry) -> bool)
    }

    /// Next accepted entry from the raw walk, handling walk errors per `skip_errors`.
    fn next_streamed(
        spec: &WalkSpec,
        iter: &mut Pruned,
        skipped: &mut Vec<(PathBuf, String)>,
    ) -> Option<Result<EntryDescriptor>> {
        for item in iter.by_ref() {
            let result = match item {
                Ok(entry) => describe_if_accepted(spec, &entry),
                Err(err) if is_dangling_link(&err) => {
                    if let Some(path) = err.path() {
                        debug!("Skipping dangling symlink {}", path.display());
                    }
                    continue;
                }
                Err(err) => Err(SourceError::from(err)),
            };
            match result {
                Ok(Some(e)) => return Some(Ok(e)),
                Ok(None) => continue,
                Err(err) if spec.skip_errors => {
                    warn!("Skipping: {}", err);
                    let path = err
                        .path()
                        .map_or_else(|| PathBuf::from("<no-path>"), Path::to_path_buf);
                    skipped.push((path, err.to_string()));
                }
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }

    fn materialize(&mut self) -> Result<Vec<EntryDescriptor>> {
        let mut iter = Self::stream(&self.spec);
        let mut entries = Vec::new();
        while let Some(item) = Self::next_streamed(&self.spec, &mut iter, &mut self.skipped) {
            entries.push(item?);
        }
        if let Some(order) = &self.spec.order {
            let sorter = *order.sorter();
            entries.sort_by(|a, b| sorter.compare(a, b));
            debug!(
                "Sorted {} entries by {} under {}",
                entries.len(),
                sorter.field(),
                self.spec.root.display()
            );
        }
        Ok(entries)
    }

    fn finish(&mut self) {
        self.state = WalkState::Done;
        if !self.reported {
            self.reported = true;
            report_skipped_paths(&self.spec.root, &self.skipped);
        }
    }
}

impl Iterator for Walk {
    type Item = Result<EntryDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                WalkState::Pending => {
                    if self.spec.order.is_some() {
                        match self.materialize() {
                            Ok(entries) => self.state = WalkState::Sorted(entries.into_iter()),
                            Err(e) => {
                                self.finish();
                                return Some(Err(e));
                            }
                        }
                    } else {
                        self.state = WalkState::Streaming(Self::stream(&self.spec));
                    }
                }
                WalkState::Streaming(iter) => {
                    match Self::next_streamed(&self.spec, iter, &mut self.skipped) {
                        Some(Ok(e)) => return Some(Ok(e)),
                        Some(Err(e)) => {
                            self.finish();
                            return Some(Err(e));
                        }
                        None => {
                            self.finish();
                            return None;
                        }
                    }
                }
                WalkState::Sorted(iter) => match iter.next() {
                    Some(e) if self.spec.order.as_ref().is_none_or(|o| o.admits(&e)) => {
                        return Some(Ok(e));
                    }
                    Some(_) => continue,
                    None => {
                        self.finish();
                        return None;
                    }
                },
                WalkState::Done => return None,
            }
        }
    }
}

fn describe_if_accepted(spec: &WalkSpec, entry: &DirEntry) -> Result<Option<EntryDescriptor>> {
    let file_name = entry.file_name().to_string_lossy();
    if !spec.accepts(entry, &file_name) {
        return Ok(None);
    }
    describe(&spec.root, entry.path(), entry.file_type().is_dir()).map(Some)
}

/// Build the descriptor for `path` under `root`. Metadata follows symlinks.
pub fn describe(root: &Path, path: &Path, is_dir: bool) -> Result<EntryDescriptor> {
    let meta = std::fs::metadata(path).map_err(|e| SourceError::io(path, e))?;
    let rel = path_relative_to(path, root).unwrap_or_else(|| path.to_path_buf());
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (basename, extension) = split_file_name(&file_name);
    Ok(EntryDescriptor {
        relative_path: path_to_record_string(&rel),
        absolute_path: path.to_path_buf(),
        file_name,
        basename,
        extension,
        size: meta.len(),
        time_created: time_created(&meta),
        time_modified: time_modified(&meta),
        is_dir,
    })
}
