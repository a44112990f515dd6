//! Tree mode: one [`TreeRecord`] per non-empty directory, then one per loose document.
//!
//! Directory records carry the converted `(0).docx` description, the media files directly
//! inside the directory and a display weight from a `(N)` name prefix. The document pass
//! runs after every directory has been yielded.

use log::{debug, warn};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::engine::tools::{
    parent_path_of, path_relative_to, path_to_record_string, weight_from_name,
};
use crate::error::SourceError;
use crate::utils::config::TreeConsts;
use crate::{
    EntryDescriptor, FieldDescriptions, HighWater, IdSchema, MediaItem, PATH_ID, Result,
    SourceConfig, TreeRecord,
};

use super::context::Traversal;
use super::error_handler::report_skipped_paths;
use super::id_check::warn_if_id_too_long;
use super::walk::{EntryKind, Walk};

const TREE_FIELDS: FieldDescriptions = &[
    ("parent_path", "Parent path, if it exists, or NULL"),
    ("path", "Directory path, relative to base"),
    ("absolute_path", "Directory path, absolute"),
    ("name", "Directory name"),
    ("time_created", "Creation UNIX timestamp"),
    ("time_modified", "Modified UNIX timestamp"),
    ("description", "Description"),
    ("media", "Media"),
    (
        "weight",
        "Display weight, or null if not defined in the filesystem",
    ),
];

/// Source of tree records.
#[derive(Clone, Debug)]
pub struct TreeSource {
    traversal: Traversal,
}

impl TreeSource {
    pub fn new(config: &SourceConfig, high_water: Option<&HighWater>) -> Result<Self> {
        Ok(Self {
            traversal: Traversal::from_config(config, high_water)?,
        })
    }

    pub fn traversal(&self) -> &Traversal {
        &self.traversal
    }

    /// A fresh lazy stream: directories first, then documents.
    pub fn records(&self) -> TreeRecords<'_> {
        TreeRecords {
            traversal: &self.traversal,
            phase: Phase::Directories(self.traversal.walk(EntryKind::Directories)),
            emitted: 0,
            skipped: Vec::new(),
        }
    }

    pub fn fields() -> FieldDescriptions {
        TREE_FIELDS
    }

    pub fn ids() -> IdSchema {
        PATH_ID
    }
}

impl fmt::Display for TreeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Migrate tree structure")
    }
}

enum Phase {
    Directories(Walk),
    Documents(Walk),
    Done,
}

/// Iterator returned by [`TreeSource::records`].
pub struct TreeRecords<'a> {
    traversal: &'a Traversal,
    phase: Phase,
    emitted: usize,
    skipped: Vec<(PathBuf, String)>,
}

impl TreeRecords<'_> {
    /// Entries whose record could not be built (only with `skip_errors`). Walk errors are
    /// reported by the walks themselves.
    pub fn skipped(&self) -> &[(PathBuf, String)] {
        &self.skipped
    }

    /// Record-level failure: skipped under `skip_errors`, otherwise ends the stream.
    fn fail(&mut self, err: SourceError) -> Option<Result<TreeRecord>> {
        if self.traversal.skip_errors() {
            warn!("Skipping: {}", err);
            let path = err
                .path()
                .map_or_else(|| PathBuf::from("<no-path>"), Path::to_path_buf);
            self.skipped.push((path, err.to_string()));
            return None;
        }
        self.phase = Phase::Done;
        Some(Err(err))
    }
}

impl Iterator for TreeRecords<'_> {
    type Item = Result<TreeRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let traversal = self.traversal;
        loop {
            let built = match &mut self.phase {
                Phase::Directories(dirs) => match dirs.next() {
                    Some(Ok(dir)) => directory_record(traversal, dir),
                    Some(Err(e)) => Err(e),
                    None => {
                        debug!("Directory pass done: {} records", self.emitted);
                        self.phase = Phase::Documents(traversal.documents_walk());
                        continue;
                    }
                },
                Phase::Documents(docs) => match docs.next() {
                    Some(Ok(doc)) => document_record(traversal, doc),
                    Some(Err(e)) => Err(e),
                    None => {
                        debug!("Tree records exhausted: {} emitted", self.emitted);
                        report_skipped_paths(traversal.root(), &self.skipped);
                        self.phase = Phase::Done;
                        return None;
                    }
                },
                Phase::Done => return None,
            };
            match built {
                Ok(Some(record)) => {
                    self.emitted += 1;
                    warn_if_id_too_long(&record.path);
                    return Some(Ok(record));
                }
                Ok(None) => continue,
                Err(err) => match self.fail(err) {
                    Some(failed) => return Some(failed),
                    None => continue,
                },
            }
        }
    }
}

/// Record for one directory, or `None` if it has no entries at all.
pub fn directory_record(
    traversal: &Traversal,
    dir: EntryDescriptor,
) -> Result<Option<TreeRecord>> {
    let abs = &dir.absolute_path;
    let mut children = std::fs::read_dir(abs).map_err(|e| SourceError::io(abs, e))?;
    if children.next().is_none() {
        debug!("Skipping empty directory {}", dir.relative_path);
        return Ok(None);
    }

    let description_path = abs.join(TreeConsts::DESCRIPTION_FILENAME);
    let description = if description_path.is_file() {
        traversal
            .converter()
            .convert(&description_path)
            .or_fallback(&description_path, "")
    } else {
        String::new()
    };

    let mut media = Vec::new();
    for file in traversal.media_walk(abs)? {
        let file = file?;
        let rel = path_relative_to(&file.absolute_path, traversal.root())
            .unwrap_or_else(|| file.absolute_path.clone());
        media.push(MediaItem {
            path: path_to_record_string(&rel),
            extension: file.extension.to_lowercase(),
        });
    }

    Ok(Some(TreeRecord {
        parent_path: parent_path_of(&dir.relative_path),
        absolute_path: abs.to_string_lossy().into_owned(),
        weight: weight_from_name(&dir.file_name),
        path: dir.relative_path,
        name: dir.basename,
        time_created: dir.time_created,
        time_modified: dir.time_modified,
        description,
        media: Some(media),
    }))
}

/// Record for one loose document, or `None` for a directory description file.
pub fn document_record(
    traversal: &Traversal,
    doc: EntryDescriptor,
) -> Result<Option<TreeRecord>> {
    if doc.file_name == TreeConsts::DESCRIPTION_FILENAME {
        return Ok(None);
    }
    let abs = &doc.absolute_path;
    let description = if TreeConsts::CONVERTIBLE_EXTENSIONS.contains(&doc.extension.as_str()) {
        traversal
            .converter()
            .convert(abs)
            .or_fallback(abs, TreeConsts::IMPORT_ERROR_MESSAGE)
    } else {
        let bytes = std::fs::read(abs).map_err(|e| SourceError::io(abs, e))?;
        String::from_utf8_lossy(&bytes).into_owned()
    };

    Ok(Some(TreeRecord {
        parent_path: parent_path_of(&doc.relative_path),
        absolute_path: abs.to_string_lossy().into_owned(),
        path: doc.relative_path,
        name: doc.basename,
        time_created: doc.time_created,
        time_modified: doc.time_modified,
        description,
        media: None,
        weight: None,
    }))
}
