//! Flat mode: one [`FileRecord`] per file.

use log::debug;
use std::fmt;

use crate::engine::tools::parent_path_of;
use crate::{
    EntryDescriptor, FieldDescriptions, FileRecord, HighWater, IdSchema, PATH_ID, Result,
    SourceConfig,
};

use super::context::Traversal;
use super::id_check::warn_if_id_too_long;
use super::walk::{EntryKind, Walk};

const FILE_FIELDS: FieldDescriptions = &[
    ("parent_path", "Parent path, if it exists, or NULL"),
    ("path", "File path, relative to base"),
    ("absolute_path", "File path, absolute"),
    ("name", "File name, including extension"),
    ("basename", "File name, without extension"),
    ("extension", "File extension"),
    ("size", "File size, in bytes"),
    ("time_created", "File creation UNIX timestamp"),
    ("time_modified", "File modified UNIX timestamp"),
];

/// Source of flat file records.
#[derive(Clone, Debug)]
pub struct FileSource {
    traversal: Traversal,
}

impl FileSource {
    pub fn new(config: &SourceConfig, high_water: Option<&HighWater>) -> Result<Self> {
        Ok(Self {
            traversal: Traversal::from_config(config, high_water)?,
        })
    }

    pub fn traversal(&self) -> &Traversal {
        &self.traversal
    }

    /// A fresh lazy stream over the tree. Nothing is read until the first `next()`.
    pub fn records(&self) -> FileRecords {
        FileRecords {
            files: self.traversal.walk(EntryKind::Files),
            emitted: 0,
            done: false,
        }
    }

    pub fn fields() -> FieldDescriptions {
        FILE_FIELDS
    }

    pub fn ids() -> IdSchema {
        PATH_ID
    }
}

impl fmt::Display for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Migrate from filesystem")
    }
}

/// Iterator returned by [`FileSource::records`].
pub struct FileRecords {
    files: Walk,
    emitted: usize,
    done: bool,
}

impl Iterator for FileRecords {
    type Item = Result<FileRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.files.next() {
            Some(Ok(entry)) => {
                self.emitted += 1;
                Some(Ok(file_record(entry)))
            }
            Some(Err(e)) => {
                self.done = true;
                Some(Err(e))
            }
            None => {
                self.done = true;
                debug!("File records exhausted: {} emitted", self.emitted);
                None
            }
        }
    }
}

pub fn file_record(entry: EntryDescriptor) -> FileRecord {
    warn_if_id_too_long(&entry.relative_path);
    FileRecord {
        parent_path: parent_path_of(&entry.relative_path),
        absolute_path: entry.absolute_path.to_string_lossy().into_owned(),
        path: entry.relative_path,
        name: entry.file_name,
        basename: entry.basename,
        extension: entry.extension,
        size: entry.size,
        time_created: entry.time_created,
        time_modified: entry.time_modified,
    }
}
