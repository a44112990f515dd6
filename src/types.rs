//! Public types: source configuration, walk entries and the two record schemas.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

use crate::utils::config::{DEFAULT_CONVERTER, ID_MAX_LENGTH};

/// Source options handed in by the orchestration layer (or loaded from a config file).
///
/// `include`, `exclude` and `depth` accept either one string or a list of strings.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Search path, used verbatim.
    pub path: Option<PathBuf>,
    /// Name of an environment variable holding the search path. Wins over `path`.
    pub path_env: Option<String>,
    /// Filenames to include: globs, literal names or `/regex/` patterns. Empty means all.
    #[serde(deserialize_with = "one_or_many")]
    pub include: Vec<String>,
    /// Filenames to exclude, same syntax as `include`.
    #[serde(deserialize_with = "one_or_many")]
    pub exclude: Vec<String>,
    /// Depth expressions such as `== 0` or `< 3`, applied conjunctively.
    #[serde(deserialize_with = "one_or_many")]
    pub depth: Vec<String>,
    /// Skip unreadable paths (logged and counted) instead of failing the run.
    pub skip_errors: bool,
    /// Document converter program. Defaults to [`DEFAULT_CONVERTER`].
    pub converter: Option<String>,
}

impl SourceConfig {
    pub fn converter_program(&self) -> &str {
        self.converter.as_deref().unwrap_or(DEFAULT_CONVERTER)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// Resume point: sort the walk by `field` and, when `after` is set, only yield entries
/// whose field value is strictly greater.
#[derive(Clone, Debug, Default)]
pub struct HighWater {
    pub field: String,
    pub after: Option<String>,
}

impl HighWater {
    pub fn new(field: impl Into<String>) -> Self {
        HighWater {
            field: field.into(),
            after: None,
        }
    }

    pub fn after(mut self, value: impl Into<String>) -> Self {
        self.after = Some(value.into());
        self
    }
}

/// One filesystem entry seen by the walker. Paths use `/` separators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryDescriptor {
    /// Path relative to the search root; empty for the root itself.
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub file_name: String,
    pub basename: String,
    pub extension: String,
    pub size: u64,
    /// Unix seconds (inode change time on unix).
    pub time_created: i64,
    /// Unix seconds.
    pub time_modified: i64,
    pub is_dir: bool,
}

/// Flat-mode record: one per file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub parent_path: Option<String>,
    pub path: String,
    pub absolute_path: String,
    pub name: String,
    pub basename: String,
    pub extension: String,
    pub size: u64,
    pub time_created: i64,
    pub time_modified: i64,
}

/// A file attached to a tree record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    /// Relative to the search root.
    pub path: String,
    /// Lowercased.
    pub extension: String,
}

/// Tree-mode record: one per non-empty directory, or one per loose document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TreeRecord {
    pub parent_path: Option<String>,
    pub path: String,
    pub absolute_path: String,
    /// Name without extension.
    pub name: String,
    pub time_created: i64,
    pub time_modified: i64,
    pub description: String,
    /// `None` for document records.
    pub media: Option<Vec<MediaItem>>,
    /// `None` unless the directory name starts with `(N)`.
    pub weight: Option<i64>,
}

/// Identifier contract declared to the import target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IdSchema {
    pub field: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub max_length: usize,
    pub is_ascii: bool,
}

/// Both producers key records by `path`.
pub const PATH_ID: IdSchema = IdSchema {
    field: "path",
    kind: "string",
    max_length: ID_MAX_LENGTH,
    is_ascii: false,
};

/// Field name → human-readable label.
pub type FieldDescriptions = &'static [(&'static str, &'static str)];
