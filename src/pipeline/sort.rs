//! Field comparators for high-water sorting.

use std::cmp::Ordering;

use crate::error::SourceError;
use crate::{EntryDescriptor, HighWater, Result};

/// Sort key of one entry under one field. Textual fields compare bytewise, numeric fields
/// numerically; the root pseudo-entry sorts before everything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey<'a> {
    Root,
    Text(&'a [u8]),
    Number(i64),
}

type KeyFn = for<'a> fn(&'a EntryDescriptor) -> SortKey<'a>;

fn parent_path_key(e: &EntryDescriptor) -> SortKey<'_> {
    if e.relative_path.is_empty() {
        return SortKey::Root;
    }
    SortKey::Text(
        e.relative_path
            .rsplit_once('/')
            .map(|(parent, _)| parent)
            .unwrap_or("")
            .as_bytes(),
    )
}

fn path_key(e: &EntryDescriptor) -> SortKey<'_> {
    SortKey::Text(e.relative_path.as_bytes())
}

fn absolute_path_key(e: &EntryDescriptor) -> SortKey<'_> {
    SortKey::Text(e.absolute_path.as_os_str().as_encoded_bytes())
}

fn name_key(e: &EntryDescriptor) -> SortKey<'_> {
    SortKey::Text(e.file_name.as_bytes())
}

fn basename_key(e: &EntryDescriptor) -> SortKey<'_> {
    SortKey::Text(e.basename.as_bytes())
}

fn extension_key(e: &EntryDescriptor) -> SortKey<'_> {
    SortKey::Text(e.extension.as_bytes())
}

fn size_key(e: &EntryDescriptor) -> SortKey<'_> {
    SortKey::Number(i64::try_from(e.size).unwrap_or(i64::MAX))
}

fn time_created_key(e: &EntryDescriptor) -> SortKey<'_> {
    SortKey::Number(e.time_created)
}

fn time_modified_key(e: &EntryDescriptor) -> SortKey<'_> {
    SortKey::Number(e.time_modified)
}

/// Sortable fields and how to key an entry by each.
static SORTABLE_FIELDS: [(&str, KeyFn); 9] = [
    ("parent_path", parent_path_key),
    ("path", path_key),
    ("absolute_path", absolute_path_key),
    ("name", name_key),
    ("basename", basename_key),
    ("extension", extension_key),
    ("size", size_key),
    ("time_created", time_created_key),
    ("time_modified", time_modified_key),
];

/// Total order over entries by one record field.
#[derive(Clone, Copy)]
pub struct FieldSorter {
    field: &'static str,
    key: KeyFn,
}

impl std::fmt::Debug for FieldSorter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSorter")
            .field("field", &self.field)
            .finish()
    }
}

impl FieldSorter {
    /// Comparator for `field`. Unknown fields are a programming error.
    pub fn for_field(field: &str) -> Result<Self> {
        SORTABLE_FIELDS
            .iter()
            .find(|(name, _)| *name == field)
            .map(|&(name, key)| FieldSorter { field: name, key })
            .ok_or_else(|| SourceError::UnknownSortField(field.to_string()))
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn key<'a>(&self, e: &'a EntryDescriptor) -> SortKey<'a> {
        (self.key)(e)
    }

    pub fn compare(&self, a: &EntryDescriptor, b: &EntryDescriptor) -> Ordering {
        self.key(a).cmp(&self.key(b))
    }

    /// True if the field compares numerically.
    pub fn is_numeric(&self) -> bool {
        matches!(self.field, "size" | "time_created" | "time_modified")
    }
}

/// Parsed high-water value for one field.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Mark {
    Text(String),
    Number(i64),
}

/// Sort order plus optional resume point, built from a [`HighWater`].
#[derive(Clone, Debug)]
pub struct HighWaterOrder {
    sorter: FieldSorter,
    mark: Option<Mark>,
}

impl HighWaterOrder {
    pub fn new(high_water: &HighWater) -> Result<Self> {
        let sorter = FieldSorter::for_field(&high_water.field)?;
        let mark = match &high_water.after {
            None => None,
            Some(value) if sorter.is_numeric() => {
                let n = value
                    .trim()
                    .parse()
                    .map_err(|_| SourceError::InvalidHighWater {
                        field: high_water.field.clone(),
                        value: value.clone(),
                    })?;
                Some(Mark::Number(n))
            }
            Some(value) => Some(Mark::Text(value.clone())),
        };
        Ok(Self { sorter, mark })
    }

    pub fn sorter(&self) -> &FieldSorter {
        &self.sorter
    }

    /// False for entries at or below the resume point.
    pub fn admits(&self, e: &EntryDescriptor) -> bool {
        match (&self.mark, self.sorter.key(e)) {
            (None, _) => true,
            (Some(_), SortKey::Root) => false,
            (Some(Mark::Number(m)), SortKey::Number(n)) => n > *m,
            (Some(Mark::Text(m)), SortKey::Text(t)) => t > m.as_bytes(),
            _ => true,
        }
    }
}
