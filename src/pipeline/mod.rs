//! Pipeline components: traversal context, filtered walk, sorting, and the two record producers.

pub mod context;
pub mod error_handler;
pub mod files;
pub mod filter;
mod id_check;
pub mod sort;
pub mod tree;
pub mod walk;

pub use context::Traversal;
pub use error_handler::report_skipped_paths;
pub use files::{FileRecords, FileSource};
pub use filter::{DepthBound, DepthFilter, NameFilter, NamePattern};
pub use sort::{FieldSorter, HighWaterOrder, SortKey};
pub use tree::{TreeRecords, TreeSource};
pub use walk::{EntryKind, Walk, WalkSpec, describe};
