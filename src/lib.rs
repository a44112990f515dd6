//! dirsource: walk a directory tree and stream records for bulk import.
//!
//! Two producers share one [`Traversal`](pipeline::Traversal):
//! - [`FileSource`]: one [`FileRecord`] per file.
//! - [`TreeSource`]: one [`TreeRecord`] per non-empty directory (description, media, weight),
//!   then one per loose `.docx` / `.txt` / `.rtf` document.
//!
//! Records are produced lazily; each call to `records()` starts a fresh walk.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::SourceError;
pub use pipeline::{FileRecords, FileSource, TreeRecords, TreeSource};

/// Result alias used by public dirsource API
pub type Result<T> = std::result::Result<T, SourceError>;

/// Stream flat file records for `config`. Pass `high_water` to sort (and optionally resume).
///
/// ```ignore
/// let config = dirsource::SourceConfig { path: Some("photos".into()), ..Default::default() };
/// let source = dirsource::file_source(&config, None)?;
/// for record in source.records() {
///     println!("{}", record?.path);
/// }
/// ```
pub fn file_source(config: &SourceConfig, high_water: Option<&HighWater>) -> Result<FileSource> {
    FileSource::new(config, high_water)
}

/// Stream tree records for `config`. See [`file_source`].
pub fn tree_source(config: &SourceConfig, high_water: Option<&HighWater>) -> Result<TreeSource> {
    TreeSource::new(config, high_water)
}
