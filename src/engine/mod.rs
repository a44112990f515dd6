//! Engine module: path resolution, document conversion, path tools and the CLI

pub mod arg_parser;
pub mod convert;
pub mod handlers;
pub mod progress;
pub mod resolve;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::{Cli, Commands, Mode, SourceArgs};
pub use convert::{Converted, DocumentConverter};
pub use handlers::{apply_args_to_config, handle_run};
pub use resolve::resolve_search_path;
pub use tools::{
    absolute_root, is_dot_entry, parent_path_of, path_relative_to, path_to_record_string,
    split_file_name, unix_seconds, weight_from_name,
};
