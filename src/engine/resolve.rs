//! Search path resolution: `path_env` (environment indirection) wins over `path`.

use log::debug;
use std::path::PathBuf;

use crate::error::SourceError;
use crate::{Result, SourceConfig};

/// Resolve the root search path from `config`. Reads the environment only; touches no files.
pub fn resolve_search_path(config: &SourceConfig) -> Result<PathBuf> {
    if let Some(var) = &config.path_env {
        let value = std::env::var_os(var).filter(|v| !v.is_empty());
        return match value {
            Some(v) => {
                debug!("Search path from ${var}");
                Ok(PathBuf::from(v))
            }
            None => Err(SourceError::Requirements(format!(
                "The environment variable {var} is empty."
            ))),
        };
    }
    if let Some(path) = &config.path {
        return Ok(path.clone());
    }
    Err(SourceError::Requirements(
        "One of path or path_env must be set in the source configuration.".to_string(),
    ))
}
