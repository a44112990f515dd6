//! Load the `[source]` table of a TOML config file (CLI only). The library takes a
//! [`SourceConfig`] directly from the consuming program.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::SourceConfig;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SourceToml {
    #[serde(default)]
    pub(crate) source: SourceConfig,
}

/// Load an explicitly named config file. Missing or malformed files are errors.
pub(crate) fn load_source_toml(path: &Path) -> Result<SourceToml> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse config file {}", path.display()))
}

/// Load `.dirsource.toml` from `dir` if present. Returns None if missing or unreadable.
pub(crate) fn load_default_source_toml(dir: &Path) -> Option<SourceToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    toml::from_str(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}
