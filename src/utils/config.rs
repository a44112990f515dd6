//! Application configuration constants.
//! Filenames, patterns and limits in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Config file looked up in the working directory when `--config` is not given.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Tree mode conventions ----

/// Tree-mode filenames and patterns.
pub struct TreeConsts;

impl TreeConsts {
    /// The contents of this file, inside a directory, become the directory's description.
    pub const DESCRIPTION_FILENAME: &'static str = "(0).docx";
    /// Windows thumbnail cache; never treated as media.
    pub const THUMBNAIL_CACHE: &'static str = "Thumbs.db";
    /// Loose documents picked up by the second pass. Never treated as media.
    pub const DOCS_PATTERNS: [&'static str; 3] = ["*.docx", "*.txt", "*.rtf"];
    /// Document extensions that go through the converter; other documents are read as text.
    pub const CONVERTIBLE_EXTENSIONS: [&'static str; 2] = ["docx", "rtf"];
    /// Content of a standalone document record whose conversion failed.
    pub const IMPORT_ERROR_MESSAGE: &'static str = "Data import error!  File corrupted.";
}

// ---- Weights ----

/// Lowest display weight the import target accepts. Derived weights are offsets from it,
/// so they order before any record without a weight.
pub const WEIGHT_FLOOR: i64 = -10_000;

// ---- Identifiers ----

/// Max byte length of the `path` identifier in the import target.
pub const ID_MAX_LENGTH: usize = 255;

// ---- Converter ----

/// Default document converter. Invoked as `<tool> <input> -t html5`.
pub const DEFAULT_CONVERTER: &str = "pandoc";

/// Output format requested from the converter.
pub const CONVERTER_TARGET_FORMAT: &str = "html5";
