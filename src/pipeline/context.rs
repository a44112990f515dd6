//! Traversal context shared by both record producers: root, filters, sort order, converter.

use log::debug;
use std::path::{Path, PathBuf};

use crate::engine::convert::DocumentConverter;
use crate::engine::resolve::resolve_search_path;
use crate::engine::tools::absolute_root;
use crate::utils::config::TreeConsts;
use crate::{HighWater, Result, SourceConfig};

use super::filter::{DepthFilter, NameFilter};
use super::sort::HighWaterOrder;
use super::walk::{EntryKind, Walk, WalkSpec};

/// Immutable per-source state, built once from the configuration. Every call to a
/// producer's `records()` walks afresh from here.
#[derive(Clone, Debug)]
pub struct Traversal {
    root: PathBuf,
    include: NameFilter,
    exclude: NameFilter,
    depth: DepthFilter,
    order: Option<HighWaterOrder>,
    skip_errors: bool,
    converter: DocumentConverter,
    documents: NameFilter,
    not_media: NameFilter,
}

impl Traversal {
    /// Resolve the search path and compile filters. Fails before any filesystem access.
    pub fn from_config(config: &SourceConfig, high_water: Option<&HighWater>) -> Result<Self> {
        let root = resolve_search_path(config)?;
        let mut not_media = vec![TreeConsts::DESCRIPTION_FILENAME, TreeConsts::THUMBNAIL_CACHE];
        not_media.extend(TreeConsts::DOCS_PATTERNS);
        let traversal = Traversal {
            root: absolute_root(&root),
            include: NameFilter::new(&config.include)?,
            exclude: NameFilter::new(&config.exclude)?,
            depth: DepthFilter::new(&config.depth)?,
            order: high_water.map(HighWaterOrder::new).transpose()?,
            skip_errors: config.skip_errors,
            converter: DocumentConverter::new(config.converter_program()),
            documents: NameFilter::new(&TreeConsts::DOCS_PATTERNS)?,
            not_media: NameFilter::new(&not_media)?,
        };
        debug!("{:#?}", traversal);
        Ok(traversal)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn converter(&self) -> &DocumentConverter {
        &self.converter
    }

    pub fn skip_errors(&self) -> bool {
        self.skip_errors
    }

    /// Walk of `kind` with every configured filter and the sort order.
    pub fn walk(&self, kind: EntryKind) -> Walk {
        WalkSpec {
            root: self.root.clone(),
            kind,
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            depth: self.depth.clone(),
            order: self.order.clone(),
            skip_errors: self.skip_errors,
        }
        .walk()
    }

    /// Walk over loose documents: document patterns, configured depth and sort order only.
    pub fn documents_walk(&self) -> Walk {
        WalkSpec {
            include: self.documents.clone(),
            depth: self.depth.clone(),
            order: self.order.clone(),
            skip_errors: self.skip_errors,
            ..WalkSpec::new(self.root.clone(), EntryKind::Files)
        }
        .walk()
    }

    /// Files directly inside `dir` that count as media: no description file, thumbnail
    /// cache or document. Sorted by name.
    pub fn media_walk(&self, dir: &Path) -> Result<Walk> {
        Ok(WalkSpec {
            exclude: self.not_media.clone(),
            depth: DepthFilter::top_level(),
            order: Some(HighWaterOrder::new(&HighWater::new("name"))?),
            skip_errors: self.skip_errors,
            ..WalkSpec::new(dir, EntryKind::Files)
        }
        .walk())
    }
}
