//! Reserved path classification
//!
//! Decides whether a path is managed by the overlay or passes straight
//! through to the primary checker. Built once from config, never mutated.

use crate::config::OverlayConfig;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Exact and prefix reserved-path sets
#[derive(Debug, Clone)]
pub struct ReservedPaths {
    exact: HashSet<PathBuf>,
    prefixes: Vec<PathBuf>,
}

impl ReservedPaths {
    /// Build from explicit sets
    pub fn new(exact: Vec<PathBuf>, prefixes: Vec<PathBuf>) -> Self {
        ReservedPaths {
            exact: exact.into_iter().collect(),
            prefixes,
        }
    }

    /// Build from the overlay configuration
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(
            config.reserved_paths.clone(),
            config.reserved_prefixes.clone(),
        )
    }

    /// Whether the overlay manages this path.
    ///
    /// Prefix matching is component-based: `/user/hive/warehouse` matches
    /// itself and anything below it, but not `/user/hive/warehouse2`.
    pub fn is_reserved(&self, path: &Path) -> bool {
        if self.exact.contains(path) {
            return true;
        }
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }
}
