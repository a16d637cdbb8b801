//! Namespace node access primitives
//!
//! The namespace tree is owned and mutated by the host store; the overlay
//! only sees it through the [`NodeAccess`] trait. Parent links are a weak
//! back-reference resolved by lookup, never ownership.

use crate::error::Result;
use crate::namespace::{AclEntry, FileMode};
use std::path::{Path, PathBuf};

/// Read snapshot of one namespace entry
#[derive(Debug, Clone)]
pub struct NamespaceNode {
    /// Full path from the namespace root
    pub path: PathBuf,
    /// Owning user
    pub owner: String,
    /// Owning group
    pub group: String,
    /// Nine-bit mode word
    pub mode: FileMode,
    /// Directory flag
    pub is_dir: bool,
}

/// Read/write primitives over path-addressed namespace nodes
pub trait NodeAccess: Send + Sync {
    /// Whether a node exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Snapshot the node at `path`
    fn node(&self, path: &Path) -> Result<NamespaceNode>;

    /// Whether the node at `path` is a directory
    fn is_directory(&self, path: &Path) -> Result<bool>;

    /// Current mode word of the node at `path`
    fn mode(&self, path: &Path) -> Result<FileMode>;

    /// Replace the mode word of the node at `path`
    fn set_mode(&self, path: &Path, mode: FileMode) -> Result<()>;

    /// Replace owner and group of the node at `path`
    fn set_owner(&self, path: &Path, owner: &str, group: &str) -> Result<()>;

    /// ACL entries of the node at `path`, in stored order
    fn acl_entries(&self, path: &Path) -> Result<Vec<AclEntry>>;

    /// Upsert ACL entries on the node at `path`. An incoming entry replaces
    /// any stored entry with the same (scope, kind, name) key in place;
    /// unmatched entries append in the given order.
    fn set_acl_entries(&self, path: &Path, entries: &[AclEntry]) -> Result<()>;

    /// Remove stored entries whose (scope, kind, name) key matches any of
    /// the given entries. Missing entries are not an error.
    fn remove_acl_entries(&self, path: &Path, entries: &[AclEntry]) -> Result<()>;

    /// Paths of the immediate children of the directory at `path`
    fn children(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Parent path, or `None` at the namespace root
    fn parent(&self, path: &Path) -> Option<PathBuf> {
        path.parent().map(Path::to_path_buf)
    }
}
