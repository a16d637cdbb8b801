//! In-process namespace store
//!
//! Path-keyed stand-in for the host namespace service. The overlay itself
//! only talks to `dyn NodeAccess`; this implementation backs the mutation
//! event consumers and the test suites.

use crate::error::{Error, Result};
use crate::namespace::{AclEntry, FileMode, NamespaceNode, NodeAccess};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct NodeData {
    owner: String,
    group: String,
    mode: FileMode,
    is_dir: bool,
    acl: Vec<AclEntry>,
}

/// In-memory namespace backed by a path-keyed map
pub struct MemoryNamespace {
    nodes: RwLock<HashMap<PathBuf, NodeData>>,
}

impl MemoryNamespace {
    /// Create a namespace holding only the root directory
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            PathBuf::from("/"),
            NodeData {
                owner: "root".to_string(),
                group: "supergroup".to_string(),
                mode: FileMode::new(0o755),
                is_dir: true,
                acl: Vec::new(),
            },
        );
        MemoryNamespace {
            nodes: RwLock::new(nodes),
        }
    }

    /// Add a directory node. The parent must already exist.
    pub fn add_directory(&self, path: &Path, owner: &str, group: &str, mode: FileMode) -> Result<()> {
        self.add_node(path, owner, group, mode, true)
    }

    /// Add a file node. The parent must already exist.
    pub fn add_file(&self, path: &Path, owner: &str, group: &str, mode: FileMode) -> Result<()> {
        self.add_node(path, owner, group, mode, false)
    }

    /// Remove the node at `path` together with its subtree
    pub fn remove(&self, path: &Path) -> Result<()> {
        let mut nodes = self.nodes.write();
        if !nodes.contains_key(path) {
            return Err(Error::NodeNotFound(path.to_path_buf()));
        }
        nodes.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn add_node(&self, path: &Path, owner: &str, group: &str, mode: FileMode, is_dir: bool) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::NodeNotFound(path.to_path_buf()))?;
        let mut nodes = self.nodes.write();
        if !nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent.to_path_buf()));
        }
        nodes.insert(
            path.to_path_buf(),
            NodeData {
                owner: owner.to_string(),
                group: group.to_string(),
                mode,
                is_dir,
                acl: Vec::new(),
            },
        );
        Ok(())
    }

    fn with_node<T>(&self, path: &Path, f: impl FnOnce(&NodeData) -> T) -> Result<T> {
        let nodes = self.nodes.read();
        nodes
            .get(path)
            .map(f)
            .ok_or_else(|| Error::NodeNotFound(path.to_path_buf()))
    }

    fn with_node_mut<T>(&self, path: &Path, f: impl FnOnce(&mut NodeData) -> T) -> Result<T> {
        let mut nodes = self.nodes.write();
        nodes
            .get_mut(path)
            .map(f)
            .ok_or_else(|| Error::NodeNotFound(path.to_path_buf()))
    }
}

impl NodeAccess for MemoryNamespace {
    fn exists(&self, path: &Path) -> bool {
        self.nodes.read().contains_key(path)
    }

    fn node(&self, path: &Path) -> Result<NamespaceNode> {
        self.with_node(path, |data| NamespaceNode {
            path: path.to_path_buf(),
            owner: data.owner.clone(),
            group: data.group.clone(),
            mode: data.mode,
            is_dir: data.is_dir,
        })
    }

    fn is_directory(&self, path: &Path) -> Result<bool> {
        self.with_node(path, |data| data.is_dir)
    }

    fn mode(&self, path: &Path) -> Result<FileMode> {
        self.with_node(path, |data| data.mode)
    }

    fn set_mode(&self, path: &Path, mode: FileMode) -> Result<()> {
        self.with_node_mut(path, |data| data.mode = mode)
    }

    fn set_owner(&self, path: &Path, owner: &str, group: &str) -> Result<()> {
        self.with_node_mut(path, |data| {
            data.owner = owner.to_string();
            data.group = group.to_string();
        })
    }

    fn acl_entries(&self, path: &Path) -> Result<Vec<AclEntry>> {
        self.with_node(path, |data| data.acl.clone())
    }

    fn set_acl_entries(&self, path: &Path, entries: &[AclEntry]) -> Result<()> {
        self.with_node_mut(path, |data| {
            for entry in entries {
                // at most one ACCESS entry per (kind, name): replace in place
                match data.acl.iter_mut().find(|e| e.key() == entry.key()) {
                    Some(existing) => *existing = entry.clone(),
                    None => data.acl.push(entry.clone()),
                }
            }
        })
    }

    fn remove_acl_entries(&self, path: &Path, entries: &[AclEntry]) -> Result<()> {
        self.with_node_mut(path, |data| {
            data.acl
                .retain(|stored| !entries.iter().any(|e| e.key() == stored.key()));
        })
    }

    fn children(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !self.is_directory(path)? {
            return Err(Error::NotADirectory(path.to_path_buf()));
        }
        let nodes = self.nodes.read();
        let mut children: Vec<PathBuf> = nodes
            .keys()
            .filter(|p| p.parent() == Some(path) && p.as_path() != path)
            .cloned()
            .collect();
        children.sort();
        Ok(children)
    }
}

impl Default for MemoryNamespace {
    fn default() -> Self {
        Self::new()
    }
}
