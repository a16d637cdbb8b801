//! Access request construction and ancestor resolution
//!
//! A request carries the caller's identity, the requested rwx bits, the
//! auxiliary flags of the primary check call, and the ordered ancestor
//! chain from the namespace root down to the target. Requests are built
//! per call and discarded after the decision.

use crate::error::{Error, Result};
use crate::namespace::{AccessMode, NodeAccess};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One access request against the namespace
#[derive(Debug, Clone)]
pub struct AccessRequest {
    /// Requesting user
    pub user: String,
    /// Resolved group memberships of the requesting user
    pub groups: HashSet<String>,
    /// Requested rwx bits on the target
    pub access: AccessMode,
    /// Ancestor chain, root first; `None` marks an unresolved component
    pub chain: Vec<Option<PathBuf>>,
    /// Require the caller to own the target
    pub check_owner: bool,
    /// Access required on the deepest resolved ancestor
    pub ancestor_access: Option<AccessMode>,
    /// Access required on the target's parent
    pub parent_access: Option<AccessMode>,
    /// Access required on every directory below the target
    pub sub_access: Option<AccessMode>,
    /// Skip the sub-access check for empty directories
    pub ignore_empty_dir: bool,
}

impl AccessRequest {
    /// Create a request over an already-resolved ancestor chain
    pub fn new(
        user: &str,
        groups: &[&str],
        access: AccessMode,
        chain: Vec<Option<PathBuf>>,
    ) -> Self {
        AccessRequest {
            user: user.to_string(),
            groups: groups.iter().map(|g| g.to_string()).collect(),
            access,
            chain,
            check_owner: false,
            ancestor_access: None,
            parent_access: None,
            sub_access: None,
            ignore_empty_dir: false,
        }
    }

    /// Create a request for a target path, resolving the ancestor chain
    /// against the namespace
    pub fn for_path(
        ns: &dyn NodeAccess,
        user: &str,
        groups: &[&str],
        access: AccessMode,
        path: &Path,
    ) -> Self {
        Self::new(user, groups, access, resolve_chain(ns, path))
    }

    /// The decision target: the deepest resolved node in the chain.
    /// An entirely-unresolved chain fails closed.
    pub fn target(&self) -> Result<&Path> {
        self.chain
            .iter()
            .rev()
            .flatten()
            .next()
            .map(PathBuf::as_path)
            .ok_or(Error::UnresolvedTarget)
    }
}

/// Build the ancestor chain for a path, root first. Components that do not
/// resolve to a live node are kept as `None` so positional checks (parent,
/// ancestor) still line up.
pub fn resolve_chain(ns: &dyn NodeAccess, path: &Path) -> Vec<Option<PathBuf>> {
    let mut chain: Vec<Option<PathBuf>> = path
        .ancestors()
        .map(|p| {
            if ns.exists(p) {
                Some(p.to_path_buf())
            } else {
                None
            }
        })
        .collect();
    chain.reverse();
    chain
}
