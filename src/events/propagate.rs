//! Recursive ownership propagation
//!
//! After a creation event the new subtree belongs to the creating user and
//! its namespace group. The walk is depth-first with an explicit stack;
//! nodes that vanish mid-walk are skipped, any other failure surfaces to
//! the caller immediately with no rollback of earlier updates.

use crate::config::ModePolicy;
use crate::error::Result;
use crate::namespace::{FileMode, NodeAccess};
use std::path::Path;
use tracing::{info, warn};

/// Applies owner, group and mode across a subtree
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipPropagator;

impl OwnershipPropagator {
    pub fn new() -> Self {
        OwnershipPropagator
    }

    /// Set `owner`/`group` on every node under `root`. The mode is forced
    /// on the root always, and on descendants only under
    /// [`ModePolicy::Uniform`]. Returns the number of nodes updated.
    ///
    /// A missing root or a child removed mid-walk is tolerated; the walk
    /// continues with the remaining nodes. Listing a pathological subtree
    /// blocks the calling thread for its full size.
    pub fn apply(
        &self,
        ns: &dyn NodeAccess,
        root: &Path,
        owner: &str,
        group: &str,
        mode: FileMode,
        policy: ModePolicy,
    ) -> Result<usize> {
        if !ns.exists(root) {
            warn!(path = %root.display(), "propagation root missing, nothing to do");
            return Ok(0);
        }

        let mut stack = vec![root.to_path_buf()];
        let mut updated = 0;

        while let Some(path) = stack.pop() {
            if !ns.exists(&path) {
                warn!(path = %path.display(), "node vanished during propagation, skipping");
                continue;
            }

            ns.set_owner(&path, owner, group)?;
            if policy == ModePolicy::Uniform || path == root {
                ns.set_mode(&path, mode)?;
            }
            updated += 1;

            if ns.is_directory(&path)? {
                stack.extend(ns.children(&path)?);
            }
        }

        info!(
            path = %root.display(),
            owner,
            group,
            mode = %mode,
            updated,
            "propagated ownership"
        );
        Ok(updated)
    }
}
