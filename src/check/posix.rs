//! Primary owner/group/mode + ACL checker
//!
//! A plain POSIX-style permission model usable as the wrapped checker
//! behind the overlay. The overlay treats the primary model as opaque;
//! this implementation exists so the crate works against an in-process
//! namespace and in tests without a live host service.

use crate::check::{AccessChecker, AccessRequest};
use crate::error::{Error, Result};
use crate::namespace::{AccessMode, AclEntryKind, NodeAccess};
use std::path::Path;
use tracing::debug;

/// Stateless primary permission checker
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixChecker;

impl PosixChecker {
    pub fn new() -> Self {
        PosixChecker
    }

    /// Effective rwx bits the node extends to the requesting principal.
    /// Owner class wins outright; a named ACCESS entry for the user or one
    /// of their groups widens the group class, masked by the group bits;
    /// otherwise the owning-group or other class applies.
    fn effective_access(
        &self,
        ns: &dyn NodeAccess,
        path: &Path,
        request: &AccessRequest,
    ) -> Result<AccessMode> {
        let node = ns.node(path)?;
        if node.owner == request.user {
            return Ok(node.mode.owner_bits());
        }

        let mask = node.mode.group_bits();
        for entry in ns.acl_entries(path)? {
            if !entry.is_access() {
                continue;
            }
            let matched = match entry.kind {
                AclEntryKind::User => entry.name == request.user,
                AclEntryKind::Group => request.groups.contains(&entry.name),
                _ => false,
            };
            if matched {
                return Ok(mask.mask(entry.permission));
            }
        }

        if request.groups.contains(&node.group) {
            return Ok(mask);
        }
        Ok(node.mode.other_bits())
    }

    fn require(
        &self,
        ns: &dyn NodeAccess,
        path: &Path,
        request: &AccessRequest,
        access: AccessMode,
    ) -> Result<()> {
        let effective = self.effective_access(ns, path, request)?;
        if effective.implies(access) {
            Ok(())
        } else {
            Err(Error::denied(&request.user, path, access))
        }
    }

    /// Check `access` on every directory at or below `path`, depth-first
    fn require_subtree(
        &self,
        ns: &dyn NodeAccess,
        path: &Path,
        request: &AccessRequest,
        access: AccessMode,
    ) -> Result<()> {
        let mut stack = vec![path.to_path_buf()];
        while let Some(current) = stack.pop() {
            if !ns.is_directory(&current)? {
                continue;
            }
            let children = ns.children(&current)?;
            if children.is_empty() && request.ignore_empty_dir {
                continue;
            }
            self.require(ns, &current, request, access)?;
            stack.extend(children);
        }
        Ok(())
    }
}

impl AccessChecker for PosixChecker {
    fn check(&self, ns: &dyn NodeAccess, request: &AccessRequest) -> Result<()> {
        let target_index = request
            .chain
            .iter()
            .rposition(|entry| entry.is_some())
            .ok_or(Error::UnresolvedTarget)?;
        let target = request.chain[target_index]
            .as_deref()
            .ok_or(Error::UnresolvedTarget)?;

        debug!(user = %request.user, path = %target.display(), access = %request.access, "primary check");

        // traversal: execute on every resolved directory above the target
        for ancestor in request.chain[..target_index].iter().flatten() {
            if ns.is_directory(ancestor)? {
                self.require(ns, ancestor, request, AccessMode::EXECUTE)?;
            }
        }

        if request.check_owner {
            let node = ns.node(target)?;
            if node.owner != request.user {
                return Err(Error::denied(&request.user, target, request.access));
            }
        }

        if let Some(access) = request.ancestor_access {
            if let Some(ancestor) = request.chain[..target_index].iter().flatten().last() {
                self.require(ns, ancestor, request, access)?;
            }
        }

        if let Some(access) = request.parent_access {
            if target_index > 0 {
                if let Some(parent) = request.chain[target_index - 1].as_deref() {
                    self.require(ns, parent, request, access)?;
                }
            }
        }

        if !request.access.is_empty() {
            self.require(ns, target, request, request.access)?;
        }

        if let Some(access) = request.sub_access {
            self.require_subtree(ns, target, request, access)?;
        }

        Ok(())
    }
}
