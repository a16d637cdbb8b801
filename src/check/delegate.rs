//! Parent-ACL delegation
//!
//! Walks upward from a node's parent looking for an ACCESS-scope ACL
//! entry that names the caller's user or one of their groups. The closest
//! ancestor with a matching entry governs; the first matching entry at
//! that level is authoritative, whether it grants or not.

use crate::error::Result;
use crate::namespace::{AccessMode, AclEntryKind, NodeAccess};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of a delegation walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delegation {
    /// A matching entry grants the requested bits
    Allow,
    /// A matching entry exists but its masked permission is insufficient
    Deny,
    /// No applicable entry found up to the namespace root
    NoMatch,
}

/// Resolver over the ancestor ACLs of a node
#[derive(Debug, Clone)]
pub struct DelegationResolver {
    /// Root-level paths that terminate the walk without granting.
    /// Delegation grants at these would amount to privilege escalation
    /// at the namespace root.
    protected_roots: HashSet<PathBuf>,
}

impl DelegationResolver {
    /// Create a resolver with the given protected root set
    pub fn new(protected_roots: Vec<PathBuf>) -> Self {
        DelegationResolver {
            protected_roots: protected_roots.into_iter().collect(),
        }
    }

    /// Resolve the delegation outcome for a request on `node_path`.
    ///
    /// Iterative ancestor walk with an explicit cursor; stack depth stays
    /// constant on arbitrarily deep namespaces. The permission mask is the
    /// ACL-holding ancestor's group bits, so a named grant can never exceed
    /// what the holder's mode extends to its group class.
    pub fn resolve(
        &self,
        ns: &dyn NodeAccess,
        user: &str,
        groups: &HashSet<String>,
        node_path: &Path,
        requested: AccessMode,
    ) -> Result<Delegation> {
        let mut cursor = ns.parent(node_path);

        while let Some(parent) = cursor {
            if self.protected_roots.contains(&parent) {
                debug!(path = %parent.display(), "delegation walk stopped at protected root");
                return Ok(Delegation::NoMatch);
            }
            if !ns.exists(&parent) {
                return Ok(Delegation::NoMatch);
            }

            let mask = ns.mode(&parent)?.group_bits();
            for entry in ns.acl_entries(&parent)? {
                if !entry.is_access() {
                    continue;
                }
                let matched = match entry.kind {
                    AclEntryKind::Group => groups.contains(&entry.name),
                    AclEntryKind::User => entry.name == user,
                    _ => false,
                };
                if !matched {
                    continue;
                }

                // first matching entry at this level is authoritative
                let effective = mask.mask(entry.permission);
                if effective.implies(requested) {
                    info!(
                        user,
                        path = %parent.display(),
                        entry = %entry,
                        requested = %requested,
                        "parent acl grants access"
                    );
                    return Ok(Delegation::Allow);
                }
                debug!(
                    user,
                    path = %parent.display(),
                    entry = %entry,
                    effective = %effective,
                    requested = %requested,
                    "parent acl entry matched but denies"
                );
                return Ok(Delegation::Deny);
            }

            cursor = ns.parent(&parent);
        }

        Ok(Delegation::NoMatch)
    }
}
