//! ACL migration between two namespace locations
//!
//! After a rename, ACCESS-scope entries granted on the old location follow
//! the data to the new one. The two halves are not one transaction: the
//! entries are set on the new path before removal from the old, so a crash
//! in between leaves the grant duplicated rather than lost. Both halves
//! are idempotent, so re-running a partially-applied migration converges.

use crate::error::Result;
use crate::namespace::{AclEntry, NodeAccess};
use std::path::Path;
use tracing::{info, warn};

/// Moves ACCESS-scope ACL entries between locations
#[derive(Debug, Clone, Copy, Default)]
pub struct AclMigration;

impl AclMigration {
    pub fn new() -> Self {
        AclMigration
    }

    /// Move the old path's ACCESS entries to the new path verbatim.
    /// No-op when the paths are equal, either is missing, or the old path
    /// carries no ACCESS entries. Returns the number of entries moved.
    pub fn migrate(&self, ns: &dyn NodeAccess, old: &Path, new: &Path) -> Result<usize> {
        if old == new {
            return Ok(0);
        }
        if !ns.exists(old) || !ns.exists(new) {
            warn!(
                old = %old.display(),
                new = %new.display(),
                "acl migration skipped, endpoint missing"
            );
            return Ok(0);
        }

        let entries: Vec<AclEntry> = ns
            .acl_entries(old)?
            .into_iter()
            .filter(AclEntry::is_access)
            .collect();
        if entries.is_empty() {
            return Ok(0);
        }

        // set-then-remove: the crash window duplicates, never loses
        ns.set_acl_entries(new, &entries)?;
        ns.remove_acl_entries(old, &entries)?;

        info!(
            old = %old.display(),
            new = %new.display(),
            moved = entries.len(),
            "migrated acl entries"
        );
        Ok(entries.len())
    }
}
