//! Access-control entries
//!
//! An ACL entry is a named grant of an rwx triple on a node, distinct from
//! the node's owner/group/mode word. Entries are stored in order; scan
//! order is grant-resolution order.

use crate::namespace::AccessMode;
use std::fmt;

/// Whether an entry applies to the node itself or is inherited by children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclScope {
    /// Applies to accesses on the node itself
    Access,
    /// Inherited default for newly created children
    Default,
}

/// Principal class an entry grants to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclEntryKind {
    User,
    Group,
    Other,
    Mask,
}

/// A single ACL entry on a namespace node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclEntry {
    pub scope: AclScope,
    pub kind: AclEntryKind,
    /// Principal name; empty for Other and Mask entries
    pub name: String,
    pub permission: AccessMode,
}

impl AclEntry {
    /// ACCESS-scope entry granting to a named group
    pub fn access_group(name: &str, permission: AccessMode) -> Self {
        AclEntry {
            scope: AclScope::Access,
            kind: AclEntryKind::Group,
            name: name.to_string(),
            permission,
        }
    }

    /// ACCESS-scope entry granting to a named user
    pub fn access_user(name: &str, permission: AccessMode) -> Self {
        AclEntry {
            scope: AclScope::Access,
            kind: AclEntryKind::User,
            name: name.to_string(),
            permission,
        }
    }

    /// Whether this entry has ACCESS scope
    pub fn is_access(&self) -> bool {
        self.scope == AclScope::Access
    }

    /// Identity under the at-most-one-entry-per-(scope, kind, name) invariant
    pub fn key(&self) -> (AclScope, AclEntryKind, &str) {
        (self.scope, self.kind, self.name.as_str())
    }
}

impl fmt::Display for AclEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self.scope {
            AclScope::Access => "",
            AclScope::Default => "default:",
        };
        let kind = match self.kind {
            AclEntryKind::User => "user",
            AclEntryKind::Group => "group",
            AclEntryKind::Other => "other",
            AclEntryKind::Mask => "mask",
        };
        write!(f, "{}{}:{}:{}", scope, kind, self.name, self.permission)
    }
}
