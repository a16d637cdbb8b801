//! Namespace node model
//!
//! Permission bits, ACL entries, and the node-access seam between the
//! overlay and the host namespace store.

mod acl;
mod memory;
mod mode;
mod node;

pub use acl::{AclEntry, AclEntryKind, AclScope};
pub use memory::MemoryNamespace;
pub use mode::{AccessMode, FileMode};
pub use node::{NamespaceNode, NodeAccess};
