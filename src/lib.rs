//! nsguard - authorization decision overlay for hierarchical namespaces
//!
//! Wraps a primary owner/group/mode + ACL permission model and overrides
//! its decisions only for specially-managed path prefixes: grants found on
//! ancestor ACLs short-circuit the primary checker, and directory modes
//! are widened for the scope of a single delegated check so the primary
//! model can traverse into children it would otherwise reject.

pub mod check;
pub mod config;
pub mod error;
pub mod events;
pub mod namespace;

pub use config::OverlayConfig;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::check::{AccessChecker, AccessRequest, OverlayChecker, PosixChecker};
    pub use crate::config::{ModePolicy, OverlayConfig};
    pub use crate::error::{Error, Result};
    pub use crate::events::{EventHandler, MutationEvent};
    pub use crate::namespace::{
        AccessMode, AclEntry, FileMode, MemoryNamespace, NamespaceNode, NodeAccess,
    };
}
