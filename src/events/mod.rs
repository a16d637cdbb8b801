//! Mutation-event consumers
//!
//! Namespace mutations (object creation, rename) arrive as events with
//! before/after snapshots, not as request/response calls. The handler
//! stamps ownership onto created subtrees and carries ACL grants across
//! renames. Handling runs on the event-delivery thread and blocks it.

mod migrate;
mod propagate;

pub use migrate::AclMigration;
pub use propagate::OwnershipPropagator;

use crate::config::{ModePolicy, OverlayConfig};
use crate::error::Result;
use crate::namespace::{FileMode, NodeAccess};
use std::path::PathBuf;
use tracing::warn;

/// A namespace mutation delivered by the host's event stream
#[derive(Debug, Clone)]
pub enum MutationEvent {
    /// An object was created at `path` on behalf of `owner`
    Created {
        path: PathBuf,
        owner: String,
        group: String,
    },
    /// An object moved from `old_path` to `new_path`
    Renamed {
        old_path: PathBuf,
        new_path: PathBuf,
        owner: String,
        group: String,
    },
}

/// Dispatches mutation events to the propagator and the ACL migration
pub struct EventHandler {
    propagator: OwnershipPropagator,
    migration: AclMigration,
    creation_mode: FileMode,
    policy: ModePolicy,
}

impl EventHandler {
    pub fn new(config: &OverlayConfig) -> Self {
        EventHandler {
            propagator: OwnershipPropagator::new(),
            migration: AclMigration::new(),
            creation_mode: FileMode::new(config.creation_mode),
            policy: config.propagation_policy,
        }
    }

    /// Handle one event. Failures surface to the caller, which decides
    /// whether the triggering namespace operation is fatal.
    pub fn handle(&self, ns: &dyn NodeAccess, event: &MutationEvent) -> Result<()> {
        match event {
            MutationEvent::Created { path, owner, group } => {
                if owner.is_empty() || group.is_empty() {
                    warn!(path = %path.display(), "creation event without owner or group, ignored");
                    return Ok(());
                }
                self.propagator
                    .apply(ns, path, owner, group, self.creation_mode, self.policy)?;
                Ok(())
            }
            MutationEvent::Renamed {
                old_path,
                new_path,
                owner,
                group,
            } => {
                if !owner.is_empty() && !group.is_empty() {
                    self.propagator
                        .apply(ns, new_path, owner, group, self.creation_mode, self.policy)?;
                }
                self.migration.migrate(ns, old_path, new_path)?;
                Ok(())
            }
        }
    }
}
