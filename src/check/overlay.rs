//! Overlay decision state machine
//!
//! Wraps a primary checker and overrides its decisions only for reserved
//! paths: an explicit parent-ACL grant or denial is terminal; otherwise
//! the primary checker runs, with the target directory's mode temporarily
//! widened so the primary model can traverse into it.

use crate::check::delegate::{Delegation, DelegationResolver};
use crate::check::elevate::ElevationGuard;
use crate::check::reserved::ReservedPaths;
use crate::check::{AccessChecker, AccessRequest};
use crate::config::OverlayConfig;
use crate::error::{Error, Result};
use crate::namespace::NodeAccess;
use tracing::debug;

/// Access-decision overlay over a wrapped primary checker
pub struct OverlayChecker {
    inner: Box<dyn AccessChecker>,
    reserved: ReservedPaths,
    delegation: DelegationResolver,
    traversal_bit: u16,
    elevation_bits: u16,
}

impl OverlayChecker {
    /// Wrap a primary checker with the overlay configured from `config`.
    /// The wrapped checker is an explicit dependency; the overlay holds no
    /// global state.
    pub fn new(inner: Box<dyn AccessChecker>, config: &OverlayConfig) -> Self {
        OverlayChecker {
            inner,
            reserved: ReservedPaths::from_config(config),
            delegation: DelegationResolver::new(config.protected_roots.clone()),
            traversal_bit: config.traversal_bit,
            elevation_bits: config.elevation_bits,
        }
    }
}

impl AccessChecker for OverlayChecker {
    fn check(&self, ns: &dyn NodeAccess, request: &AccessRequest) -> Result<()> {
        // an entirely-unresolved chain is an internal fault, never a grant
        let target = request.target()?;

        if !self.reserved.is_reserved(target) {
            // pure pass-through, identical to calling the inner checker
            return self.inner.check(ns, request);
        }

        let mode = ns.mode(target)?;
        debug!(
            path = %target.display(),
            mode = %mode,
            user = %request.user,
            access = %request.access,
            "overlay check on reserved path"
        );

        match self.delegation.resolve(ns, &request.user, &request.groups, target, request.access)? {
            Delegation::Allow => return Ok(()),
            Delegation::Deny => {
                return Err(Error::denied(&request.user, target, request.access));
            }
            Delegation::NoMatch => {}
        }

        if ns.is_directory(target)? && mode.has_any(self.traversal_bit) {
            let guard = ElevationGuard::widen(ns, target, self.elevation_bits)?;
            match self.inner.check(ns, request) {
                // surface a restore failure on the success path
                Ok(()) => guard.restore(),
                // re-raise the inner decision unchanged; the guard's drop
                // restores the original mode
                Err(e) => {
                    drop(guard);
                    Err(e)
                }
            }
        } else {
            self.inner.check(ns, request)
        }
    }
}
