//! Access-decision machinery
//!
//! The overlay and the primary checker share one contract: `Ok(())` allows,
//! `Error::AccessDenied` denies, anything else is a fault. The overlay is
//! itself an [`AccessChecker`], so it substitutes transparently for the
//! checker it wraps.

mod delegate;
mod elevate;
mod overlay;
mod posix;
mod request;
mod reserved;

pub use delegate::{Delegation, DelegationResolver};
pub use elevate::ElevationGuard;
pub use overlay::OverlayChecker;
pub use posix::PosixChecker;
pub use request::{resolve_chain, AccessRequest};
pub use reserved::ReservedPaths;

use crate::error::Result;
use crate::namespace::NodeAccess;

/// Decision contract shared by the overlay and the wrapped primary checker
pub trait AccessChecker: Send + Sync {
    /// Decide an access request. `Ok(())` allows; `Error::AccessDenied`
    /// denies; any other error is a fault, never an implicit grant.
    fn check(&self, ns: &dyn NodeAccess, request: &AccessRequest) -> Result<()>;
}
