//! Scoped permission elevation
//!
//! Temporarily widens a directory's mode so a delegated check can traverse
//! into it, then restores the original word. Restoration is tied to the
//! guard's drop, so it runs on every exit path of the enclosing check.
//!
//! The guard is non-reentrant per node: overlapping elevations of the same
//! directory require the host to serialize checks on that node.

use crate::error::Result;
use crate::namespace::{FileMode, NodeAccess};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// RAII guard holding a widened mode on one directory
pub struct ElevationGuard<'a> {
    ns: &'a dyn NodeAccess,
    path: PathBuf,
    original: FileMode,
    restored: bool,
}

impl<'a> ElevationGuard<'a> {
    /// Widen the node's mode by `widen_bits` until the guard is released
    pub fn widen(ns: &'a dyn NodeAccess, path: &Path, widen_bits: u16) -> Result<Self> {
        let original = ns.mode(path)?;
        let elevated = original.widen(widen_bits);
        ns.set_mode(path, elevated)?;
        debug!(
            path = %path.display(),
            original = %original,
            elevated = %elevated,
            "elevated directory mode"
        );
        Ok(ElevationGuard {
            ns,
            path: path.to_path_buf(),
            original,
            restored: false,
        })
    }

    /// The mode the guard will restore
    pub fn original(&self) -> FileMode {
        self.original
    }

    /// Restore eagerly, surfacing any store failure to the caller
    pub fn restore(mut self) -> Result<()> {
        self.restored = true;
        self.ns.set_mode(&self.path, self.original)
    }
}

impl Drop for ElevationGuard<'_> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.ns.set_mode(&self.path, self.original) {
            // nothing left to propagate to; the caller is already unwinding
            error!(
                path = %self.path.display(),
                original = %self.original,
                "failed to restore mode after elevation: {}",
                e
            );
        }
    }
}
