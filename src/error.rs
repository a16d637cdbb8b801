//! Error types for nsguard

use crate::namespace::AccessMode;
use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the authorization overlay
#[derive(Debug, Error)]
pub enum Error {
    /// The expected negative outcome of an access check, not a fault
    #[error("access denied: user '{user}' requires {access} on {path}")]
    AccessDenied {
        user: String,
        path: PathBuf,
        access: AccessMode,
    },

    /// Every entry in the ancestor chain was unresolved
    #[error("no resolvable node in ancestor chain")]
    UnresolvedTarget,

    /// A node the operation relied on does not exist
    #[error("node not found: {0}")]
    NodeNotFound(PathBuf),

    /// A directory operation was attempted on a non-directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Configuration could not be read or written
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration was read but failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Construct an access-denied outcome for a request
    pub fn denied(user: &str, path: &std::path::Path, access: AccessMode) -> Self {
        Error::AccessDenied {
            user: user.to_string(),
            path: path.to_path_buf(),
            access,
        }
    }

    /// Whether this error is a denial rather than a fault
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Error::AccessDenied { .. })
    }
}
