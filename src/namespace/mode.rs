//! Permission bit arithmetic for namespace nodes
//!
//! A node carries a nine-bit owner/group/other mode word; access checks
//! operate on single rwx triples cut out of that word.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// One rwx permission triple
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AccessMode: u8 {
        const READ = 0b100;
        const WRITE = 0b010;
        const EXECUTE = 0b001;
    }
}

impl AccessMode {
    /// Whether this mode grants everything `requested` asks for.
    /// An empty request is always implied.
    pub fn implies(&self, requested: AccessMode) -> bool {
        self.contains(requested)
    }

    /// Intersection with another triple (ACL masking)
    pub fn mask(&self, other: AccessMode) -> AccessMode {
        *self & other
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            if self.contains(AccessMode::READ) { 'r' } else { '-' },
            if self.contains(AccessMode::WRITE) { 'w' } else { '-' },
            if self.contains(AccessMode::EXECUTE) { 'x' } else { '-' },
        )
    }
}

/// Nine-bit owner/group/other mode word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMode(u16);

impl FileMode {
    /// Create a mode word, truncating anything above the nine permission bits
    pub const fn new(bits: u16) -> Self {
        FileMode(bits & 0o777)
    }

    /// Raw nine-bit value
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Owner rwx triple
    pub fn owner_bits(&self) -> AccessMode {
        AccessMode::from_bits_truncate(((self.0 >> 6) & 0o7) as u8)
    }

    /// Group rwx triple
    pub fn group_bits(&self) -> AccessMode {
        AccessMode::from_bits_truncate(((self.0 >> 3) & 0o7) as u8)
    }

    /// Other rwx triple
    pub fn other_bits(&self) -> AccessMode {
        AccessMode::from_bits_truncate((self.0 & 0o7) as u8)
    }

    /// Union with extra raw bits (used for elevation)
    pub const fn widen(&self, extra: u16) -> FileMode {
        FileMode((self.0 | extra) & 0o777)
    }

    /// Whether any of the given raw bits are set
    pub const fn has_any(&self, bits: u16) -> bool {
        self.0 & bits != 0
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03o}", self.0)
    }
}
