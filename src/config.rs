//! Configuration for the authorization overlay
//!
//! Loaded once at process start and treated as immutable thereafter.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default probe bit: other-execute marks a directory as traversable
pub const DEFAULT_TRAVERSAL_BIT: u16 = 0o001;

/// Default widening applied during elevation: other read+execute
pub const DEFAULT_ELEVATION_BITS: u16 = 0o005;

/// Default mode stamped on a subtree after a creation event
pub const DEFAULT_CREATION_MODE: u16 = 0o771;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Exact paths managed by the overlay
    pub reserved_paths: Vec<PathBuf>,

    /// Path prefixes managed by the overlay
    pub reserved_prefixes: Vec<PathBuf>,

    /// Root-level paths that must never grant access through
    /// parent-ACL delegation
    pub protected_roots: Vec<PathBuf>,

    /// Directory traversal probe bit
    #[serde(with = "octal_serde")]
    pub traversal_bit: u16,

    /// Bits ORed into a directory's mode while a delegated check runs
    #[serde(with = "octal_serde")]
    pub elevation_bits: u16,

    /// Mode applied by ownership propagation after creation events
    #[serde(with = "octal_serde")]
    pub creation_mode: u16,

    /// How far propagation reapplies the creation mode
    pub propagation_policy: ModePolicy,
}

/// Mode reapplication policy for recursive ownership propagation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModePolicy {
    /// Force the mode on the propagation root only; descendants keep theirs
    RootOnly,
    /// Force the same mode on every descendant
    Uniform,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            reserved_paths: Vec::new(),
            reserved_prefixes: vec![
                PathBuf::from("/project"),
                PathBuf::from("/user/hive/warehouse"),
            ],
            protected_roots: vec![
                PathBuf::from("/"),
                PathBuf::from("/project"),
                PathBuf::from("/user"),
                PathBuf::from("/tmp"),
            ],
            traversal_bit: DEFAULT_TRAVERSAL_BIT,
            elevation_bits: DEFAULT_ELEVATION_BITS,
            creation_mode: DEFAULT_CREATION_MODE,
            propagation_policy: ModePolicy::RootOnly,
        }
    }
}

impl OverlayConfig {
    /// Load configuration from a file, with environment variable overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: OverlayConfig = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        config.apply_env_overrides();

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(prefixes) = std::env::var("NSGUARD_RESERVED_PREFIXES") {
            let parsed: Vec<PathBuf> = prefixes
                .split(':')
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect();
            if !parsed.is_empty() {
                self.reserved_prefixes = parsed;
            }
        }

        if let Ok(bits) = std::env::var("NSGUARD_ELEVATION_BITS") {
            match u16::from_str_radix(bits.trim(), 8) {
                Ok(value) => self.elevation_bits = value,
                Err(e) => warn!(
                    value = %bits,
                    "ignoring malformed NSGUARD_ELEVATION_BITS: {}", e
                ),
            }
        }

        if let Ok(mode) = std::env::var("NSGUARD_CREATION_MODE") {
            match u16::from_str_radix(mode.trim(), 8) {
                Ok(value) => self.creation_mode = value,
                Err(e) => warn!(
                    value = %mode,
                    "ignoring malformed NSGUARD_CREATION_MODE: {}", e
                ),
            }
        }
    }

    /// Save configuration to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.reserved_paths.is_empty() && self.reserved_prefixes.is_empty() {
            return Err(Error::InvalidConfig(
                "At least one reserved path or prefix is required".to_string(),
            ));
        }

        if self.protected_roots.is_empty() {
            return Err(Error::InvalidConfig(
                "Protected root set must not be empty".to_string(),
            ));
        }

        for (name, bits) in [
            ("traversal_bit", self.traversal_bit),
            ("elevation_bits", self.elevation_bits),
            ("creation_mode", self.creation_mode),
        ] {
            if bits > 0o777 {
                return Err(Error::InvalidConfig(format!(
                    "{} exceeds the nine permission bits: {:o}",
                    name, bits
                )));
            }
        }

        if self.traversal_bit == 0 {
            return Err(Error::InvalidConfig(
                "Traversal probe bit must not be zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Octal serialization for permission bit words
mod octal_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bits: &u16, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:03o}", bits))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u16, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        u16::from_str_radix(&s, 8).map_err(serde::de::Error::custom)
    }
}
