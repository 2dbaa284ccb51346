//! Runtime configuration for opening a pets gateway.
//!
//! # Responsibility
//! - Describe where the store lives and which schema version it targets.
//! - Reject configurations that could never open a usable gateway.
//!
//! # Invariants
//! - `schema_version` is at least 1.
//! - `authority` is a non-empty dotted host-like name without `/`.

use crate::contract::{DATABASE_VERSION, DEFAULT_AUTHORITY};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Location of the backing SQLite store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum DatabaseLocation {
    /// Private in-memory store, discarded with the gateway.
    Memory,
    /// Single-file store at the given path.
    File(PathBuf),
}

/// Gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelterConfig {
    /// Authority component of every resource identifier.
    pub authority: String,
    pub database: DatabaseLocation,
    /// Target schema version. Raising it discards all stored records.
    pub schema_version: u32,
    /// SQLite busy timeout applied to the connection.
    pub busy_timeout_ms: u64,
}

impl Default for ShelterConfig {
    fn default() -> Self {
        Self {
            authority: DEFAULT_AUTHORITY.to_string(),
            database: DatabaseLocation::Memory,
            schema_version: DATABASE_VERSION,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl ShelterConfig {
    /// Default configuration backed by an in-memory store.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Default configuration backed by the file at `path`.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseLocation::File(path.into()),
            ..Self::default()
        }
    }

    pub fn with_schema_version(mut self, version: u32) -> Self {
        self.schema_version = version;
        self
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    /// Checks that this configuration can produce a working gateway.
    ///
    /// # Errors
    /// - `ConfigError::InvalidAuthority` for empty or path-like authorities.
    /// - `ConfigError::InvalidSchemaVersion` when `schema_version == 0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let authority = self.authority.trim();
        let authority_ok = !authority.is_empty()
            && authority == self.authority
            && authority
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_');
        if !authority_ok {
            return Err(ConfigError::InvalidAuthority(self.authority.clone()));
        }
        if self.schema_version == 0 {
            return Err(ConfigError::InvalidSchemaVersion(self.schema_version));
        }
        Ok(())
    }
}

/// Configuration rejection reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidAuthority(String),
    InvalidSchemaVersion(u32),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAuthority(value) => write!(f, "invalid authority: `{value}`"),
            Self::InvalidSchemaVersion(value) => {
                write!(f, "schema version must be at least 1, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}
