// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the user-visible choices: today that is only the
//! hash function backing PBKDF2's HMAC.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Supported PBKDF2 hash functions
///
/// Names are matched case-sensitively: `"sha256"` and `"sha512"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 2] = [HashAlgorithm::Sha256, HashAlgorithm::Sha512];

    /// Resolve a symbolic name, rejecting anything outside the closed set.
    pub fn lookup(name: &str) -> Result<Self, CoreError> {
        match name {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => Err(CoreError::InvalidInput(format!(
                "unsupported hash algorithm {other:?} (expected \"sha256\" or \"sha512\")"
            ))),
        }
    }

    /// Legacy resolution: unknown names silently become sha256.
    pub fn lookup_or_default(name: &str) -> Self {
        Self::lookup(name).unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Native digest size in bytes, which is also the derived key length
    pub fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
