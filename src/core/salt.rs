// src/core/salt.rs
//! Salt generation from an injected entropy source
//!
//! Production code hands in `rand::rngs::OsRng`; tests can hand in a seeded
//! `StdRng` or a source that fails on purpose.

use rand::TryCryptoRng;

#[cfg(feature = "logging")]
use tracing::debug;

use crate::aliases::Salt;
use crate::core::Result;
use crate::error::CoreError;

/// Anything that can fill a buffer with cryptographically secure bytes
pub trait EntropySource {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<()>;
}

// Every fallible CSPRNG from the rand ecosystem qualifies, including OsRng.
impl<R: TryCryptoRng + ?Sized> EntropySource for R {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<()> {
        self.try_fill_bytes(dest)
            .map_err(|e| CoreError::RandomSource(e.to_string()))
    }
}

/// Generate exactly `length` fresh bytes of salt
pub fn generate_salt<S: EntropySource + ?Sized>(source: &mut S, length: usize) -> Result<Salt> {
    let mut salt = Salt::new(vec![0u8; length]);
    source.try_fill(salt.expose_secret_mut())?;

    #[cfg(feature = "logging")]
    debug!(length, "generated salt");

    Ok(salt)
}
