// src/core/kdf.rs
//! PBKDF2-HMAC key derivation (RFC 8018)

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::{Sha256, Sha512};

use crate::aliases::DerivedKey;
use crate::core::Result;
use crate::enums::HashAlgorithm;
use crate::error::CoreError;

/// Derive `output_len` bytes with PBKDF2 over HMAC-`algorithm`.
///
/// Deterministic: identical inputs always yield identical keys.
///
/// # Errors
///
/// - [`CoreError::InvalidInput`] if `iterations` is 0
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    output_len: usize,
    algorithm: HashAlgorithm,
) -> Result<DerivedKey> {
    if iterations == 0 {
        return Err(CoreError::InvalidInput(
            "PBKDF2 iterations must be ≥1".into(),
        ));
    }

    let mut key = DerivedKey::new(vec![0u8; output_len]);
    let out = key.expose_secret_mut();
    let outcome = match algorithm {
        HashAlgorithm::Sha256 => pbkdf2::<Hmac<Sha256>>(password, salt, iterations, out),
        HashAlgorithm::Sha512 => pbkdf2::<Hmac<Sha512>>(password, salt, iterations, out),
    };
    // HMAC accepts keys of any length, so this only fires on a broken PRF
    outcome.map_err(|e| CoreError::InvalidInput(format!("PBKDF2 failed: {e}")))?;

    Ok(key)
}

/// Derive a key of the algorithm's native digest size
#[inline]
pub fn derive_key_for(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    algorithm: HashAlgorithm,
) -> Result<DerivedKey> {
    derive_key(password, salt, iterations, algorithm.output_len(), algorithm)
}
