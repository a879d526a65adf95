// src/core/derive.rs
//! One complete derivation: validate → salt → PBKDF2 → format
//!
//! Either every output is produced or none is.

use rand::rngs::OsRng;

#[cfg(feature = "logging")]
use tracing::debug;

use crate::aliases::{DerivedKey, FormattedResult, Password, Salt};
use crate::core::kdf::derive_key;
use crate::core::salt::{generate_salt, EntropySource};
use crate::core::Result;
use crate::enums::HashAlgorithm;
use crate::error::CoreError;
use crate::format::{FormatContext, Template};

/// Validated inputs for one derivation
#[derive(Debug)]
pub struct DerivationRequest {
    password: Password,
    iterations: u32,
    salt_length: usize,
    hash_algorithm: HashAlgorithm,
    format: String,
}

impl DerivationRequest {
    /// Build a request from host-sized values.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidInput`] if `iterations` or `salt_length` is not
    ///   positive or does not fit the platform
    pub fn new(
        password: Password,
        iterations: i64,
        salt_length: i64,
        hash_algorithm: HashAlgorithm,
        format: impl Into<String>,
    ) -> Result<Self> {
        if iterations < 1 {
            return Err(CoreError::InvalidInput(format!(
                "iterations must be ≥1, got {iterations}"
            )));
        }
        if salt_length < 1 {
            return Err(CoreError::InvalidInput(format!(
                "salt length must be ≥1, got {salt_length}"
            )));
        }
        let iterations = u32::try_from(iterations).map_err(|_| {
            CoreError::InvalidInput(format!("iterations {iterations} exceeds {}", u32::MAX))
        })?;
        let salt_length = usize::try_from(salt_length).map_err(|_| {
            CoreError::InvalidInput(format!("salt length {salt_length} is too large"))
        })?;

        Ok(Self {
            password,
            iterations,
            salt_length,
            hash_algorithm,
            format: format.into(),
        })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn salt_length(&self) -> usize {
        self.salt_length
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Hand back the caller-owned inputs once the derivation is done
    pub fn into_parts(self) -> (Password, String) {
        (self.password, self.format)
    }
}

/// Everything one derivation produces
#[derive(Debug)]
pub struct Derivation {
    pub salt: Salt,
    pub key: DerivedKey,
    pub result: FormattedResult,
}

/// Run a derivation, drawing the salt from `entropy`.
///
/// The template is parsed before any entropy is consumed or any PBKDF2
/// round is spent.
pub fn derive<S: EntropySource + ?Sized>(
    request: &DerivationRequest,
    entropy: &mut S,
) -> Result<Derivation> {
    let template = Template::parse(&request.format)?;

    #[cfg(feature = "logging")]
    debug!(
        algorithm = %request.hash_algorithm,
        iterations = request.iterations,
        salt_length = request.salt_length,
        "deriving key"
    );

    let salt = generate_salt(entropy, request.salt_length)?;
    let key = derive_key(
        request.password.expose_secret().as_bytes(),
        salt.expose_secret(),
        request.iterations,
        request.hash_algorithm.output_len(),
        request.hash_algorithm,
    )?;

    let ctx = FormatContext::new(
        i64::from(request.iterations),
        salt.expose_secret(),
        key.expose_secret(),
    );
    let result = FormattedResult::new(template.render(&ctx)?);

    Ok(Derivation { salt, key, result })
}

/// [`derive`] with the operating system's CSPRNG
pub fn derive_with_os_entropy(request: &DerivationRequest) -> Result<Derivation> {
    derive(request, &mut OsRng)
}
