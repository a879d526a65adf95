// src/resource.rs
//! Host-facing key resource: create / read / update / delete
//!
//! The host hands over a plan record, we fill in defaults, run one
//! derivation and hand back the full state. Failures never produce state,
//! so whatever the host already holds stays as it was.

use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(feature = "logging")]
use tracing::{info, warn};

use crate::aliases::{DerivedKey, FormattedResult, Password, Salt};
use crate::config::{self, Defaults};
use crate::core::{derive, DerivationRequest, EntropySource, Result};
use crate::enums::HashAlgorithm;
use crate::error::CoreError;
use crate::format::b64enc;

/// Input record; every field but `password` may be left to defaults
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyPlan {
    pub iterations: Option<i64>,
    pub format: Option<String>,
    #[serde(default, deserialize_with = "deserialize_password")]
    pub password: Option<Password>,
    pub hash_algorithm: Option<String>,
    pub salt_length: Option<i64>,
}

fn deserialize_password<'de, D>(deserializer: D) -> std::result::Result<Option<Password>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(Password::new))
}

impl KeyPlan {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: Some(Password::new(password.into())),
            ..Self::default()
        }
    }

    /// Decode the host's JSON plan record
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn iterations(mut self, iterations: i64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn hash_algorithm(mut self, name: impl Into<String>) -> Self {
        self.hash_algorithm = Some(name.into());
        self
    }

    pub fn salt_length(mut self, salt_length: i64) -> Self {
        self.salt_length = Some(salt_length);
        self
    }
}

/// Persisted resource state: the resolved plan plus the derived values
#[derive(Debug)]
pub struct KeyState {
    pub iterations: i64,
    pub format: String,
    pub password: Password,
    pub hash_algorithm: String,
    pub salt_length: i64,
    pub salt: Salt,
    pub key: DerivedKey,
    pub result: FormattedResult,
}

/// Serializable view of [`KeyState`] with salt and key in base64
///
/// SECURITY WARNING: this holds every secret in cleartext. It wipes itself
/// on drop, but anything it is serialized into does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct StateAttributes {
    pub iterations: i64,
    pub format: String,
    pub password: String,
    pub hash_algorithm: String,
    pub salt_length: i64,
    pub salt: String,
    pub key: String,
    pub result: String,
}

impl KeyState {
    pub fn attributes(&self) -> StateAttributes {
        StateAttributes {
            iterations: self.iterations,
            format: self.format.clone(),
            password: self.password.expose_secret().clone(),
            hash_algorithm: self.hash_algorithm.clone(),
            salt_length: self.salt_length,
            salt: b64enc(self.salt.expose_secret()),
            key: b64enc(self.key.expose_secret()),
            result: self.result.expose_secret().clone(),
        }
    }
}

/// The key resource as seen by the host
pub struct KeyResource<S: EntropySource = OsRng> {
    defaults: Defaults,
    entropy: S,
}

impl KeyResource<OsRng> {
    /// Resource backed by the OS CSPRNG and the loaded config's defaults
    pub fn from_config() -> Result<Self> {
        Ok(Self::new(config::load()?.defaults.clone()))
    }

    pub fn new(defaults: Defaults) -> Self {
        Self::with_entropy(defaults, OsRng)
    }
}

impl<S: EntropySource> KeyResource<S> {
    pub fn with_entropy(defaults: Defaults, entropy: S) -> Self {
        Self { defaults, entropy }
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn create(&mut self, plan: KeyPlan) -> Result<KeyState> {
        #[cfg(feature = "logging")]
        info!("creating key");

        self.generate(plan)
    }

    /// Derived values cannot be re-verified without the original inputs,
    /// so reading hands the state back untouched.
    pub fn read(&self, state: KeyState) -> KeyState {
        state
    }

    /// Re-derive with a fresh salt. On failure `state` is left as it was.
    pub fn update(&mut self, state: &mut KeyState, plan: KeyPlan) -> Result<()> {
        #[cfg(feature = "logging")]
        info!("updating key");

        *state = self.generate(plan)?;
        Ok(())
    }

    /// Discard the state; secrets are wiped as it drops.
    pub fn delete(&self, state: KeyState) {
        #[cfg(feature = "logging")]
        info!("deleting key");

        drop(state);
    }

    fn generate(&mut self, plan: KeyPlan) -> Result<KeyState> {
        let outcome = self.try_generate(plan);

        #[cfg(feature = "logging")]
        {
            if let Err(err) = &outcome {
                warn!(error = %err, "key derivation failed");
            }
        }

        outcome
    }

    fn try_generate(&mut self, plan: KeyPlan) -> Result<KeyState> {
        let KeyPlan {
            iterations,
            format,
            password,
            hash_algorithm,
            salt_length,
        } = plan;

        let password = password
            .ok_or_else(|| CoreError::InvalidInput("password is required".into()))?;
        let iterations = iterations.unwrap_or(self.defaults.iterations);
        let salt_length = salt_length.unwrap_or(self.defaults.salt_length);
        let format = format.unwrap_or_else(|| self.defaults.format.clone());
        let hash_algorithm =
            hash_algorithm.unwrap_or_else(|| self.defaults.hash_algorithm.to_string());
        let algorithm = HashAlgorithm::lookup(&hash_algorithm)?;

        let request =
            DerivationRequest::new(password, iterations, salt_length, algorithm, format)?;
        let derivation = derive(&request, &mut self.entropy)?;
        let (password, format) = request.into_parts();

        Ok(KeyState {
            iterations,
            format,
            password,
            hash_algorithm,
            salt_length,
            salt: derivation.salt,
            key: derivation.key,
            result: derivation.result,
        })
    }
}
