// src/config/defaults.rs
use crate::config::app::{Config, Defaults};
use crate::consts::{DEFAULT_FORMAT, DEFAULT_ITERATIONS, DEFAULT_SALT_LENGTH};
use crate::enums::HashAlgorithm;

pub fn default_defaults() -> Defaults {
    Defaults {
        iterations: DEFAULT_ITERATIONS,
        salt_length: DEFAULT_SALT_LENGTH,
        hash_algorithm: HashAlgorithm::Sha256,
        format: DEFAULT_FORMAT.into(),
    }
}

impl Default for Defaults {
    fn default() -> Self {
        default_defaults()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            defaults: default_defaults(),
        }
    }
}
