// src/core/mod.rs
//! Core derivation engine — salt, PBKDF2, formatting
//!
//! No I/O besides the entropy source, no global state.

pub mod derive;
pub mod kdf;
pub mod salt;

pub use derive::{derive, derive_with_os_entropy, Derivation, DerivationRequest};
pub use kdf::{derive_key, derive_key_for};
pub use salt::{generate_salt, EntropySource};

pub type Result<T> = std::result::Result<T, crate::error::CoreError>;
