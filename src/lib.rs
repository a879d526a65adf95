// src/lib.rs
//! pbkdf2-key — PBKDF2 key derivation with templated output
//!
//! Features:
//! - PBKDF2-HMAC-SHA256 / SHA512 over a fresh random salt
//! - Closed-grammar output templates (`bin`, `b64enc`, `printf`)
//! - Host-facing create/read/update/delete resource adapter
//! - Full secure-gate integration: every secret zeroizes on drop

pub mod aliases;
pub mod config;
pub mod consts;
pub mod core;
pub mod enums;
pub mod format;
pub mod resource;

pub mod error;

// Re-export everything users need at the crate root
pub use aliases::{DerivedKey, FormattedResult, Password, Salt};
pub use config::load as load_config;
pub use crate::core::{
    derive, derive_key, derive_with_os_entropy, generate_salt, Derivation, DerivationRequest,
    EntropySource, Result as CoreResult,
};
pub use enums::HashAlgorithm;
pub use error::{CoreError, TemplateError};
pub use format::{render, FormatContext, Template};
pub use resource::{KeyPlan, KeyResource, KeyState, StateAttributes};
