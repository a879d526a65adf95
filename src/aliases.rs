// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret carriers used throughout pbkdf2-key.
//! Every one of them zeroizes on drop and redacts itself in `Debug`.

pub use secure_gate::dynamic_alias;

// Caller input
dynamic_alias!(Password, String);

// Derivation outputs — lengths vary with salt length and hash algorithm
dynamic_alias!(Salt, Vec<u8>);
dynamic_alias!(DerivedKey, Vec<u8>);

// Rendered format template
dynamic_alias!(FormattedResult, String);
