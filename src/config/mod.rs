// src/config/mod.rs
//! Configuration system for pbkdf2-key
//!
//! Central, lazy-loaded global config with TOML + env overrides. The only
//! table today is `[defaults]`, which fills in plan values the host omits.

pub use app::{from_toml_str, load, load_from_path, Config, Defaults};

mod app;
mod defaults;
