// src/consts.rs
//! Shared constants — security parameters and defaults

/// Default PBKDF2 iteration count
// ~50–100ms for HMAC-SHA256 on modern hardware
pub const DEFAULT_ITERATIONS: i64 = 100_000;

/// Default length of the generated salt, in bytes
pub const DEFAULT_SALT_LENGTH: i64 = 16;

/// Default output template: `<base64 salt>:<base64 key>`
pub const DEFAULT_FORMAT: &str = r#"{{ printf "%s:%s" (b64enc .Salt) (b64enc .Key) }}"#;

/// Widest integer `bin` can emit (big-endian u64)
pub const MAX_BIN_WIDTH: i64 = 8;

/// Deepest `( … )` nesting a template action may use
pub const MAX_PAREN_DEPTH: usize = 100;

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "PBKDF2_KEY_CONFIG";

/// Config file used when `PBKDF2_KEY_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "pbkdf2-key.toml";
