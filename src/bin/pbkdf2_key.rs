// src/bin/pbkdf2_key.rs
//! Minimal host shim: plan JSON on stdin → state JSON on stdout
//!
//! The password may be left out of the plan; it is then read from the
//! terminal without echo.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use pbkdf2_key::aliases::Password;
use pbkdf2_key::{KeyPlan, KeyResource};
use rpassword::prompt_password;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read plan from stdin")?;
    let input = if input.trim().is_empty() { "{}" } else { input.as_str() };

    let mut plan = KeyPlan::from_json(input).context("Invalid plan record")?;
    if plan.password.is_none() {
        let password = prompt_password("Password: ").context("Failed to read password")?;
        plan.password = Some(Password::new(password));
    }

    let mut resource = KeyResource::from_config().context("Failed to load configuration")?;
    let state = resource.create(plan).context("Key derivation failed")?;
    info!(
        algorithm = %state.hash_algorithm,
        iterations = state.iterations,
        "key derived"
    );

    let attributes = state.attributes();
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &attributes)?;
    writeln!(stdout)?;

    resource.delete(state);
    Ok(())
}
