// tests/salt_tests.rs
mod support;
use support::{seeded, FailingEntropy};

use std::collections::HashSet;

use pbkdf2_key::core::generate_salt;
use pbkdf2_key::error::CoreError;
use rand::rngs::OsRng;

#[test]
fn test_generate_salt_returns_exact_length() {
    for len in [0, 1, 16, 33, 256] {
        let salt = generate_salt(&mut OsRng, len).unwrap();
        assert_eq!(salt.expose_secret().len(), len);
    }
}

#[test]
fn test_salts_do_not_repeat() {
    let mut seen = HashSet::new();
    for _ in 0..1000 {
        let salt = generate_salt(&mut OsRng, 16).unwrap();
        assert!(seen.insert(salt.expose_secret().clone()), "salt repeated");
    }
    assert_eq!(seen.len(), 1000);
}

#[test]
fn test_consecutive_draws_from_one_source_differ() {
    let mut rng = seeded(42);
    let a = generate_salt(&mut rng, 16).unwrap();
    let b = generate_salt(&mut rng, 16).unwrap();
    assert_ne!(a.expose_secret(), b.expose_secret());
}

#[test]
fn test_seeded_source_is_reproducible() {
    let a = generate_salt(&mut seeded(7), 32).unwrap();
    let b = generate_salt(&mut seeded(7), 32).unwrap();
    assert_eq!(a.expose_secret(), b.expose_secret());
}

#[test]
fn test_failing_source_propagates_random_source_error() {
    let err = generate_salt(&mut FailingEntropy, 16).unwrap_err();
    match err {
        CoreError::RandomSource(msg) => assert!(msg.contains("unavailable")),
        other => panic!("expected RandomSource, got {other:?}"),
    }
}
