// tests/validation_tests.rs
//! Property tests: invalid counts are rejected before any work is done
mod common;
mod support;
use support::{fast_defaults, seeded, CountingEntropy};

use pbkdf2_key::aliases::Password;
use pbkdf2_key::consts::DEFAULT_FORMAT;
use pbkdf2_key::core::{derive, generate_salt, DerivationRequest};
use pbkdf2_key::enums::HashAlgorithm;
use pbkdf2_key::error::CoreError;
use pbkdf2_key::format::bin;
use pbkdf2_key::{KeyPlan, KeyResource};
use proptest::prelude::*;

fn request(iterations: i64, salt_length: i64) -> Result<DerivationRequest, CoreError> {
    DerivationRequest::new(
        Password::new("pw".to_string()),
        iterations,
        salt_length,
        HashAlgorithm::Sha256,
        DEFAULT_FORMAT,
    )
}

proptest! {
    #[test]
    fn non_positive_iterations_are_rejected(iterations in i64::MIN..=0, salt_length in 1i64..=64) {
        let outcome = request(iterations, salt_length);
        prop_assert!(matches!(outcome, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn non_positive_salt_length_is_rejected(iterations in 1i64..=1_000, salt_length in i64::MIN..=0) {
        let outcome = request(iterations, salt_length);
        prop_assert!(matches!(outcome, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn resource_rejects_non_positive_counts(iterations in i64::MIN..=0, salt_length in i64::MIN..=0) {
        let entropy = CountingEntropy::new(1);
        let drawn = entropy.counter();
        let mut resource = KeyResource::with_entropy(fast_defaults(), entropy);
        let by_iterations = resource.create(KeyPlan::new("pw").iterations(iterations));
        let by_salt = resource.create(KeyPlan::new("pw").salt_length(salt_length));
        prop_assert!(matches!(by_iterations, Err(CoreError::InvalidInput(_))));
        prop_assert!(matches!(by_salt, Err(CoreError::InvalidInput(_))));
        prop_assert_eq!(drawn.get(), 0);
    }

    #[test]
    fn generated_salt_has_requested_length(len in 0usize..=512) {
        let salt = generate_salt(&mut seeded(len as u64), len).unwrap();
        prop_assert_eq!(salt.expose_secret().len(), len);
    }

    #[test]
    fn bin_keeps_low_order_big_endian_bytes(width in 0usize..=8, value in any::<i64>()) {
        let bytes = bin(width, value).unwrap();
        prop_assert_eq!(bytes.as_slice(), &(value as u64).to_be_bytes()[8 - width..]);
    }
}

#[test]
fn test_counting_source_sees_exactly_the_salt() {
    common::setup_debug();

    let mut entropy = CountingEntropy::new(3);
    let request = request(2, 24).unwrap();
    let derivation = derive(&request, &mut entropy).unwrap();
    assert_eq!(entropy.bytes_drawn(), 24);
    assert_eq!(derivation.salt.expose_secret().len(), 24);
}

#[test]
fn test_bad_template_consumes_no_entropy() {
    let mut entropy = CountingEntropy::new(4);
    let request = DerivationRequest::new(
        Password::new("pw".to_string()),
        1,
        16,
        HashAlgorithm::Sha512,
        "{{ printf ",
    )
    .unwrap();
    let err = derive(&request, &mut entropy).unwrap_err();
    assert!(matches!(err, CoreError::Template(_)));
    assert_eq!(entropy.bytes_drawn(), 0);
}

#[test]
fn test_resource_counter_tracks_successful_create() {
    let entropy = CountingEntropy::new(5);
    let drawn = entropy.counter();
    let mut resource = KeyResource::with_entropy(fast_defaults(), entropy);

    assert!(resource.create(KeyPlan::new("pw").iterations(0)).is_err());
    assert_eq!(drawn.get(), 0);

    resource.create(KeyPlan::new("pw").salt_length(12)).unwrap();
    assert_eq!(drawn.get(), 12);
}
