#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Property-based tests for site password derivation.

use proptest::prelude::*;
use secrecy::SecretString;
use unique_passwords_core::{
    derive, CharTables, CharacterClasses, Charset, DerivationError, DerivationRequest,
    HashAlgorithm,
};

fn digest_algorithm() -> impl Strategy<Value = HashAlgorithm> {
    prop_oneof![
        Just(HashAlgorithm::Sha1),
        Just(HashAlgorithm::Sha256),
        Just(HashAlgorithm::Sha384),
        Just(HashAlgorithm::Sha512),
    ]
}

fn non_empty_classes() -> impl Strategy<Value = CharacterClasses> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>())
        .prop_filter("at least one class", |(l, u, d, s)| *l || *u || *d || *s)
        .prop_map(|(lowercase, uppercase, digits, special)| CharacterClasses {
            lowercase,
            uppercase,
            digits,
            special,
        })
}

fn request(
    domain: &str,
    username: &str,
    secret: &str,
    algorithm: HashAlgorithm,
    classes: CharacterClasses,
    length: usize,
) -> DerivationRequest {
    DerivationRequest::new(domain, username, SecretString::from(secret.to_owned()))
        .with_algorithm(algorithm)
        .with_charset(Charset::from_classes(classes, &CharTables::default()))
        .with_length(length)
}

proptest! {
    /// The same request always yields the same password.
    #[test]
    fn derive_is_deterministic(
        domain in "[a-z]{1,12}\\.[a-z]{2,3}",
        username in "[a-zA-Z0-9@.]{0,16}",
        secret in ".{0,32}",
        algorithm in digest_algorithm(),
        classes in non_empty_classes(),
        length in 1usize..80,
    ) {
        let a = derive(&request(&domain, &username, &secret, algorithm, classes, length)).unwrap();
        let b = derive(&request(&domain, &username, &secret, algorithm, classes, length)).unwrap();
        prop_assert_eq!(a.expose(), b.expose());
    }

    /// Output length is min(requested, raw hash length).
    #[test]
    fn length_contract(
        algorithm in digest_algorithm(),
        classes in non_empty_classes(),
        length in 1usize..100,
    ) {
        let result = derive(&request("example.com", "bob", "hunter2", algorithm, classes, length)).unwrap();
        prop_assert_eq!(result.len(), length.min(algorithm.output_len()));
    }

    /// Every output character comes from the selected charset.
    #[test]
    fn charset_containment(
        secret in ".{1,32}",
        algorithm in digest_algorithm(),
        classes in non_empty_classes(),
    ) {
        let charset = Charset::from_classes(classes, &CharTables::default());
        let result = derive(&request("example.com", "bob", &secret, algorithm, classes, 64)).unwrap();
        for c in result.expose().chars() {
            prop_assert!(charset.contains(c), "{:?} not in charset", c);
        }
    }

    /// Flipping one byte of the secret changes the password.
    #[test]
    fn secret_perturbation_changes_output(
        secret in "[a-zA-Z0-9]{4,24}",
        position in any::<prop::sample::Index>(),
        algorithm in digest_algorithm(),
    ) {
        let index = position.index(secret.len());
        let mut perturbed = secret.clone().into_bytes();
        perturbed[index] = if perturbed[index] == b'x' { b'y' } else { b'x' };
        let perturbed = String::from_utf8(perturbed).unwrap();

        let a = derive(&request("example.com", "bob", &secret, algorithm, CharacterClasses::ALL, 20)).unwrap();
        let b = derive(&request("example.com", "bob", &perturbed, algorithm, CharacterClasses::ALL, 20)).unwrap();
        prop_assert_ne!(a.expose(), b.expose());
    }

    /// A request with no class selected fails regardless of other inputs.
    #[test]
    fn empty_charset_always_invalid(
        algorithm in digest_algorithm(),
        length in 0usize..100,
    ) {
        let classes = CharacterClasses { lowercase: false, uppercase: false, digits: false, special: false };
        let result = derive(&request("example.com", "bob", "hunter2", algorithm, classes, length));
        prop_assert!(matches!(result, Err(DerivationError::InvalidRequest(_))));
    }
}
