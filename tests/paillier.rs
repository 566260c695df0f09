use paillier_tally::unknown_order::BigNumber;
use paillier_tally::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Primes from the usual textbook Paillier walk through
const P: u64 = 293;
const Q: u64 = 433;

fn textbook_keys() -> KeyPair {
    KeyPair::with_primes(&BigNumber::from(P), &BigNumber::from(Q)).unwrap()
}

fn seeded_keys(bits: usize, seed: u8) -> KeyPair {
    let mut rng = ChaCha20Rng::from_seed([seed; 32]);
    KeyPair::generate_with_rng(bits, &mut rng).unwrap()
}

#[test]
fn round_trip() {
    let keys = textbook_keys();
    let (pk, sk) = (keys.public_key(), keys.private_key());
    let n_minus_one: BigNumber = pk.n() - 1;

    for m in [BigNumber::zero(), BigNumber::from(42u8), n_minus_one] {
        let c = encrypt(pk, &m).unwrap();
        assert!(&c < pk.nn());
        assert_eq!(decrypt(sk, pk, &c).unwrap(), m);
    }
}

#[test]
fn bad_messages() {
    let keys = textbook_keys();
    let (pk, sk) = (keys.public_key(), keys.private_key());
    let minus_one = -BigNumber::one();
    assert!(minus_one < BigNumber::zero());

    assert_eq!(
        encrypt(pk, pk.n()).unwrap_err(),
        PaillierError::PlaintextOutOfRange
    );
    assert_eq!(
        encrypt(pk, &minus_one).unwrap_err(),
        PaillierError::PlaintextOutOfRange
    );
    assert_eq!(
        decrypt(sk, pk, pk.nn()).unwrap_err(),
        PaillierError::CiphertextOutOfRange
    );
    assert_eq!(
        decrypt(sk, pk, &minus_one).unwrap_err(),
        PaillierError::CiphertextOutOfRange
    );
    assert_eq!(
        combine(pk, pk.nn(), &BigNumber::one()).unwrap_err(),
        PaillierError::CiphertextOutOfRange
    );
}

#[test]
fn malformed_ciphertext() {
    let keys = textbook_keys();
    // Neither 0 nor N raised to lambda is 1 mod N
    assert_eq!(
        keys.decrypt(&BigNumber::zero()).unwrap_err(),
        PaillierError::KeyMismatch
    );
    assert_eq!(
        keys.decrypt(keys.public_key().n()).unwrap_err(),
        PaillierError::KeyMismatch
    );
}

#[test]
fn add() {
    let keys = seeded_keys(256, 1);
    let pk = keys.public_key();

    let c1 = encrypt(pk, &BigNumber::from(3u8)).unwrap();
    let c2 = encrypt(pk, &BigNumber::from(5u8)).unwrap();
    let c3 = combine(pk, &c1, &c2).unwrap();
    assert_eq!(keys.decrypt(&c3).unwrap(), BigNumber::from(8u8));

    let c1 = encrypt(pk, &BigNumber::from(7u8)).unwrap();
    let c2 = encrypt(pk, &BigNumber::from(6u8)).unwrap();
    let c3 = keys.combine(&c1, &c2).unwrap();
    assert_eq!(keys.decrypt(&c3).unwrap(), BigNumber::from(13u8));
}

#[test]
fn add_wraps_modulo_n() {
    let keys = textbook_keys();
    let pk = keys.public_key();
    let n_minus_one: BigNumber = pk.n() - 1;

    let c1 = encrypt(pk, &n_minus_one).unwrap();
    let c2 = encrypt(pk, &BigNumber::from(2u8)).unwrap();
    let c3 = combine(pk, &c1, &c2).unwrap();
    assert_eq!(keys.decrypt(&c3).unwrap(), BigNumber::one());
}

#[test]
fn mul() {
    let keys = textbook_keys();
    let pk = keys.public_key();

    let c1 = encrypt(pk, &BigNumber::from(7u8)).unwrap();
    let c2 = pk.mul(&c1, &BigNumber::from(6u8)).unwrap();
    assert_eq!(keys.decrypt(&c2).unwrap(), BigNumber::from(42u8));

    assert_eq!(
        pk.mul(&c1, pk.n()).unwrap_err(),
        PaillierError::PlaintextOutOfRange
    );
}

#[test]
fn ciphertexts_are_randomized() {
    let keys = seeded_keys(128, 2);
    let m = BigNumber::from(9u8);
    let c1 = keys.encrypt(&m).unwrap();
    let c2 = keys.encrypt(&m).unwrap();
    assert_ne!(c1, c2);
    assert_eq!(keys.decrypt(&c1).unwrap(), m);
    assert_eq!(keys.decrypt(&c2).unwrap(), m);
}

#[test]
fn encrypt_with_nonce() {
    let keys = textbook_keys();
    let pk = keys.public_key();
    let m = BigNumber::from(11u8);
    let r = BigNumber::from(17u8);

    let c1 = pk.encrypt_with_nonce(&m, &r).unwrap();
    let c2 = pk.encrypt_with_nonce(&m, &r).unwrap();
    assert_eq!(c1, c2);
    assert_eq!(keys.decrypt(&c1).unwrap(), m);

    assert_eq!(
        pk.encrypt_with_nonce(&m, &BigNumber::zero()).unwrap_err(),
        PaillierError::InvalidNonce
    );
    assert_eq!(
        pk.encrypt_with_nonce(&m, pk.n()).unwrap_err(),
        PaillierError::InvalidNonce
    );
    // A factor of N is in range but not a unit
    for r in [P, Q, 2 * P] {
        assert_eq!(
            pk.encrypt_with_nonce(&m, &BigNumber::from(r)).unwrap_err(),
            PaillierError::InvalidNonce
        );
    }
}

#[test]
fn key_invariants() {
    for (bits, seed) in [(16usize, 3u8), (64, 4), (256, 5)] {
        let keys = seeded_keys(bits, seed);
        let (pk, sk) = (keys.public_key(), keys.private_key());
        let n = pk.n();

        assert_eq!(n.gcd(sk.lambda()), BigNumber::one());
        // Two bits/2 bit primes give a bits or bits - 1 bit modulus
        assert!(n.bit_length() == bits || n.bit_length() == bits - 1);
        assert!(pk.g() < pk.nn());
        assert_eq!(pk.g() % n, BigNumber::one());
        assert_eq!(pk.nn(), &(n * n));
        assert!(!n.is_prime());
    }
}

#[test]
fn keys_from_primes() {
    let keys = textbook_keys();
    let pm1 = BigNumber::from(P - 1);
    let qm1 = BigNumber::from(Q - 1);
    assert_eq!(keys.public_key().n(), &BigNumber::from(P * Q));
    assert_eq!(keys.private_key().lambda(), &pm1.lcm(&qm1));

    assert!(matches!(
        KeyPair::with_primes(&BigNumber::from(7u8), &BigNumber::from(7u8)),
        Err(PaillierError::InvalidParameter(_))
    ));
    assert!(matches!(
        KeyPair::with_primes(&BigNumber::from(8u8), &BigNumber::from(7u8)),
        Err(PaillierError::InvalidParameter(_))
    ));
    // N = 6 and lambda = 2 share a factor
    assert!(matches!(
        KeyPair::with_primes(&BigNumber::from(2u8), &BigNumber::from(3u8)),
        Err(PaillierError::InvariantViolation(_))
    ));
}

#[test]
fn generation_parameters() {
    assert!(matches!(
        generate(0),
        Err(PaillierError::InvalidParameter(_))
    ));
    assert!(matches!(
        KeyGenerator::new(64).max_attempts(0).generate(),
        Err(PaillierError::InvalidParameter(_))
    ));
    // One bit primes do not exist
    let mut rng = ChaCha20Rng::from_seed([6u8; 32]);
    assert!(matches!(
        KeyGenerator::new(2).max_attempts(10).generate_with_rng(&mut rng),
        Err(PaillierError::KeyGenerationFailure(_))
    ));
}

#[test]
fn serialization() {
    let keys = seeded_keys(128, 7);
    let pk = keys.public_key();

    let pk_str = serde_json::to_string(pk).unwrap();
    let pk1 = serde_json::from_str::<PublicKey>(&pk_str).unwrap();
    assert_eq!(&pk1, pk);
    assert_eq!(pk1.nn(), pk.nn());

    let mut tampered = serde_json::to_value(pk).unwrap();
    tampered["g"] = serde_json::to_value(BigNumber::zero()).unwrap();
    assert!(serde_json::from_value::<PublicKey>(tampered).is_err());

    let keys_str = serde_json::to_string(&keys).unwrap();
    let keys1 = serde_json::from_str::<KeyPair>(&keys_str).unwrap();
    assert_eq!(keys1.private_key().lambda(), keys.private_key().lambda());
    assert_eq!(keys1.private_key().mu(), keys.private_key().mu());

    let c = keys.encrypt(&BigNumber::from(77u8)).unwrap();
    assert_eq!(keys1.decrypt(&c).unwrap(), BigNumber::from(77u8));
}

#[test]
fn private_key_debug_is_redacted() {
    let keys = textbook_keys();
    let lambda = keys.private_key().lambda().to_string();
    let debug = format!("{:?}", keys.private_key());
    assert!(debug.starts_with("PrivateKey"));
    assert!(!debug.contains(&lambda));
}
