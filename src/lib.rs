/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Paillier's cryptosystem (1999)
//! Public-Key Cryptosystems based on composite degree residuosity class.
//! See <http://citeseerx.ist.psu.edu/download?doi=10.1.1.4035&rep=rep1&type=pdf>
//!
//! Multiplying two ciphertexts modulo N^2 yields an encryption of the sum
//! of their plaintexts. The [`tally`] module uses this to count binary
//! votes per candidate without decrypting the running totals until the
//! end.
//!
//! ```no_run
//! use paillier_tally::{combine, decrypt, encrypt, generate};
//! use paillier_tally::unknown_order::BigNumber;
//!
//! let keys = generate(1024).unwrap();
//! let (pk, sk) = (keys.public_key(), keys.private_key());
//! let c1 = encrypt(pk, &BigNumber::from(3u8)).unwrap();
//! let c2 = encrypt(pk, &BigNumber::from(5u8)).unwrap();
//! let sum = combine(pk, &c1, &c2).unwrap();
//! assert_eq!(decrypt(sk, pk, &sum).unwrap(), BigNumber::from(8u8));
//! ```
#![deny(
    missing_docs,
    unused_import_braces,
    trivial_casts,
    trivial_numeric_casts
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod keygen;
mod keypair;
mod privatekey;
mod publickey;
pub mod tally;
mod utils;

pub use unknown_order;

use unknown_order::BigNumber;

/// A Paillier Ciphertext, in `[0, N^2)`
pub type Ciphertext = BigNumber;
/// A Paillier Plaintext, in `[0, N)`
pub type Plaintext = BigNumber;
/// A Paillier nonce used during encryption, in `[1, N)`
pub type Nonce = BigNumber;

pub use error::*;
pub use keygen::*;
pub use keypair::*;
pub use privatekey::*;
pub use publickey::*;
pub use tally::{BallotSource, CastOutcome, Tally, TallyConfig, TallyResult, TallyState, Vote};

/// Generate a key pair whose modulus `N` has `bits` bits
pub fn generate(bits: usize) -> PaillierResult<KeyPair> {
    KeyGenerator::new(bits).generate()
}

/// Encrypt `m` in `[0, N)` under `pk`
pub fn encrypt(pk: &PublicKey, m: &Plaintext) -> PaillierResult<Ciphertext> {
    pk.encrypt(m)
}

/// Decrypt `c` in `[0, N^2)` with `sk` and the matching `pk`
pub fn decrypt(sk: &PrivateKey, pk: &PublicKey, c: &Ciphertext) -> PaillierResult<Plaintext> {
    sk.decrypt(pk, c)
}

/// `c1 * c2 mod N^2`, an encryption of the sum of both plaintexts
pub fn combine(pk: &PublicKey, c1: &Ciphertext, c2: &Ciphertext) -> PaillierResult<Ciphertext> {
    pk.combine(c1, c2)
}
