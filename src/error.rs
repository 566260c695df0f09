/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
use thiserror::Error;

/// Errors produced by the Paillier scheme and the tally built on it.
///
/// Every variant is fatal for the session that raised it: none of them
/// is the result of bad user input that a re-prompt could fix, with
/// the exception of [`PaillierError::InvalidParameter`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PaillierError {
    /// A bit length or count was zero
    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// The plaintext is not in `[0, N)`
    #[error("Plaintext is outside the range [0, N)")]
    PlaintextOutOfRange,
    /// The ciphertext is not in `[0, N^2)`
    #[error("Ciphertext is outside the range [0, N^2)")]
    CiphertextOutOfRange,
    /// The randomizer is not in `[1, N)`
    #[error("Invalid encryption nonce")]
    InvalidNonce,
    /// No randomizer coprime to `N` was found
    #[error("Unable to sample an encryption nonce after {0} attempts")]
    NonceGenerationFailure(usize),
    /// Prime sampling or the `mu` inverse gave up
    #[error("Key generation failed: {0}")]
    KeyGenerationFailure(&'static str),
    /// A derived key value broke an algebraic invariant
    #[error("Key invariant violated: {0}")]
    InvariantViolation(&'static str),
    /// `c^lambda mod N^2` is not `1 mod N`, so the ciphertext was not
    /// produced under this key pair
    #[error("Ciphertext does not belong to this key pair")]
    KeyMismatch,
    /// A tally operation was called in a state that does not allow it
    #[error("Tally protocol violation: {0}")]
    ProtocolViolation(&'static str),
    /// The public key failed validation
    #[error("Invalid public key")]
    InvalidPublicKey,
}

/// Paillier results
pub type PaillierResult<T> = Result<T, PaillierError>;

/// A vote value other than 0 or 1.
///
/// Kept apart from [`PaillierError`]: it only ever comes from parsing
/// voter input and the caller is expected to ask again.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Invalid vote {0:?}, expected 0 or 1")]
pub struct InvalidVote(pub String);
