use crate::utils::in_range;
use crate::{Ciphertext, PaillierError, PaillierResult, Plaintext, PublicKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use unknown_order::BigNumber;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A Paillier private key
///
/// Only `lambda` and `mu` are kept, the primes are discarded once
/// these are derived. Decryption therefore needs the matching
/// [`PublicKey`] for `N`.
#[derive(Clone, Deserialize, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    /// lcm(P - 1, Q - 1)
    pub(crate) lambda: BigNumber,
    /// L(g^lambda mod N^2)^-1 mod N
    pub(crate) mu: BigNumber,
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}

impl PrivateKey {
    /// Reverse ciphertext to plaintext
    pub fn decrypt(&self, pk: &PublicKey, c: &Ciphertext) -> PaillierResult<Plaintext> {
        if !in_range(c, &pk.nn) {
            return Err(PaillierError::CiphertextOutOfRange);
        }

        // a = c^\lambda mod n^2
        let a = c.modpow(&self.lambda, &pk.nn);
        // ell = L(a, N)
        let l = pk.l(&a)?;
        // m = lu = L(a)*u = L(c^\lamba*)u mod n
        Ok(l.modmul(&self.mu, &pk.n))
    }

    /// The Paillier `lambda`
    pub fn lambda(&self) -> &BigNumber {
        &self.lambda
    }

    /// The Paillier `mu`
    pub fn mu(&self) -> &BigNumber {
        &self.mu
    }
}
