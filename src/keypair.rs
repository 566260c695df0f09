use crate::{Ciphertext, KeyGenerator, PaillierResult, Plaintext, PrivateKey, PublicKey};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use unknown_order::BigNumber;

/// A public key and the private key generated with it.
///
/// The two halves are only ever created together by [`KeyGenerator`]
/// and are passed around as one value, so a ciphertext is never
/// decrypted with another pair's private key by accident.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct KeyPair {
    pub(crate) pk: PublicKey,
    pub(crate) sk: PrivateKey,
}

impl KeyPair {
    /// Generate a key pair whose modulus has `bits` bits
    pub fn generate(bits: usize) -> PaillierResult<Self> {
        KeyGenerator::new(bits).generate()
    }

    /// Generate a key pair drawing all randomness from `rng`
    pub fn generate_with_rng(
        bits: usize,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> PaillierResult<Self> {
        KeyGenerator::new(bits).generate_with_rng(rng)
    }

    /// The public half
    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    /// The private half
    pub fn private_key(&self) -> &PrivateKey {
        &self.sk
    }

    /// Encrypt under the public half
    pub fn encrypt(&self, m: &BigNumber) -> PaillierResult<Ciphertext> {
        self.pk.encrypt(m)
    }

    /// Encrypt under the public half drawing the randomizer from `rng`
    pub fn encrypt_with_rng(
        &self,
        m: &BigNumber,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> PaillierResult<Ciphertext> {
        self.pk.encrypt_with_rng(m, rng)
    }

    /// Decrypt with the private half
    pub fn decrypt(&self, c: &Ciphertext) -> PaillierResult<Plaintext> {
        self.sk.decrypt(&self.pk, c)
    }

    /// Homomorphically add two ciphertexts
    pub fn combine(&self, c1: &Ciphertext, c2: &Ciphertext) -> PaillierResult<Ciphertext> {
        self.pk.combine(c1, c2)
    }

    /// Split into the public and private halves
    pub fn into_parts(self) -> (PublicKey, PrivateKey) {
        (self.pk, self.sk)
    }
}
