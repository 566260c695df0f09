use crate::utils::{in_range, mod_in, random_bits};
use crate::{Ciphertext, KeyPair, Nonce, PaillierError, PaillierResult};
use rand::{rngs::OsRng, CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use unknown_order::BigNumber;

/// How many randomizers are drawn before giving up on finding one
/// coprime to `N`
pub(crate) const MAX_NONCE_ATTEMPTS: usize = 1000;

/// A Paillier public key
#[derive(Clone, Debug, PartialEq)]
pub struct PublicKey {
    pub(crate) n: BigNumber,  // N = p * q, where p,q are primes
    pub(crate) g: BigNumber,  // g = 1 + k * N
    pub(crate) nn: BigNumber, // N^2
}

#[derive(Serialize, Deserialize)]
struct PublicKeyParts {
    n: BigNumber,
    g: BigNumber,
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        PublicKeyParts {
            n: self.n.clone(),
            g: self.g.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parts = PublicKeyParts::deserialize(deserializer)?;
        Self::new(parts.n, parts.g).map_err(serde::de::Error::custom)
    }
}

impl From<&KeyPair> for PublicKey {
    fn from(keys: &KeyPair) -> PublicKey {
        keys.pk.clone()
    }
}

impl PublicKey {
    /// Construct a public key from the modulus and generator.
    ///
    /// `N` must be at least 2 and `g` must lie in `[1, N^2)`.
    pub fn new(n: BigNumber, g: BigNumber) -> PaillierResult<Self> {
        if n <= BigNumber::one() {
            return Err(PaillierError::InvalidPublicKey);
        }
        let nn = &n * &n;
        if !mod_in(&g, &nn) {
            return Err(PaillierError::InvalidPublicKey);
        }
        Ok(Self { n, g, nn })
    }

    /// l computes a residuosity class of N^2: (x - 1) / n
    /// where it is the quotient x - 1 divided by N not modular multiplication of x - 1 times
    /// the modular multiplication inverse of N. The function comes from Paillier's 99 paper.
    pub(crate) fn l(&self, x: &BigNumber) -> PaillierResult<BigNumber> {
        let one = BigNumber::one();
        // Ensure x = 1 mod N
        if x % &self.n != one {
            return Err(PaillierError::KeyMismatch);
        }

        // Ensure x \in [1..N^2]
        if !mod_in(x, &self.nn) {
            return Err(PaillierError::KeyMismatch);
        }

        //(x - 1) / N
        Ok((x - &one) / &self.n)
    }

    /// Encrypt `m` with a fresh randomizer from the operating system
    /// `m` must be less than N
    pub fn encrypt(&self, m: &BigNumber) -> PaillierResult<Ciphertext> {
        self.encrypt_with_rng(m, &mut OsRng)
    }

    /// Encrypt `m` drawing the randomizer from `rng`
    pub fn encrypt_with_rng(
        &self,
        m: &BigNumber,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> PaillierResult<Ciphertext> {
        if !in_range(m, &self.n) {
            return Err(PaillierError::PlaintextOutOfRange);
        }
        let r = self.random_nonce(rng)?;
        self.encrypt_with_nonce(m, &r)
    }

    /// Encrypt a value with the encryption key and given nonce.
    /// `m` must be in `[0, N)` and `r` in `[1, N)` coprime to `N`
    pub fn encrypt_with_nonce(&self, m: &BigNumber, r: &Nonce) -> PaillierResult<Ciphertext> {
        if !in_range(m, &self.n) {
            return Err(PaillierError::PlaintextOutOfRange);
        }
        if !mod_in(r, &self.n) {
            return Err(PaillierError::InvalidNonce);
        }
        // r must be a unit mod N
        if r.gcd(&self.n) != BigNumber::one() {
            return Err(PaillierError::InvalidNonce);
        }

        // g^m mod N^2
        let g_m = self.g.modpow(m, &self.nn);

        // r^N mod N^2
        let r_n = r.modpow(&self.n, &self.nn);

        // c = g^m r^n mod N^2
        Ok(g_m.modmul(&r_n, &self.nn))
    }

    /// Draw `r` in `[1, N)` with `gcd(r, N) = 1`
    pub(crate) fn random_nonce(
        &self,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> PaillierResult<Nonce> {
        let bits = self.n.bit_length();
        let one = BigNumber::one();
        for _ in 0..MAX_NONCE_ATTEMPTS {
            // (random mod N) + 1 lands in [1, N], N itself fails the gcd check
            let r = &(random_bits(bits, rng) % &self.n) + &one;
            if r.gcd(&self.n) == one {
                return Ok(r);
            }
        }
        Err(PaillierError::NonceGenerationFailure(MAX_NONCE_ATTEMPTS))
    }

    /// Combines two Paillier ciphertexts
    /// commonly denoted in text as c1 \bigoplus c2
    pub fn combine(&self, c1: &Ciphertext, c2: &Ciphertext) -> PaillierResult<Ciphertext> {
        let c1_check = in_range(c1, &self.nn);
        let c2_check = in_range(c2, &self.nn);
        if !c1_check | !c2_check {
            return Err(PaillierError::CiphertextOutOfRange);
        }

        Ok(c1.modmul(c2, &self.nn))
    }

    /// Equivalent to multiplying the plaintext by `a`
    pub fn mul(&self, c: &Ciphertext, a: &BigNumber) -> PaillierResult<Ciphertext> {
        if !in_range(c, &self.nn) {
            return Err(PaillierError::CiphertextOutOfRange);
        }
        if !in_range(a, &self.n) {
            return Err(PaillierError::PlaintextOutOfRange);
        }

        Ok(c.modpow(a, &self.nn))
    }

    /// The Paillier modulus
    pub fn n(&self) -> &BigNumber {
        &self.n
    }

    /// The Paillier generator
    pub fn g(&self) -> &BigNumber {
        &self.g
    }

    /// The Paillier modulus squared
    pub fn nn(&self) -> &BigNumber {
        &self.nn
    }
}
