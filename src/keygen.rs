use crate::utils::{random_bits, random_prime};
use crate::{KeyPair, PaillierError, PaillierResult, PrivateKey, PublicKey};
use rand::{rngs::OsRng, CryptoRng, RngCore};
use tracing::debug;
use unknown_order::BigNumber;
use zeroize::Zeroize;

/// Lower bound on every rejection sampling loop in key generation
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Default attempt bound for a modulus of `bits` bits.
///
/// Roughly one in `bits / 3` odd candidates of `bits / 2` bits passes both
/// the length and the primality check, so the bound grows with `bits`.
pub fn default_max_attempts(bits: usize) -> usize {
    DEFAULT_MAX_ATTEMPTS.max(bits.saturating_mul(4))
}

/// Builds Paillier key pairs for a target modulus size
#[derive(Copy, Clone, Debug)]
pub struct KeyGenerator {
    bits: usize,
    max_attempts: usize,
}

impl KeyGenerator {
    /// A generator for an `N` of `bits` bits
    pub fn new(bits: usize) -> Self {
        Self {
            bits,
            max_attempts: default_max_attempts(bits),
        }
    }

    /// Bound the number of candidates drawn for each secret value
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// The requested modulus size
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Create a new random key pair
    pub fn generate(&self) -> PaillierResult<KeyPair> {
        self.generate_with_rng(&mut OsRng)
    }

    /// Create a new random key pair drawing randomness from `rng`
    pub fn generate_with_rng(
        &self,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> PaillierResult<KeyPair> {
        if self.bits == 0 {
            return Err(PaillierError::InvalidParameter("bit length must be positive"));
        }
        if self.max_attempts == 0 {
            return Err(PaillierError::InvalidParameter("max attempts must be positive"));
        }
        debug!(bits = self.bits, "generating Paillier key pair");

        let half = self.bits / 2;
        let mut p = random_prime(half, self.max_attempts, rng).ok_or(
            PaillierError::KeyGenerationFailure("no prime found within the attempt bound"),
        )?;
        let mut q = match self.distinct_prime(&p, half, rng) {
            Ok(q) => q,
            Err(e) => {
                p.zeroize();
                return Err(e);
            }
        };
        let res = derive_keys(&p, &q, self.bits, self.max_attempts, rng);
        // Make sure the primes are zero'd
        p.zeroize();
        q.zeroize();
        if let Ok(keys) = &res {
            debug!(modulus_bits = keys.pk.n.bit_length(), "key pair ready");
        }
        res
    }

    /// Draw primes until one differs from `p`
    fn distinct_prime(
        &self,
        p: &BigNumber,
        bits: usize,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> PaillierResult<BigNumber> {
        for attempt in 0..self.max_attempts {
            let mut q = random_prime(bits, self.max_attempts, rng).ok_or(
                PaillierError::KeyGenerationFailure("no prime found within the attempt bound"),
            )?;
            if &q != p {
                return Ok(q);
            }
            debug!(attempt, "second prime equals the first, redrawing");
            q.zeroize();
        }
        Err(PaillierError::KeyGenerationFailure(
            "no distinct second prime within the attempt bound",
        ))
    }
}

impl KeyPair {
    /// Create a new key pair from two primes.
    /// `p` and `q` are checked to be distinct primes
    pub fn with_primes(p: &BigNumber, q: &BigNumber) -> PaillierResult<Self> {
        // Paillier doesn't work if p == q
        if p == q {
            return Err(PaillierError::InvalidParameter("p and q must differ"));
        }
        if !p.is_prime() || !q.is_prime() {
            return Err(PaillierError::InvalidParameter("p and q must be prime"));
        }
        let bits = (p * q).bit_length();
        derive_keys(p, q, bits, default_max_attempts(bits), &mut OsRng)
    }
}

/// N, lambda and mu from two distinct primes, with a fresh secret `k`
/// for the generator `g = 1 + kN`
fn derive_keys(
    p: &BigNumber,
    q: &BigNumber,
    k_bits: usize,
    max_attempts: usize,
    rng: &mut (impl RngCore + CryptoRng),
) -> PaillierResult<KeyPair> {
    let one = BigNumber::one();
    let pm1: BigNumber = p - 1;
    let qm1: BigNumber = q - 1;
    let n = p * q;
    let nn = &n * &n;

    let lambda = pm1.lcm(&qm1);
    if lambda.is_zero() {
        return Err(PaillierError::InvariantViolation("lambda is zero"));
    }
    if n.gcd(&lambda) != one {
        return Err(PaillierError::InvariantViolation("gcd(N, lambda) != 1"));
    }

    for attempt in 0..max_attempts {
        // k mod N keeps g below N^2 and leaves g^lambda mod N^2 unchanged
        let mut k = random_bits(k_bits, rng) % &n;
        let g = &(&k * &n) + &one;
        k.zeroize();
        let pk = PublicKey {
            n: n.clone(),
            g,
            nn: nn.clone(),
        };

        // L(g^lambda mod N^2)^-1 mod N
        let t = pk.g.modpow(&lambda, &pk.nn);
        match pk.l(&t).ok().and_then(|l| l.invert(&n)) {
            Some(mu) => {
                return Ok(KeyPair {
                    pk,
                    sk: PrivateKey { lambda, mu },
                })
            }
            None => debug!(attempt, "generator has no inverse, redrawing k"),
        }
    }
    Err(PaillierError::KeyGenerationFailure(
        "no invertible generator within the attempt bound",
    ))
}
