use rand::{CryptoRng, RngCore};
use unknown_order::BigNumber;
use zeroize::Zeroize;

/// `0 <= a < n`
pub(crate) fn in_range(a: &BigNumber, n: &BigNumber) -> bool {
    let lhs = &BigNumber::zero() <= a;
    let rhs = a < n;
    lhs & rhs
}

/// `1 <= a < n`
pub(crate) fn mod_in(a: &BigNumber, n: &BigNumber) -> bool {
    let lhs = &BigNumber::one() <= a;
    let rhs = a < n;
    lhs & rhs
}

/// Big endian bytes of a uniformly random number in `[0, 2^bits)`
fn random_bytes(bits: usize, rng: &mut (impl RngCore + CryptoRng)) -> Vec<u8> {
    let len = (bits + 7) / 8;
    let mut buf = vec![0u8; len];
    rng.fill_bytes(&mut buf);
    // Clear the bits above `bits` in the most significant byte
    if let Some(top) = buf.first_mut() {
        *top &= 0xFFu8 >> (len * 8 - bits);
    }
    buf
}

/// A uniformly random number in `[0, 2^bits)`
pub(crate) fn random_bits(bits: usize, rng: &mut (impl RngCore + CryptoRng)) -> BigNumber {
    let mut buf = random_bytes(bits, rng);
    let out = BigNumber::from_slice(&buf);
    buf.zeroize();
    out
}

/// Rejection sample a prime of exactly `bits` bits.
///
/// Candidates are uniform odd numbers below `2^bits`. Returns `None`
/// when no candidate passed within `max_attempts` draws.
pub(crate) fn random_prime(
    bits: usize,
    max_attempts: usize,
    rng: &mut (impl RngCore + CryptoRng),
) -> Option<BigNumber> {
    if bits == 0 {
        return None;
    }
    for attempt in 0..max_attempts {
        let mut buf = random_bytes(bits, rng);
        if let Some(low) = buf.last_mut() {
            *low |= 1;
        }
        let mut candidate = BigNumber::from_slice(&buf);
        buf.zeroize();
        // The top bit must be set for the candidate to have the full length
        if candidate.bit_length() == bits && candidate.is_prime() {
            tracing::trace!(attempt, bits, "accepted prime candidate");
            return Some(candidate);
        }
        candidate.zeroize();
    }
    None
}
