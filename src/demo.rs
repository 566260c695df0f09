use paillier_tally::unknown_order::BigNumber;
use paillier_tally::{Ciphertext, KeyPair, PaillierResult, Plaintext};
use serde::Serialize;

/// Two encrypted messages, their homomorphic sum and every decryption
#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub ciphertext1: Ciphertext,
    pub message1: Plaintext,
    pub ciphertext2: Ciphertext,
    pub message2: Plaintext,
    pub combined: Ciphertext,
    pub sum: Plaintext,
}

/// Encrypt both messages, multiply the ciphertexts and decrypt all three
pub fn run(keys: &KeyPair, message1: u64, message2: u64) -> PaillierResult<DemoReport> {
    let ciphertext1 = keys.encrypt(&BigNumber::from(message1))?;
    let ciphertext2 = keys.encrypt(&BigNumber::from(message2))?;
    let combined = keys.combine(&ciphertext2, &ciphertext1)?;
    tracing::debug!("demo ciphertexts combined");

    Ok(DemoReport {
        message1: keys.decrypt(&ciphertext1)?,
        message2: keys.decrypt(&ciphertext2)?,
        sum: keys.decrypt(&combined)?,
        ciphertext1,
        ciphertext2,
        combined,
    })
}
