//! EIP-191 `personal_sign` message hashing.

use sha3::{Digest, Keccak256};

use crate::error::SignerError;
use crate::key_pair::KeyPair;

/// Hashes `message` per EIP-191: `Keccak256("\x19Ethereum Signed
/// Message:\n" ‖ len(message) ‖ message)`.
pub fn eip191_hash(message: &[u8]) -> [u8; 32] {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Signs a message under EIP-191 and returns the 65-byte `r ‖ s ‖ v`
/// signature, with `v` in the legacy 27/28 form.
pub fn sign_personal_message(key_pair: &KeyPair, message: &[u8]) -> Result<Vec<u8>, SignerError> {
    let hash = eip191_hash(message);
    let sig = key_pair.sign_prehashed(&hash)?;

    let mut out = Vec::with_capacity(65);
    out.extend_from_slice(&sig.r);
    out.extend_from_slice(&sig.s);
    out.push(sig.v);
    Ok(out)
}
