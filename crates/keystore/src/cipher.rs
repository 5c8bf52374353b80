use aes::cipher::{KeyIvInit, StreamCipher};

use crate::error::KeystoreError;

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

/// AES-128-CTR encrypts (or decrypts — CTR mode is its own inverse) `data`
/// in place using `key[0:16]` and the given 16-byte IV.
pub fn aes_128_ctr_apply(key16: &[u8; 16], iv: &[u8; 16], data: &mut [u8]) -> Result<(), KeystoreError> {
    let mut cipher = Aes128Ctr::new(key16.into(), iv.into());
    cipher
        .try_apply_keystream(data)
        .map_err(|e| KeystoreError::CipherFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctr_mode_is_its_own_inverse() {
        let key = [7u8; 16];
        let iv = [9u8; 16];
        let plaintext = b"0123456789abcdef0123456789abcdef".to_vec();

        let mut buf = plaintext.clone();
        aes_128_ctr_apply(&key, &iv, &mut buf).unwrap();
        assert_ne!(buf, plaintext);

        aes_128_ctr_apply(&key, &iv, &mut buf).unwrap();
        assert_eq!(buf, plaintext);
    }
}
