//! Keystore V3 file codec: scrypt and PBKDF2 key derivation, AES-128-CTR
//! encryption, Keccak-256 MAC.

mod cipher;
mod codec;
mod error;
mod hex_field;
mod kdf;
mod model;

pub use codec::{decrypt, read, write, KdfRequest};
pub use error::KeystoreError;
pub use hex_field::HexField;
pub use model::{
    CipherParams, CryptoSection, KdfParams, KeystoreFile, Pbkdf2Params, ScryptParams,
    CIPHER_AES_128_CTR, KEYSTORE_VERSION, PRF_HMAC_SHA256,
};
