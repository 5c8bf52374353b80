use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("malformed keystore JSON: {0}")]
    MalformedJson(String),

    #[error("keystore is missing the `id` field")]
    MissingId,

    #[error("unsupported keystore version: {0}")]
    UnsupportedVersion(u32),

    #[error("unsupported KDF: {0}")]
    UnsupportedKdf(String),

    #[error("unsupported PRF: {0}")]
    UnsupportedPrf(String),

    #[error("unsupported cipher: {0}")]
    UnsupportedCipher(String),

    #[error("invalid password")]
    MacMismatch,

    #[error("derived key has wrong length: expected 32, got {0}")]
    DerivedKeyLength(usize),

    #[error("key derivation failed: {0}")]
    KdfFailed(String),

    #[error("cipher operation failed: {0}")]
    CipherFailed(String),

    #[error("I/O error: {0}")]
    Io(String),
}
