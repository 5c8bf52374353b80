use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("invalid V value")]
    InvalidVValue,

    #[error("signature recovery failed: {0}")]
    RecoveryFailed(String),
}
