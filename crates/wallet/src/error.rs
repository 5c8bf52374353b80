use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet not available")]
    NotAvailable,

    #[error("address mismatch: keystore decrypts to a different address than requested")]
    AddressMismatch,

    #[error("failed to read key directory: {0}")]
    ReadDir(String),

    #[error("template expansion failed: {0}")]
    TemplateExpansion(String),

    #[error("failed to parse metadata file: {0}")]
    MetadataParse(String),

    #[error(transparent)]
    InvalidAddress(#[from] primitives::PrimitivesError),

    #[error(transparent)]
    Keystore(#[from] keystore::KeystoreError),

    #[error(transparent)]
    Signer(#[from] signer::SignerError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("refresh callback aborted: {0}")]
    CallbackAborted(String),
}

impl From<std::io::Error> for WalletError {
    fn from(value: std::io::Error) -> Self {
        WalletError::Io(value.to_string())
    }
}
