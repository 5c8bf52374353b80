use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("invalid RLP structure: {0}")]
    InvalidRlp(#[from] rlp_codec::RlpError),

    #[error("wrong element count: expected {expected}, got {got}")]
    WrongElementCount { expected: usize, got: usize },

    #[error("unsupported transaction type")]
    UnsupportedType,

    #[error("chain id mismatch: expected {expected}, got {got}")]
    ChainIdMismatch { expected: u64, got: u64 },

    #[error(transparent)]
    Signer(#[from] signer::SignerError),

    #[error(transparent)]
    Primitives(#[from] primitives::PrimitivesError),

    #[error("value does not fit the expected integer width")]
    IntegerTooWide,
}
