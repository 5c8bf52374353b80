use thiserror::Error;

/// RLP encode/decode errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RlpError {
    #[error("length mismatch")]
    LengthMismatch,

    #[error("too many RLP bytes to decode")]
    TooManyBytes,

    #[error("expected RLP list")]
    NotAList,

    #[error("expected RLP data")]
    NotData,

    #[error("integer does not fit in target width")]
    IntegerTooWide,
}
