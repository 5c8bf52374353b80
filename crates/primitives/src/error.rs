use thiserror::Error;

/// Errors parsing or formatting the hex/address value types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitivesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("negative integer is not permitted")]
    NegativeInteger,

    #[error("integer value could not be derived from input")]
    NoIntegerValue,

    #[error("integer precision would be lost")]
    PrecisionLoss,

    #[error("integer exceeds u64::MAX")]
    IntegerOverflow,
}
