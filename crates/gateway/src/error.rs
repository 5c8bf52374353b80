use primitives::jsonrpc::ErrorPayload;
use thiserror::Error;

/// The handler layer is the sole site that maps interior, typed errors
/// onto a JSON-RPC error payload and HTTP status.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Wallet(#[from] wallet::WalletError),

    #[error(transparent)]
    Transaction(#[from] transaction::TransactionError),

    #[error(transparent)]
    RpcClient(#[from] rpc_client::RpcClientError),

    #[error(transparent)]
    Signer(#[from] signer::SignerError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("parse error: {0}")]
    ParseError(String),
}

impl RpcError {
    pub fn to_error_payload(&self) -> ErrorPayload {
        match self {
            RpcError::Wallet(e) => ErrorPayload::new(ErrorPayload::INTERNAL_ERROR, e.to_string()),
            RpcError::Transaction(e) => ErrorPayload::new(ErrorPayload::PARSE_ERROR, e.to_string()),
            RpcError::RpcClient(e) => e.to_error_payload(),
            RpcError::Signer(e) => ErrorPayload::new(ErrorPayload::INTERNAL_ERROR, e.to_string()),
            RpcError::InvalidRequest(msg) => ErrorPayload::new(ErrorPayload::INVALID_REQUEST, msg.clone()),
            RpcError::ParseError(msg) => ErrorPayload::new(ErrorPayload::PARSE_ERROR, msg.clone()),
        }
    }
}
