use primitives::jsonrpc::ErrorPayload;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("upstream error {code}: {message}")]
    Upstream { code: i64, message: String },

    #[error("request canceled")]
    Canceled,

    #[error("RPC request failed")]
    UnparseableResponse,
}

impl RpcClientError {
    /// Maps this error onto the JSON-RPC error codes the gateway's wire
    /// format uses.
    pub fn to_error_payload(&self) -> ErrorPayload {
        match self {
            RpcClientError::Transport(msg) => ErrorPayload::new(ErrorPayload::INTERNAL_ERROR, msg.clone()),
            RpcClientError::InvalidParams(msg) => ErrorPayload::new(ErrorPayload::INVALID_REQUEST, msg.clone()),
            RpcClientError::Upstream { code, message } => ErrorPayload::new(*code, message.clone()),
            RpcClientError::Canceled => ErrorPayload::new(ErrorPayload::INTERNAL_ERROR, "request canceled"),
            RpcClientError::UnparseableResponse => {
                ErrorPayload::new(ErrorPayload::INTERNAL_ERROR, "RPC request failed")
            }
        }
    }
}
