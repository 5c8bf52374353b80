use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use primitives::jsonrpc::{Id, Request, Response, ResponsePayload};

use crate::error::RpcClientError;

/// Outbound JSON-RPC surface a gateway talks to an upstream node through.
///
/// `sync_request` always returns a fully-populated response, even when
/// the transport itself failed — the caller forwards it to the
/// originating client as a well-formed JSON-RPC error frame rather than
/// handling a separate error path.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn sync_request(&self, request: Request, cancellation: &CancellationToken) -> Response;
}

/// Marshals `params`, invokes [`Backend::sync_request`], and unmarshals
/// the result. Marshalling failure is reported before any network I/O.
pub async fn call<B, P, R>(
    backend: &B,
    method: &str,
    params: P,
    cancellation: &CancellationToken,
) -> Result<R, RpcClientError>
where
    B: Backend + ?Sized,
    P: Serialize + Send,
    R: DeserializeOwned,
{
    let params_value =
        serde_json::to_value(params).map_err(|e| RpcClientError::InvalidParams(e.to_string()))?;

    let request = Request::new(Id::None, method, params_value);
    let response = backend.sync_request(request, cancellation).await;

    match response.payload {
        ResponsePayload::Success(value) => {
            serde_json::from_value(value).map_err(|e| RpcClientError::InvalidParams(e.to_string()))
        }
        ResponsePayload::Error(err) => Err(RpcClientError::Upstream {
            code: err.code,
            message: err.message,
        }),
    }
}
