use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use primitives::jsonrpc::{Id, Request, Response};
use rpc_client::{call, Backend};
use wallet::WalletApi;

use crate::handlers::handle_request;
use crate::state::GatewayState;

/// Owns the gateway's listening socket and wallet filesystem listener.
/// `start` performs the chain-id bootstrap and blocks serving requests
/// until `stop` is called (or the process receives a shutdown signal).
pub struct GatewayServer {
    state: GatewayState,
    bind_addr: SocketAddr,
    cancellation: CancellationToken,
    listener_done: std::sync::Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatewayServer {
    /// Resolves the chain id (bootstrapping via `net_version` upstream
    /// when `configured_chain_id` is absent), initializes the wallet,
    /// and starts its filesystem listener. Either failure aborts start.
    pub async fn start(
        wallet: Arc<wallet::FileSystemWallet>,
        backend: Arc<dyn Backend>,
        configured_chain_id: Option<u64>,
        bind_addr: SocketAddr,
        start_listener: bool,
    ) -> Result<Self, crate::error::RpcError> {
        let cancellation = wallet.cancellation_token();

        let chain_id = match configured_chain_id {
            Some(id) => id,
            None => {
                let version: String =
                    call(backend.as_ref(), "net_version", serde_json::json!([]), &cancellation).await?;
                version
                    .trim()
                    .parse()
                    .map_err(|_| crate::error::RpcError::InvalidRequest(format!("unexpected net_version reply: {version}")))?
            }
        };

        wallet.initialize()?;

        let listener_done = if start_listener {
            Some(wallet.start_listener()?)
        } else {
            None
        };

        Ok(GatewayServer {
            state: GatewayState {
                wallet,
                backend,
                chain_id,
            },
            bind_addr,
            cancellation,
            listener_done: std::sync::Mutex::new(listener_done),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.state.chain_id
    }

    /// Binds and serves until [`GatewayServer::stop`] fires the
    /// cancellation token, then returns once the listener has drained.
    pub async fn serve(&self) -> std::io::Result<()> {
        let router = Router::new()
            .route("/", post(handle_http))
            .with_state(self.state.clone());

        let listener = TcpListener::bind(self.bind_addr).await?;
        let cancellation = self.cancellation.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move { cancellation.cancelled().await })
            .await
    }

    /// Fires the shared cancellation token: in-flight requests observe
    /// it cooperatively, the HTTP server stops accepting new connections,
    /// and the wallet's filesystem listener winds down.
    pub fn stop(&self) {
        self.state.wallet.close();
    }

    /// Waits for the wallet's filesystem listener to confirm it has
    /// exited, if one was started.
    pub async fn wait_stop(&self) {
        let receiver = self.listener_done.lock().expect("listener_done mutex poisoned").take();
        if let Some(receiver) = receiver {
            let _ = receiver.await;
        }
    }
}

async fn handle_http(State(state): State<GatewayState>, body: axum::body::Bytes) -> (StatusCode, axum::body::Bytes) {
    let cancellation = state.wallet.cancellation_token();
    let first_non_ws = body.iter().find(|b| !b.is_ascii_whitespace()).copied();

    if first_non_ws == Some(b'[') {
        let requests: Vec<Request> = match serde_json::from_slice(&body) {
            Ok(requests) => requests,
            Err(_) => return bad_request(),
        };
        if requests.is_empty() {
            return bad_request();
        }

        let mut tasks = Vec::with_capacity(requests.len());
        for request in requests {
            let state = state.clone();
            let cancellation = cancellation.clone();
            tasks.push(tokio::spawn(async move { handle_request(&state, request, &cancellation).await }));
        }

        let mut responses = Vec::with_capacity(tasks.len());
        let mut any_error = false;
        for task in tasks {
            let response = task.await.unwrap_or_else(|_| {
                Response::error(
                    Id::None,
                    primitives::jsonrpc::ErrorPayload::new(
                        primitives::jsonrpc::ErrorPayload::INTERNAL_ERROR,
                        "handler task panicked",
                    ),
                )
            });
            any_error |= response.is_error();
            responses.push(response);
        }

        let status = if any_error { StatusCode::INTERNAL_SERVER_ERROR } else { StatusCode::OK };
        let payload = serde_json::to_vec(&responses).expect("Vec<Response> always serializes");
        (status, axum::body::Bytes::from(payload))
    } else {
        let request: Request = match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(_) => return bad_request(),
        };

        let response = handle_request(&state, request, &cancellation).await;
        let status = if response.is_error() { StatusCode::INTERNAL_SERVER_ERROR } else { StatusCode::OK };
        let payload = serde_json::to_vec(&response).expect("Response always serializes");
        (status, axum::body::Bytes::from(payload))
    }
}

fn bad_request() -> (StatusCode, axum::body::Bytes) {
    let response = Response::error(
        Id::None,
        primitives::jsonrpc::ErrorPayload::new(primitives::jsonrpc::ErrorPayload::INVALID_REQUEST, "Invalid request data"),
    );
    let payload = serde_json::to_vec(&response).expect("Response always serializes");
    (StatusCode::BAD_REQUEST, axum::body::Bytes::from(payload))
}
