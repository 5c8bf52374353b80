use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use primitives::jsonrpc::{ErrorPayload, Id, Request, Response};

use crate::backend::Backend;
use crate::batch::{BatchConfig, BatchDispatcher};
use crate::id_allocator::IdAllocator;

fn canceled_response(id: Id) -> Response {
    Response::error(id, ErrorPayload::new(ErrorPayload::INTERNAL_ERROR, "request canceled"))
}

fn transport_error_response(id: Id, message: impl Into<String>) -> Response {
    Response::error(id, ErrorPayload::new(ErrorPayload::INTERNAL_ERROR, message.into()))
}

/// An HTTP JSON-RPC backend, modeled on `reqwest`-based transports: a
/// shared client, a target URL, and an outbound id allocator that
/// re-keys every request before it hits the wire.
pub struct HttpBackend {
    client: reqwest::Client,
    url: String,
    id_allocator: IdAllocator,
    semaphore: Option<Arc<Semaphore>>,
    batch: Option<BatchDispatcher>,
}

impl HttpBackend {
    pub fn new(url: impl Into<String>) -> Self {
        HttpBackend {
            client: reqwest::Client::new(),
            url: url.into(),
            id_allocator: IdAllocator::new(),
            semaphore: None,
            batch: None,
        }
    }

    /// Caps the number of in-flight non-batched requests.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.semaphore = Some(Arc::new(Semaphore::new(limit.max(1))));
        self
    }

    /// Enables batch mode: outbound requests (except those matching
    /// `config.exclude_method_regex`) are funnelled through a batching
    /// dispatcher instead of sent individually.
    pub fn with_batching(mut self, config: BatchConfig, cancellation: CancellationToken) -> Self {
        self.batch = Some(BatchDispatcher::spawn(self.client.clone(), self.url.clone(), config, cancellation));
        self
    }

    async fn send_single(&self, request: Request, cancellation: &CancellationToken) -> Response {
        let id = request.id.clone();

        let _permit = if let Some(semaphore) = &self.semaphore {
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => return canceled_response(id),
                permit = semaphore.clone().acquire_owned() => {
                    match permit {
                        Ok(permit) => Some(permit),
                        Err(_) => None,
                    }
                }
            }
        } else {
            None
        };

        let send_result = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return canceled_response(id),
            result = self.client.post(&self.url).json(&request).send() => result,
        };

        let resp = match send_result {
            Ok(resp) => resp,
            Err(e) => return transport_error_response(id, format!("transport error: {e}")),
        };

        let status = resp.status();
        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => return transport_error_response(id, format!("transport error: {e}")),
        };

        match serde_json::from_slice::<Response>(&body) {
            Ok(mut parsed) => {
                parsed.id = id;
                parsed
            }
            Err(_) => {
                tracing::warn!(
                    %status,
                    body = %String::from_utf8_lossy(&body),
                    "unparseable RPC response body"
                );
                transport_error_response(id, "RPC request failed")
            }
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn sync_request(&self, request: Request, cancellation: &CancellationToken) -> Response {
        let original_id = request.id.clone();
        let mut request = request;
        request.id = Id::String(self.id_allocator.next_as_string());

        let mut response = match &self.batch {
            Some(dispatcher) if dispatcher.should_batch(&request.method) => {
                let method = request.method.clone();
                let rx = dispatcher.enqueue(request).await;
                tokio::select! {
                    biased;
                    _ = cancellation.cancelled() => canceled_response(original_id.clone()),
                    result = rx => result.unwrap_or_else(|_| {
                        tracing::warn!(%method, "batch dispatcher dropped a pending request");
                        canceled_response(original_id.clone())
                    }),
                }
            }
            _ => self.send_single(request, cancellation).await,
        };

        response.id = original_id;
        response
    }
}

/// A short timeout suitable for tests and local development; production
/// configuration reads this from the gateway's batch tuning knobs.
pub const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_millis(20);
