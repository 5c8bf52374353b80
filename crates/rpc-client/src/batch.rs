use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use tokio::sync::{mpsc, oneshot, Semaphore};
use tokio_util::sync::CancellationToken;

use primitives::jsonrpc::{ErrorPayload, Request, Response};

fn canceled_response(id: primitives::jsonrpc::Id) -> Response {
    Response::error(id, ErrorPayload::new(ErrorPayload::INTERNAL_ERROR, "request canceled"))
}

fn transport_error_response(id: primitives::jsonrpc::Id, message: impl Into<String>) -> Response {
    Response::error(id, ErrorPayload::new(ErrorPayload::INTERNAL_ERROR, message.into()))
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_batch_size: usize,
    pub batch_timeout: Duration,
    pub worker_pool_size: usize,
    pub exclude_method_regex: Option<Regex>,
}

struct PendingEntry {
    request: Request,
    responder: oneshot::Sender<Response>,
}

/// Accumulates outbound requests into batches and dispatches them through
/// a bounded worker pool, demultiplexing responses back to callers by
/// array position.
pub struct BatchDispatcher {
    queue: mpsc::Sender<PendingEntry>,
    exclude_method_regex: Option<Regex>,
}

impl BatchDispatcher {
    pub fn spawn(
        client: reqwest::Client,
        url: String,
        config: BatchConfig,
        cancellation: CancellationToken,
    ) -> Self {
        let (queue, rx) = mpsc::channel(1024);
        let worker_semaphore = Arc::new(Semaphore::new(config.worker_pool_size.max(1)));

        tokio::spawn(Self::run(
            client,
            url,
            config.max_batch_size.max(1),
            config.batch_timeout,
            worker_semaphore,
            rx,
            cancellation,
        ));

        BatchDispatcher {
            queue,
            exclude_method_regex: config.exclude_method_regex,
        }
    }

    pub fn should_batch(&self, method: &str) -> bool {
        match &self.exclude_method_regex {
            Some(re) => !re.is_match(method),
            None => true,
        }
    }

    pub async fn enqueue(&self, request: Request) -> oneshot::Receiver<Response> {
        let (responder, rx) = oneshot::channel();
        if self.queue.send(PendingEntry { request, responder }).await.is_err() {
            // Dispatcher task is gone; drop `rx`'s paired sender so the
            // caller observes a closed channel and treats it as canceled.
        }
        rx
    }

    async fn run(
        client: reqwest::Client,
        url: String,
        max_batch_size: usize,
        batch_timeout: Duration,
        worker_semaphore: Arc<Semaphore>,
        mut rx: mpsc::Receiver<PendingEntry>,
        cancellation: CancellationToken,
    ) {
        let mut pending: Vec<PendingEntry> = Vec::new();

        loop {
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => {
                    for entry in pending.drain(..) {
                        let _ = entry.responder.send(canceled_response(entry.request.id.clone()));
                    }
                    break;
                }

                maybe_entry = rx.recv(), if pending.is_empty() => {
                    match maybe_entry {
                        Some(entry) => pending.push(entry),
                        None => break,
                    }
                }

                _ = tokio::time::sleep(batch_timeout), if !pending.is_empty() => {
                    let batch = std::mem::take(&mut pending);
                    Self::dispatch(client.clone(), url.clone(), batch, worker_semaphore.clone());
                }

                maybe_entry = rx.recv(), if !pending.is_empty() => {
                    match maybe_entry {
                        Some(entry) => {
                            pending.push(entry);
                            if pending.len() >= max_batch_size {
                                let batch = std::mem::take(&mut pending);
                                Self::dispatch(client.clone(), url.clone(), batch, worker_semaphore.clone());
                            }
                        }
                        None => {
                            let batch = std::mem::take(&mut pending);
                            Self::dispatch(client.clone(), url.clone(), batch, worker_semaphore.clone());
                            break;
                        }
                    }
                }
            }
        }
    }

    fn dispatch(client: reqwest::Client, url: String, batch: Vec<PendingEntry>, worker_semaphore: Arc<Semaphore>) {
        tokio::spawn(async move {
            let permit = worker_semaphore.acquire_owned().await;

            let requests: Vec<&Request> = batch.iter().map(|entry| &entry.request).collect();
            let send_result = client.post(&url).json(&requests).send().await;
            drop(permit);

            let responses = match send_result {
                Ok(resp) => match resp.bytes().await {
                    Ok(body) => match serde_json::from_slice::<Vec<Response>>(&body) {
                        Ok(responses) => Ok(responses),
                        Err(_) => {
                            tracing::warn!(
                                body = %String::from_utf8_lossy(&body),
                                "unparseable batch response body"
                            );
                            Err("RPC request failed".to_string())
                        }
                    },
                    Err(e) => Err(format!("transport error: {e}")),
                },
                Err(e) => Err(format!("transport error: {e}")),
            };

            match responses {
                Ok(responses) => {
                    for (index, entry) in batch.into_iter().enumerate() {
                        let original_id = entry.request.id.clone();
                        let response = responses
                            .get(index)
                            .cloned()
                            .unwrap_or_else(|| transport_error_response(original_id.clone(), "RPC request failed"));
                        let mut response = response;
                        response.id = original_id;
                        let _ = entry.responder.send(response);
                    }
                }
                Err(message) => {
                    for entry in batch {
                        let _ = entry
                            .responder
                            .send(transport_error_response(entry.request.id.clone(), message.clone()));
                    }
                }
            }
        });
    }
}
