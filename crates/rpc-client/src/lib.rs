//! Outbound JSON-RPC client: a `Backend` abstraction with an HTTP
//! implementation, request-id re-keying, concurrency limiting, and an
//! optional batching dispatcher.

mod backend;
mod batch;
mod error;
mod http;
mod id_allocator;

pub use backend::{call, Backend};
pub use batch::BatchConfig;
pub use error::RpcClientError;
pub use http::{HttpBackend, DEFAULT_BATCH_TIMEOUT};
pub use id_allocator::IdAllocator;
