use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;

use wallet::{DiscoveryMode, MetadataMode};

/// Everything the gateway needs to start, gathered from env vars (or
/// constructed directly by tests). A generalised config-file/flag
/// framework is explicitly out of scope; this is a plain data struct.
#[derive(Clone)]
pub struct GatewayConfig {
    pub key_dir: PathBuf,
    pub discovery: DiscoveryMode,
    pub metadata_mode: MetadataMode,
    pub default_password_file: Option<PathBuf>,
    pub signer_cache_capacity: u64,
    pub signer_cache_ttl: Duration,
    pub listener_enabled: bool,
    pub upstream_url: String,
    /// `None` means "bootstrap via `net_version` at start".
    pub chain_id: Option<u64>,
    pub bind_addr: SocketAddr,
    pub concurrency_limit: Option<usize>,
    pub batch: Option<BatchTuning>,
}

#[derive(Clone)]
pub struct BatchTuning {
    pub max_batch_size: usize,
    pub batch_timeout: Duration,
    pub worker_pool_size: usize,
    pub exclude_method_regex: Option<Regex>,
}

impl GatewayConfig {
    /// Extension-mode discovery with a keystore-adjacent password file,
    /// no listener, no batching, no concurrency cap — the minimal
    /// configuration most deployments start from.
    pub fn minimal(key_dir: PathBuf, upstream_url: String, bind_addr: SocketAddr) -> Self {
        GatewayConfig {
            key_dir,
            discovery: DiscoveryMode::extension(".key.json"),
            metadata_mode: MetadataMode::None {
                password_extension: ".pwd".to_string(),
            },
            default_password_file: None,
            signer_cache_capacity: 100,
            signer_cache_ttl: Duration::from_secs(300),
            listener_enabled: true,
            upstream_url,
            chain_id: None,
            bind_addr,
            concurrency_limit: None,
            batch: None,
        }
    }
}
