use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rpc_client::HttpBackend;
use wallet::{DiscoveryMode, FileSystemWallet, MetadataMode};

use gateway::{BatchTuning, GatewayConfig, GatewayServer};

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn load_config() -> GatewayConfig {
    let key_dir = PathBuf::from(env_var("GATEWAY_KEY_DIR").expect("GATEWAY_KEY_DIR must be set"));
    let upstream_url = env_var("GATEWAY_UPSTREAM_URL").expect("GATEWAY_UPSTREAM_URL must be set");
    let bind_addr: SocketAddr = env_var("GATEWAY_BIND_ADDR")
        .unwrap_or_else(|| "127.0.0.1:8545".to_string())
        .parse()
        .expect("GATEWAY_BIND_ADDR must be a valid socket address");

    let mut config = GatewayConfig::minimal(key_dir, upstream_url, bind_addr);

    if let Some(ext) = env_var("GATEWAY_KEY_EXTENSION") {
        config.discovery = DiscoveryMode::extension(ext);
    }

    if let Some(password_ext) = env_var("GATEWAY_PASSWORD_EXTENSION") {
        config.metadata_mode = MetadataMode::None {
            password_extension: password_ext,
        };
    }

    if let Some(default_password_file) = env_var("GATEWAY_DEFAULT_PASSWORD_FILE") {
        config.default_password_file = Some(PathBuf::from(default_password_file));
    }

    if let Some(chain_id) = env_var("GATEWAY_CHAIN_ID") {
        config.chain_id = Some(chain_id.parse().expect("GATEWAY_CHAIN_ID must be a u64"));
    }

    if let Some(capacity) = env_var("GATEWAY_SIGNER_CACHE_CAPACITY") {
        config.signer_cache_capacity = capacity.parse().expect("GATEWAY_SIGNER_CACHE_CAPACITY must be a u64");
    }

    if let Some(ttl) = env_var("GATEWAY_SIGNER_CACHE_TTL_SECS") {
        config.signer_cache_ttl = Duration::from_secs(ttl.parse().expect("GATEWAY_SIGNER_CACHE_TTL_SECS must be a u64"));
    }

    if let Some(flag) = env_var("GATEWAY_DISABLE_LISTENER") {
        config.listener_enabled = !(flag == "1" || flag.eq_ignore_ascii_case("true"));
    }

    if let Some(limit) = env_var("GATEWAY_CONCURRENCY_LIMIT") {
        config.concurrency_limit = Some(limit.parse().expect("GATEWAY_CONCURRENCY_LIMIT must be a usize"));
    }

    if let Some(max_batch_size) = env_var("GATEWAY_BATCH_MAX_SIZE") {
        let max_batch_size = max_batch_size.parse().expect("GATEWAY_BATCH_MAX_SIZE must be a usize");
        let batch_timeout = env_var("GATEWAY_BATCH_TIMEOUT_MS")
            .map(|v| Duration::from_millis(v.parse().expect("GATEWAY_BATCH_TIMEOUT_MS must be a u64")))
            .unwrap_or(rpc_client::DEFAULT_BATCH_TIMEOUT);
        let worker_pool_size = env_var("GATEWAY_BATCH_WORKER_POOL_SIZE")
            .map(|v| v.parse().expect("GATEWAY_BATCH_WORKER_POOL_SIZE must be a usize"))
            .unwrap_or(4);
        let exclude_method_regex = env_var("GATEWAY_BATCH_EXCLUDE_METHOD_REGEX")
            .map(|pattern| regex::Regex::new(&pattern).expect("GATEWAY_BATCH_EXCLUDE_METHOD_REGEX must be a valid regex"));

        config.batch = Some(BatchTuning {
            max_batch_size,
            batch_timeout,
            worker_pool_size,
            exclude_method_regex,
        });
    }

    config
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = load_config();

    let wallet = Arc::new(FileSystemWallet::new(
        config.key_dir.clone(),
        config.discovery.clone(),
        config.metadata_mode.clone(),
        config.default_password_file.clone(),
        config.signer_cache_capacity,
        config.signer_cache_ttl,
    ));

    let mut backend = HttpBackend::new(config.upstream_url.clone());
    if let Some(limit) = config.concurrency_limit {
        backend = backend.with_concurrency_limit(limit);
    }
    if let Some(batch) = &config.batch {
        let batch_config = rpc_client::BatchConfig {
            max_batch_size: batch.max_batch_size,
            batch_timeout: batch.batch_timeout,
            worker_pool_size: batch.worker_pool_size,
            exclude_method_regex: batch.exclude_method_regex.clone(),
        };
        backend = backend.with_batching(batch_config, wallet.cancellation_token());
    }

    let server = GatewayServer::start(wallet, Arc::new(backend), config.chain_id, config.bind_addr, config.listener_enabled)
        .await
        .expect("gateway failed to start");

    tracing::info!(chain_id = server.chain_id(), bind_addr = %config.bind_addr, "gateway listening");

    tokio::select! {
        result = server.serve() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "gateway server exited with an error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    server.stop();
    server.wait_stop().await;
}
