use std::sync::Arc;

use rpc_client::Backend;
use wallet::FileSystemWallet;

/// Shared state handed to every request handler: the wallet that holds
/// signing keys and the backend that reaches the upstream node.
#[derive(Clone)]
pub struct GatewayState {
    pub wallet: Arc<FileSystemWallet>,
    pub backend: Arc<dyn Backend>,
    pub chain_id: u64,
}
