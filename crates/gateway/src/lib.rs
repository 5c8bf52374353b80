mod config;
mod error;
mod handlers;
mod server;
mod state;

pub use config::{BatchTuning, GatewayConfig};
pub use error::RpcError;
pub use server::GatewayServer;
pub use state::GatewayState;
