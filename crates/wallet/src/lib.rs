mod cache;
mod discovery;
mod error;
mod listener;
mod metadata;
mod wallet;

pub use cache::SignerCache;
pub use discovery::{scan_directory, DiscoveredFile, DiscoveryMode};
pub use error::WalletError;
pub use listener::spawn as spawn_listener;
pub use metadata::{expand_template, parse_metadata, MetadataFormat};
pub use wallet::{write_keystore_file, FileSystemWallet, MetadataMode, WalletApi};
