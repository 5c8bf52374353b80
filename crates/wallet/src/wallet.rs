use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use keystore::KdfRequest;
use primitives::Address;
use signer::KeyPair;

use crate::cache::SignerCache;
use crate::discovery::{scan_directory, DiscoveredFile, DiscoveryMode};
use crate::error::WalletError;
use crate::metadata::{expand_template, parse_metadata, MetadataFormat};

/// Governs how the keystore and password paths for an address are found.
#[derive(Debug, Clone)]
pub enum MetadataMode {
    /// The primary file is itself the keystore; the password file is
    /// `<key_dir>/<address-without-0x><password_extension>`, falling back
    /// to the wallet's default password file if that's absent.
    None { password_extension: String },
    /// The primary file is parsed as metadata and two templates are
    /// expanded against it to produce the key and password filenames.
    Metadata {
        format: Option<MetadataFormat>,
        key_template: String,
        password_template: String,
    },
}

/// Capability surface a wallet exposes: sign via a looked-up signer,
/// initialize its on-disk view, enumerate known addresses, and refresh
/// that view.
pub trait WalletApi: Send + Sync {
    fn initialize(&self) -> Result<(), WalletError>;
    fn get_signer(&self, address: &Address) -> Result<Arc<KeyPair>, WalletError>;
    fn address_list(&self) -> Vec<Address>;
    fn refresh(&self) -> Result<(), WalletError>;
    fn close(&self);
}

struct Inner {
    address_list: Vec<Address>,
    address_to_file: HashMap<Address, PathBuf>,
}

pub struct FileSystemWallet {
    key_dir: PathBuf,
    discovery: DiscoveryMode,
    metadata_mode: MetadataMode,
    default_password_file: Option<PathBuf>,
    cache: SignerCache,
    inner: RwLock<Inner>,
    async_listeners: Mutex<Vec<mpsc::UnboundedSender<Address>>>,
    sync_callback: Mutex<Option<Box<dyn Fn(Address) -> Result<(), WalletError> + Send + Sync>>>,
    cancellation: CancellationToken,
}

impl FileSystemWallet {
    pub fn new(
        key_dir: impl Into<PathBuf>,
        discovery: DiscoveryMode,
        metadata_mode: MetadataMode,
        default_password_file: Option<PathBuf>,
        cache_capacity: u64,
        cache_ttl: Duration,
    ) -> Self {
        FileSystemWallet {
            key_dir: key_dir.into(),
            discovery,
            metadata_mode,
            default_password_file,
            cache: SignerCache::new(cache_capacity, cache_ttl),
            inner: RwLock::new(Inner {
                address_list: Vec::new(),
                address_to_file: HashMap::new(),
            }),
            async_listeners: Mutex::new(Vec::new()),
            sync_callback: Mutex::new(None),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn key_dir(&self) -> &Path {
        &self.key_dir
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Starts the background filesystem-event listener, handing late
    /// arriving files to [`FileSystemWallet::notify_new_file`] one at a
    /// time rather than triggering a full rescan. Stops when the
    /// wallet's cancellation token fires, e.g. via [`WalletApi::close`].
    pub fn start_listener(self: &Arc<Self>) -> Result<tokio::sync::oneshot::Receiver<()>, WalletError> {
        let wallet = self.clone();
        crate::listener::spawn(self.key_dir.clone(), self.cancellation.clone(), move |path| {
            if let Err(e) = wallet.notify_new_file(path) {
                tracing::warn!(error = %e, "failed to process new key file");
            }
        })
    }

    /// Registers an asynchronous fan-out listener. Dispatch to it happens
    /// off the wallet lock.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Address> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.async_listeners.lock().expect("async_listeners lock poisoned").push(tx);
        rx
    }

    /// Registers the single synchronous callback, invoked under the
    /// wallet lock for each new address in order. Replaces any previously
    /// registered callback.
    pub fn set_sync_callback<F>(&self, callback: F)
    where
        F: Fn(Address) -> Result<(), WalletError> + Send + Sync + 'static,
    {
        *self.sync_callback.lock().expect("sync_callback lock poisoned") = Some(Box::new(callback));
    }

    /// Notifies the wallet that a single file just appeared, without a
    /// full directory rescan. Used by the filesystem listener.
    pub fn notify_new_file(&self, path: &Path) -> Result<(), WalletError> {
        if !path.is_file() {
            return Ok(());
        }
        let Some(discovered) = crate::discovery::match_file(path, &self.discovery) else {
            return Ok(());
        };

        let newly_added = self.apply_discovered(vec![discovered])?;
        self.dispatch_notifications(newly_added)
    }

    fn apply_discovered(&self, entries: Vec<DiscoveredFile>) -> Result<Vec<Address>, WalletError> {
        let mut inner = self.inner.write().expect("wallet lock poisoned");
        let mut newly_added = Vec::new();
        for entry in entries {
            match inner.address_to_file.get(&entry.address) {
                Some(existing) if existing == &entry.path => {}
                Some(_) => {
                    inner.address_to_file.insert(entry.address, entry.path);
                }
                None => {
                    inner.address_list.push(entry.address);
                    inner.address_to_file.insert(entry.address, entry.path);
                    newly_added.push(entry.address);
                }
            }
        }
        Ok(newly_added)
    }

    fn dispatch_notifications(&self, newly_added: Vec<Address>) -> Result<(), WalletError> {
        if newly_added.is_empty() {
            return Ok(());
        }

        {
            let callback = self.sync_callback.lock().expect("sync_callback lock poisoned");
            if let Some(callback) = callback.as_ref() {
                for address in &newly_added {
                    callback(*address).map_err(|e| WalletError::CallbackAborted(e.to_string()))?;
                }
            }
        }

        let listeners = self.async_listeners.lock().expect("async_listeners lock poisoned");
        for address in &newly_added {
            for listener in listeners.iter() {
                let _ = listener.send(*address);
            }
        }

        Ok(())
    }

    fn resolve_key_and_password(
        &self,
        address: &Address,
        primary_path: &Path,
    ) -> Result<(Vec<u8>, Vec<u8>), WalletError> {
        match &self.metadata_mode {
            MetadataMode::None { password_extension } => {
                let key_bytes = std::fs::read(primary_path)?;
                let password_path = self.password_path_for(address, password_extension);
                let password_bytes = self.read_password(&password_path)?;
                Ok((key_bytes, password_bytes))
            }
            MetadataMode::Metadata {
                format,
                key_template,
                password_template,
            } => {
                let primary_bytes = std::fs::read(primary_path)?;
                let format = format.unwrap_or_else(|| {
                    primary_path
                        .extension()
                        .and_then(|e| e.to_str())
                        .and_then(MetadataFormat::from_extension)
                        .unwrap_or(MetadataFormat::Json)
                });
                let metadata = parse_metadata(&primary_bytes, format)?;

                let key_file = expand_template(key_template, &metadata)?;
                let password_file = expand_template(password_template, &metadata)?;

                let key_bytes = std::fs::read(self.key_dir.join(key_file))?;
                let password_bytes = self.read_password(&self.key_dir.join(password_file))?;
                Ok((key_bytes, password_bytes))
            }
        }
    }

    fn password_path_for(&self, address: &Address, password_extension: &str) -> PathBuf {
        self.key_dir.join(format!("{}{}", address.to_hex_bare(), password_extension))
    }

    fn read_password(&self, primary: &Path) -> Result<Vec<u8>, WalletError> {
        if primary.exists() {
            return Ok(std::fs::read(primary)?);
        }
        match &self.default_password_file {
            Some(default_path) => Ok(std::fs::read(default_path)?),
            None => Err(WalletError::Io(format!(
                "no password file at {} and no default configured",
                primary.display()
            ))),
        }
    }
}

impl WalletApi for FileSystemWallet {
    fn initialize(&self) -> Result<(), WalletError> {
        self.refresh()
    }

    fn get_signer(&self, address: &Address) -> Result<Arc<KeyPair>, WalletError> {
        if let Some(hit) = self.cache.get(address) {
            return Ok(hit);
        }

        let primary_path = {
            let inner = self.inner.read().expect("wallet lock poisoned");
            inner
                .address_to_file
                .get(address)
                .cloned()
                .ok_or(WalletError::NotAvailable)?
        };

        let (key_bytes, password_bytes) = self.resolve_key_and_password(address, &primary_path)?;

        let keystore_json = std::str::from_utf8(&key_bytes)
            .map_err(|e| WalletError::MetadataParse(e.to_string()))?;
        let keystore_file = keystore::read(keystore_json)?;
        let private_key = keystore::decrypt(&keystore_file, &password_bytes)?;

        let key_pair = KeyPair::from_bytes(private_key)?;
        if &key_pair.address() != address {
            return Err(WalletError::AddressMismatch);
        }

        let key_pair = Arc::new(key_pair);
        self.cache.insert(*address, key_pair.clone());
        Ok(key_pair)
    }

    fn address_list(&self) -> Vec<Address> {
        self.inner.read().expect("wallet lock poisoned").address_list.clone()
    }

    fn refresh(&self) -> Result<(), WalletError> {
        let discovered = scan_directory(&self.key_dir, &self.discovery)?;
        let newly_added = self.apply_discovered(discovered)?;
        self.dispatch_notifications(newly_added)
    }

    fn close(&self) {
        self.cancellation.cancel();
    }
}

/// Writes a fresh Keystore V3 file into `key_dir`, named per `discovery`'s
/// convention. Convenience for tests and onboarding flows; the gateway
/// itself only ever reads existing keystores.
pub fn write_keystore_file(
    key_dir: &Path,
    address: &Address,
    private_key: &[u8; 32],
    password: &[u8],
) -> Result<PathBuf, WalletError> {
    let file = keystore::write(password, private_key, KdfRequest::Scrypt { n: 4096, p: 1, r: 8 }, Some(address.to_string()))?;
    let path = key_dir.join(format!("{}.key.json", address.to_hex_bare()));
    std::fs::write(&path, serde_json::to_vec_pretty(&file).map_err(|e| WalletError::Io(e.to_string()))?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn setup_wallet_with_one_key() -> (tempfile::TempDir, FileSystemWallet, Address, [u8; 32]) {
        let dir = tempfile::tempdir().unwrap();
        let mut private_key = [0u8; 32];
        private_key[31] = 5;
        let key_pair = KeyPair::from_bytes(private_key).unwrap();
        let address = key_pair.address();

        write_keystore_file(dir.path(), &address, &private_key, b"hunter2").unwrap();
        std::fs::write(
            dir.path().join(format!("{}.pwd", address.to_hex_bare())),
            "hunter2",
        )
        .unwrap();

        let wallet = FileSystemWallet::new(
            dir.path(),
            DiscoveryMode::extension(".key.json"),
            MetadataMode::None {
                password_extension: ".pwd".to_string(),
            },
            None,
            10,
            Duration::from_secs(60),
        );

        (dir, wallet, address, private_key)
    }

    #[test]
    fn refresh_then_get_signer_decrypts_matching_key() {
        let (_dir, wallet, address, private_key) = setup_wallet_with_one_key();
        wallet.initialize().unwrap();

        assert_eq!(wallet.address_list(), vec![address]);

        let signer = wallet.get_signer(&address).unwrap();
        assert_eq!(signer.to_bytes(), private_key);
    }

    #[test]
    fn get_signer_on_unknown_address_is_not_available() {
        let (_dir, wallet, _address, _pk) = setup_wallet_with_one_key();
        wallet.initialize().unwrap();

        let unknown = KeyPair::random().address();
        assert!(matches!(wallet.get_signer(&unknown), Err(WalletError::NotAvailable)));
    }

    #[test]
    fn second_refresh_does_not_duplicate_addresses() {
        let (_dir, wallet, address, _pk) = setup_wallet_with_one_key();
        wallet.initialize().unwrap();
        wallet.refresh().unwrap();

        assert_eq!(wallet.address_list(), vec![address]);
    }

    #[test]
    fn sync_callback_runs_once_per_new_address() {
        let (_dir, wallet, _address, _pk) = setup_wallet_with_one_key();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        wallet.set_sync_callback(move |_addr| {
            count_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        wallet.initialize().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        wallet.refresh().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn sync_callback_error_aborts_refresh() {
        let (_dir, wallet, _address, _pk) = setup_wallet_with_one_key();
        wallet.set_sync_callback(|_addr| Err(WalletError::NotAvailable));

        assert!(wallet.initialize().is_err());
    }
}
