use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use primitives::Address;
use signer::KeyPair;

/// An LRU, TTL-bounded cache of decrypted signers.
///
/// A hit extends the entry's idle timer (`time_to_idle`), so a
/// continuously-used address never expires; an address untouched for the
/// configured duration is evicted and its `KeyPair` dropped, zeroizing the
/// private key.
pub struct SignerCache {
    inner: Cache<Address, Arc<KeyPair>>,
}

impl SignerCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_idle(ttl)
            .build();
        SignerCache { inner }
    }

    pub fn get(&self, address: &Address) -> Option<Arc<KeyPair>> {
        self.inner.get(address)
    }

    pub fn insert(&self, address: Address, key_pair: Arc<KeyPair>) {
        self.inner.insert(address, key_pair);
    }

    pub fn invalidate(&self, address: &Address) {
        self.inner.invalidate(address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get_hits() {
        let cache = SignerCache::new(10, Duration::from_secs(60));
        let kp = Arc::new(KeyPair::random());
        let addr = kp.address();
        cache.insert(addr, kp.clone());
        assert!(cache.get(&addr).is_some());
    }

    #[test]
    fn miss_returns_none() {
        let cache = SignerCache::new(10, Duration::from_secs(60));
        let addr = KeyPair::random().address();
        assert!(cache.get(&addr).is_none());
    }
}
