//! In-process object store.
//!
//! Clones share state, so a test can hand one clone to the publisher and
//! inspect the other afterwards.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{ObjectStore, StoreConnector, StoreError};
use crate::asset::HeaderSet;

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub headers: HeaderSet,
}

#[derive(Debug, Default)]
struct Inner {
    objects: Mutex<FxHashMap<String, StoredObject>>,
    failing: Mutex<FxHashSet<String>>,
    puts: AtomicUsize,
    exists_calls: AtomicUsize,
    connects: AtomicUsize,
    unreachable: AtomicBool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `put` of `key` fail with a 500.
    pub fn fail_key(&self, key: impl Into<String>) {
        self.inner.failing.lock().insert(key.into());
    }

    /// Make `connect` fail.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.inner.objects.lock().get(key).cloned()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.inner.objects.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn put_count(&self) -> usize {
        self.inner.puts.load(Ordering::SeqCst)
    }

    pub fn exists_count(&self) -> usize {
        self.inner.exists_calls.load(Ordering::SeqCst)
    }

    pub fn connect_count(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    /// Total store calls of any kind.
    pub fn call_count(&self) -> usize {
        self.put_count() + self.exists_count() + self.connect_count()
    }
}

impl ObjectStore for MemoryStore {
    fn put(&self, key: &str, body: &[u8], headers: &HeaderSet) -> Result<(), StoreError> {
        self.inner.puts.fetch_add(1, Ordering::SeqCst);
        if self.inner.failing.lock().contains(key) {
            return Err(StoreError::Status {
                key: key.to_owned(),
                code: 500,
            });
        }
        self.inner.objects.lock().insert(
            key.to_owned(),
            StoredObject {
                body: body.to_vec(),
                headers: headers.clone(),
            },
        );
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.inner.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.inner.objects.lock().contains_key(key))
    }
}

/// Connector handing out clones of one [`MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    store: MemoryStore,
}

impl MemoryConnector {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

impl StoreConnector for MemoryConnector {
    type Store = MemoryStore;

    fn connect(&self) -> Result<MemoryStore, StoreError> {
        self.store.inner.connects.fetch_add(1, Ordering::SeqCst);
        if self.store.inner.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("store unreachable".into()));
        }
        Ok(self.store.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_exists() {
        let store = MemoryStore::new();
        let mut headers = HeaderSet::new();
        headers.insert("Content-Type", "image/png");

        assert!(!store.exists("images/a.png").unwrap());
        store.put("images/a.png", b"png", &headers).unwrap();
        assert!(store.exists("images/a.png").unwrap());

        let stored = store.get("images/a.png").unwrap();
        assert_eq!(stored.body, b"png");
        assert_eq!(stored.headers.get("content-type"), Some("image/png"));
        assert_eq!(store.put_count(), 1);
        assert_eq!(store.exists_count(), 2);
    }

    #[test]
    fn test_injected_failures() {
        let store = MemoryStore::new();
        store.fail_key("bad");
        assert!(store.put("bad", b"", &HeaderSet::new()).is_err());
        assert!(store.keys().is_empty());

        let connector = MemoryConnector::new(store.clone());
        store.set_unreachable(true);
        assert!(connector.connect().is_err());
        store.set_unreachable(false);
        assert!(connector.connect().is_ok());
        assert_eq!(store.connect_count(), 2);
    }
}
