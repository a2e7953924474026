use log::{debug, warn};
use reqwest::{blocking::Client, StatusCode};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    thread,
    time::Duration,
};

use crate::errors::{EarthstackError, Result};

/// Key-value storage for opaque example blobs.
pub trait ObjectStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;
    fn get(&self, key: &str) -> Result<Vec<u8>>;
}

/// Opens store connections.
///
/// The serving layer connects once per access and shares nothing between
/// calls; a pooling provider must keep that no-shared-cache contract.
pub trait StoreProvider {
    type Store: ObjectStore;
    fn connect(&self) -> Result<Self::Store>;
}

#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub bucket: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9000".into(),
            bucket: "bigearthnet-processed".into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 300,
        }
    }
}

/// S3-compatible store addressed as `<endpoint>/<bucket>/<key>`.
pub struct S3Store {
    client: Client,
    config: S3Config,
}

impl S3Store {
    pub fn connect(config: S3Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|err| EarthstackError::StoreConnect(err.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.config.endpoint, self.config.bucket, key)
    }
}

impl ObjectStore for S3Store {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let response = self
            .client
            .put(self.object_url(key))
            .body(bytes.to_vec())
            .send()
            .map_err(|err| EarthstackError::StorageWrite {
                key: key.into(),
                message: err.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(EarthstackError::StorageWrite {
                key: key.into(),
                message: format!("status {}", response.status()),
            });
        }
        debug!("put {key} ({} bytes)", bytes.len());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let response = self.client.get(self.object_url(key)).send().map_err(|err| {
            EarthstackError::StorageRead {
                key: key.into(),
                message: err.to_string(),
            }
        })?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(EarthstackError::ObjectNotFound { key: key.into() });
        }
        if !response.status().is_success() {
            return Err(EarthstackError::StorageRead {
                key: key.into(),
                message: format!("status {}", response.status()),
            });
        }
        let bytes = response.bytes().map_err(|err| EarthstackError::StorageRead {
            key: key.into(),
            message: err.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}

impl StoreProvider for S3Config {
    type Store = S3Store;

    fn connect(&self) -> Result<S3Store> {
        S3Store::connect(self.clone())
    }
}

/// In-memory store for tests and local runs; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore(Arc<Mutex<HashMap<String, Vec<u8>>>>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    fn map(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectStore for MemoryStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.map().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.map()
            .get(key)
            .cloned()
            .ok_or_else(|| EarthstackError::ObjectNotFound { key: key.into() })
    }
}

impl StoreProvider for MemoryStore {
    type Store = MemoryStore;

    fn connect(&self) -> Result<MemoryStore> {
        Ok(self.clone())
    }
}

/// Bounded retry with exponential backoff around store writes.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no backoff.
    pub fn none() -> Self {
        Self {
            attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    pub fn put(&self, store: &dyn ObjectStore, key: &str, bytes: &[u8]) -> Result<()> {
        let attempts = self.attempts.max(1);
        let mut attempt = 0;
        loop {
            match store.put(key, bytes) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    attempt += 1;
                    if attempt >= attempts {
                        return Err(err);
                    }
                    warn!("put attempt {attempt}/{attempts} for {key} failed: {err}");
                    thread::sleep(self.base_delay * 2u32.pow(attempt - 1));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn memory_store_round_trips_blobs() {
        let store = MemoryStore::new();
        store.put("abc123P1", b"payload").unwrap();
        assert_eq!(store.get("abc123P1").unwrap(), b"payload");
    }

    #[test]
    fn missing_key_is_object_not_found() {
        let err = MemoryStore::new().get("nope").unwrap_err();
        assert!(matches!(err, EarthstackError::ObjectNotFound { key } if key == "nope"));
    }

    #[test]
    fn clones_share_storage() {
        let store = MemoryStore::new();
        let connection = store.connect().unwrap();
        connection.put("k", b"v").unwrap();
        assert_eq!(store.get("k").unwrap(), b"v");
    }

    /// Fails the first `failures` puts, then delegates.
    struct Flaky {
        failures: Cell<u32>,
        inner: MemoryStore,
    }

    impl ObjectStore for Flaky {
        fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(EarthstackError::StorageWrite {
                    key: key.into(),
                    message: "transient".into(),
                });
            }
            self.inner.put(key, bytes)
        }

        fn get(&self, key: &str) -> Result<Vec<u8>> {
            self.inner.get(key)
        }
    }

    #[test]
    fn retry_outlasts_transient_failures() {
        let store = Flaky {
            failures: Cell::new(2),
            inner: MemoryStore::new(),
        };
        let policy = RetryPolicy {
            attempts: 3,
            base_delay: Duration::ZERO,
        };
        policy.put(&store, "k", b"v").unwrap();
        assert_eq!(store.get("k").unwrap(), b"v");
    }

    #[test]
    fn single_attempt_surfaces_the_failure() {
        let store = Flaky {
            failures: Cell::new(1),
            inner: MemoryStore::new(),
        };
        let err = RetryPolicy::none().put(&store, "k", b"v").unwrap_err();
        assert!(matches!(err, EarthstackError::StorageWrite { .. }));
        assert!(store.inner.is_empty());
    }
}
