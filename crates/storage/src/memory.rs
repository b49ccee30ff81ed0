//! In-memory result store for tests and local development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::RwLock;

use crate::key::parse_result_key;
use crate::store::{ResultStore, StorageError, StoredResult};

/// Result store held entirely in process memory.
///
/// Presigned URLs are `memory://` URIs embedding the key, the TTL, and a
/// per-call signature counter, so each presign call is observably fresh.
/// [`set_unavailable`](Self::set_unavailable) simulates a store outage:
/// every operation fails until availability is restored.
pub struct MemoryResultStore {
    prefix: String,
    objects: RwLock<HashMap<String, Vec<u8>>>,
    presigns: AtomicU64,
    unavailable: AtomicBool,
}

impl MemoryResultStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            objects: RwLock::new(HashMap::new()),
            presigns: AtomicU64::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Toggle a simulated outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Stored bytes for a key, if present.
    pub async fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(key).cloned()
    }

    /// Number of presign calls served so far.
    pub fn presign_count(&self) -> u64 {
        self.presigns.load(Ordering::SeqCst)
    }

    fn check_available(&self, err: fn(String) -> StorageError) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(err("memory store is unavailable".into()));
        }
        Ok(())
    }

    async fn snapshot(&self) -> Vec<Result<StoredResult, StorageError>> {
        if let Err(e) = self.check_available(StorageError::List) {
            return vec![Err(e)];
        }
        self.objects
            .read()
            .await
            .keys()
            .filter_map(|key| {
                parse_result_key(&self.prefix, key).map(|job_id| {
                    Ok(StoredResult {
                        job_id,
                        key: key.clone(),
                    })
                })
            })
            .collect()
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    fn list_completed(&self) -> BoxStream<'_, Result<StoredResult, StorageError>> {
        futures::stream::once(async move { self.snapshot().await })
            .flat_map(futures::stream::iter)
            .boxed()
    }

    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        self.check_available(StorageError::Write)?;
        self.objects.write().await.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn presign(&self, key: &str, ttl: Duration) -> Result<String, StorageError> {
        self.check_available(StorageError::Access)?;
        if !self.objects.read().await.contains_key(key) {
            return Err(StorageError::Access(format!("no object under key {key}")));
        }
        let signature = self.presigns.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "memory://{key}?ttl_secs={}&sig={signature}",
            ttl.as_secs()
        ))
    }

    async fn probe(&self) -> Result<(), StorageError> {
        self.check_available(StorageError::Probe)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
