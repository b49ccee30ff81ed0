//! The `ResultStore` trait and its error type.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use uuid::Uuid;

/// Errors from the result store layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Uploading a result object failed.
    #[error("Storage write failed: {0}")]
    Write(String),

    /// Presigning a download URL failed (missing key, bad credentials).
    #[error("Storage access failed: {0}")]
    Access(String),

    /// Enumerating existing result objects failed.
    #[error("Storage listing failed: {0}")]
    List(String),

    /// The connectivity probe failed.
    #[error("Storage probe failed: {0}")]
    Probe(String),
}

/// One completed result discovered in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResult {
    /// Job identifier recovered from the object key.
    pub job_id: Uuid,
    /// Full object key the result lives under.
    pub key: String,
}

/// Durable storage for generated images.
///
/// Implementations are shared behind an `Arc` between the orchestrator and
/// the startup reconciler.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Enumerate every completed result under the store's prefix.
    ///
    /// The stream is lazy and finite; each call re-enumerates from the
    /// store. Objects whose keys do not follow the result-key layout are
    /// skipped, not errors.
    fn list_completed(&self) -> BoxStream<'_, Result<StoredResult, StorageError>>;

    /// Upload a result object. Idempotent: re-storing a key overwrites it.
    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError>;

    /// Produce a download URL valid for `ttl` from now.
    async fn presign(&self, key: &str, ttl: Duration) -> Result<String, StorageError>;

    /// Lightweight connectivity check for health reporting.
    async fn probe(&self) -> Result<(), StorageError>;
}
