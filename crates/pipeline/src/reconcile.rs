//! Startup reconciliation of the registry against the result store.
//!
//! The registry is not durable; the store is. Before the service accepts
//! traffic, every result object found under the store's prefix is seeded
//! into the registry as a `Success` entry so that jobs completed in a
//! prior process lifetime remain queryable by id.

use futures::StreamExt;

use sd3_core::JobRegistry;
use sd3_storage::ResultStore;

/// Seed the registry from the store's completed results.
///
/// A listing failure is logged and ends reconciliation with whatever was
/// seeded so far; a stale registry is acceptable, refusing to start is
/// not. Returns the number of entries seeded.
pub async fn reconcile_registry(registry: &JobRegistry, store: &dyn ResultStore) -> usize {
    let mut results = store.list_completed();
    let mut seeded = 0;

    while let Some(next) = results.next().await {
        match next {
            Ok(result) => {
                tracing::debug!(job_id = %result.job_id, key = %result.key, "Seeding completed job");
                registry.seed(result.job_id, result.key).await;
                seeded += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, seeded, "Result listing failed, continuing with a partial seed");
                break;
            }
        }
    }

    tracing::info!(seeded, "Registry reconciled against result store");
    seeded
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
