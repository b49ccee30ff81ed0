//! Shared in-memory job registry.
//!
//! The registry is the single source of truth for job status. It is owned
//! behind an `Arc` by both the HTTP layer (reads) and the background work
//! units (writes), so all access goes through an async [`RwLock`]. Each
//! method takes the lock for the duration of one map operation only; state
//! and payload change together under the write guard, so readers always see
//! a terminal state with its payload attached.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::job::{Job, JobState};
use crate::types::JobId;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Job {0} is already tracked")]
    DuplicateJob(JobId),

    #[error("Job {0} is not tracked")]
    UnknownJob(JobId),

    #[error("Job {id} is already {state} and cannot change state again")]
    InvalidTransition { id: JobId, state: &'static str },
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// In-memory map of every job this process knows about.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Track a newly submitted job in the `Pending` state.
    ///
    /// Must happen before the submission call returns the id to the caller,
    /// so a status query can never observe a submitted-but-unknown job.
    pub async fn create(&self, id: JobId) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&id) {
            return Err(RegistryError::DuplicateJob(id));
        }
        jobs.insert(id, Job::pending(id));
        Ok(())
    }

    /// Move a pending job to `Success`, recording where the result lives.
    pub async fn mark_success(
        &self,
        id: JobId,
        storage_key: String,
    ) -> Result<(), RegistryError> {
        self.transition(id, JobState::Success { storage_key }).await
    }

    /// Move a pending job to `Error`, recording what went wrong.
    pub async fn mark_error(&self, id: JobId, message: String) -> Result<(), RegistryError> {
        self.transition(id, JobState::Error { message }).await
    }

    /// Snapshot of a single job, or `None` if the id was never tracked.
    ///
    /// Returns an owned copy so the lock is released before the caller does
    /// anything slow with the result.
    pub async fn get(&self, id: JobId) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Insert a job directly in the `Success` state.
    ///
    /// Used when rebuilding the registry from the result store at startup,
    /// before the process accepts any traffic. Overwrites any existing entry
    /// for the id; the store listing is authoritative at that point.
    pub async fn seed(&self, id: JobId, storage_key: String) {
        let mut jobs = self.jobs.write().await;
        jobs.insert(
            id,
            Job {
                id,
                state: JobState::Success { storage_key },
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Apply a terminal state to a job that must currently be pending.
    async fn transition(&self, id: JobId, next: JobState) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(RegistryError::UnknownJob(id))?;
        if job.state.is_terminal() {
            return Err(RegistryError::InvalidTransition {
                id,
                state: job.state.label(),
            });
        }
        job.state = next;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn id() -> JobId {
        uuid::Uuid::new_v4()
    }

    // -- creation and lookup --

    #[tokio::test]
    async fn created_job_is_pending() {
        let registry = JobRegistry::new();
        let job_id = id();

        registry.create(job_id).await.unwrap();

        let job = registry.get(job_id).await.unwrap();
        assert_eq!(job.id, job_id);
        assert_eq!(job.state, JobState::Pending);
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let registry = JobRegistry::new();
        assert!(registry.get(id()).await.is_none());
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let registry = JobRegistry::new();
        let job_id = id();

        registry.create(job_id).await.unwrap();
        let err = registry.create(job_id).await.unwrap_err();

        assert!(matches!(err, RegistryError::DuplicateJob(d) if d == job_id));
    }

    // -- transitions --

    #[tokio::test]
    async fn mark_success_stores_the_key() {
        let registry = JobRegistry::new();
        let job_id = id();
        registry.create(job_id).await.unwrap();

        registry
            .mark_success(job_id, "outputs/abc/result".into())
            .await
            .unwrap();

        let job = registry.get(job_id).await.unwrap();
        assert_eq!(
            job.state,
            JobState::Success {
                storage_key: "outputs/abc/result".into()
            }
        );
    }

    #[tokio::test]
    async fn mark_error_stores_the_message() {
        let registry = JobRegistry::new();
        let job_id = id();
        registry.create(job_id).await.unwrap();

        registry
            .mark_error(job_id, "inference endpoint unreachable".into())
            .await
            .unwrap();

        let job = registry.get(job_id).await.unwrap();
        assert_eq!(
            job.state,
            JobState::Error {
                message: "inference endpoint unreachable".into()
            }
        );
    }

    #[tokio::test]
    async fn transition_on_unknown_job_fails() {
        let registry = JobRegistry::new();
        let err = registry
            .mark_error(id(), "boom".into())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownJob(_)));
    }

    #[tokio::test]
    async fn terminal_jobs_cannot_transition_again() {
        let registry = JobRegistry::new();
        let job_id = id();
        registry.create(job_id).await.unwrap();
        registry.mark_success(job_id, "k".into()).await.unwrap();

        let err = registry
            .mark_error(job_id, "late failure".into())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidTransition {
                state: "SUCCESS",
                ..
            }
        ));

        // The original outcome is untouched.
        let job = registry.get(job_id).await.unwrap();
        assert_eq!(
            job.state,
            JobState::Success {
                storage_key: "k".into()
            }
        );
    }

    // -- seeding --

    #[tokio::test]
    async fn seed_inserts_success_directly() {
        let registry = JobRegistry::new();
        let job_id = id();

        registry.seed(job_id, "outputs/old/result".into()).await;

        let job = registry.get(job_id).await.unwrap();
        assert_eq!(
            job.state,
            JobState::Success {
                storage_key: "outputs/old/result".into()
            }
        );
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn seed_overwrites_existing_entry() {
        let registry = JobRegistry::new();
        let job_id = id();
        registry.create(job_id).await.unwrap();

        registry.seed(job_id, "outputs/new/result".into()).await;

        let job = registry.get(job_id).await.unwrap();
        assert!(job.state.is_terminal());
        assert_eq!(registry.len().await, 1);
    }

    // -- concurrency --

    #[tokio::test]
    async fn concurrent_jobs_do_not_interfere() {
        let registry = Arc::new(JobRegistry::new());

        let mut handles = Vec::new();
        for n in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let job_id = uuid::Uuid::new_v4();
                registry.create(job_id).await.unwrap();
                if n % 2 == 0 {
                    registry
                        .mark_success(job_id, format!("outputs/{job_id}/result"))
                        .await
                        .unwrap();
                } else {
                    registry
                        .mark_error(job_id, format!("job {n} failed"))
                        .await
                        .unwrap();
                }
                job_id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        assert_eq!(registry.len().await, 16);
        for job_id in ids {
            let job = registry.get(job_id).await.unwrap();
            assert!(job.state.is_terminal());
        }
    }
}
