//! Per-job orchestration: submit, background work unit, status, health.
//!
//! [`JobOrchestrator`] owns the collaborators a job needs (registry,
//! generator, store) behind `Arc`s and spawns one detached task per
//! submission. The task always lands the job in a terminal registry state;
//! status queries only ever read the registry's current snapshot.

use std::sync::Arc;
use std::time::Duration;

use sd3_core::{JobId, JobRegistry, JobState, RegistryError};
use sd3_storage::{result_key, ResultStore, StorageError};
use sd3_torchserve::{encode_jpeg, ImageGenerator, InferenceError, PixelError};

/// Validity window of a presigned result URL. A fresh URL is computed on
/// every status query, so expiry never invalidates the job itself.
pub const RESULT_URL_TTL: Duration = Duration::from_secs(36 * 60 * 60);

/// Any failure inside the background work unit; its message becomes the
/// job's terminal `Error` state.
#[derive(Debug, thiserror::Error)]
enum JobError {
    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Encode(#[from] PixelError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Client-facing status of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobReport {
    /// The id was never issued by this process or recovered at startup.
    NotFound,
    /// Background work has not finished yet.
    Pending,
    /// The work unit failed; `message` describes the first failing step.
    Failed { message: String },
    /// The result is stored; `url` is a fresh time-bounded download link.
    Ready { url: String },
}

/// Coordinates the inference client, result store, and job registry.
pub struct JobOrchestrator {
    registry: Arc<JobRegistry>,
    generator: Arc<dyn ImageGenerator>,
    store: Arc<dyn ResultStore>,
    prefix: String,
}

impl JobOrchestrator {
    pub fn new(
        registry: Arc<JobRegistry>,
        generator: Arc<dyn ImageGenerator>,
        store: Arc<dyn ResultStore>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            generator,
            store,
            prefix: prefix.into(),
        }
    }

    /// Accept a prompt and return its job id immediately.
    ///
    /// Registers the job as `Pending`, then spawns the work unit as a
    /// detached task. There is no bound on in-flight jobs and no join
    /// handle kept; completion is observed only through the registry.
    pub async fn submit(&self, prompt: String) -> Result<JobId, RegistryError> {
        let job_id = uuid::Uuid::new_v4();
        self.registry.create(job_id).await?;
        tracing::info!(job_id = %job_id, "Job submitted");

        let registry = Arc::clone(&self.registry);
        let generator = Arc::clone(&self.generator);
        let store = Arc::clone(&self.store);
        let prefix = self.prefix.clone();
        tokio::spawn(async move {
            run_job(job_id, prompt, registry, generator, store, prefix).await;
        });

        Ok(job_id)
    }

    /// Current status of a job.
    ///
    /// A `Success` entry gets a fresh presigned URL on every call; presign
    /// failure is the only error this method surfaces.
    pub async fn status(&self, job_id: JobId) -> Result<JobReport, StorageError> {
        let Some(job) = self.registry.get(job_id).await else {
            return Ok(JobReport::NotFound);
        };

        match job.state {
            JobState::Pending => Ok(JobReport::Pending),
            JobState::Error { message } => Ok(JobReport::Failed { message }),
            JobState::Success { storage_key } => {
                let url = self.store.presign(&storage_key, RESULT_URL_TTL).await?;
                Ok(JobReport::Ready { url })
            }
        }
    }

    /// Store connectivity, for the health endpoint.
    pub async fn health(&self) -> Result<(), StorageError> {
        self.store.probe().await
    }
}

/// The background work unit for one job.
///
/// Whatever happens inside, the job ends in a terminal state; a failure to
/// record that state is a bug in the caller's id handling and is logged at
/// error level.
async fn run_job(
    job_id: JobId,
    prompt: String,
    registry: Arc<JobRegistry>,
    generator: Arc<dyn ImageGenerator>,
    store: Arc<dyn ResultStore>,
    prefix: String,
) {
    match execute(job_id, &prompt, generator.as_ref(), store.as_ref(), &prefix).await {
        Ok(storage_key) => {
            tracing::info!(job_id = %job_id, key = %storage_key, "Job completed");
            if let Err(e) = registry.mark_success(job_id, storage_key).await {
                tracing::error!(job_id = %job_id, error = %e, "Failed to record job success");
            }
        }
        Err(e) => {
            tracing::warn!(job_id = %job_id, error = %e, "Job failed");
            if let Err(e) = registry.mark_error(job_id, e.to_string()).await {
                tracing::error!(job_id = %job_id, error = %e, "Failed to record job failure");
            }
        }
    }
}

/// Generate, encode, and store one result; returns the storage key.
async fn execute(
    job_id: JobId,
    prompt: &str,
    generator: &dyn ImageGenerator,
    store: &dyn ResultStore,
    prefix: &str,
) -> Result<String, JobError> {
    let image = generator.generate(prompt).await?;
    let bytes = encode_jpeg(&image)?;

    let storage_key = result_key(prefix, job_id);
    store.store(&storage_key, bytes).await?;
    Ok(storage_key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
