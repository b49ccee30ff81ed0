//! Job lifecycle types.

use crate::types::JobId;

// ---------------------------------------------------------------------------
// Job state
// ---------------------------------------------------------------------------

/// Lifecycle state of a tracked job.
///
/// A job starts as `Pending` and moves exactly once to either `Success` or
/// `Error`. The terminal payload travels with the state so that a reader
/// never observes a completed job without its outcome data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    /// Accepted, background work not yet finished.
    Pending,
    /// Finished and persisted; `storage_key` locates the stored image.
    Success { storage_key: String },
    /// Failed at some stage; `message` is a human-readable description.
    Error { message: String },
}

impl JobState {
    /// Uppercase label used on the wire (`PENDING`, `SUCCESS`, `ERROR`).
    pub fn label(&self) -> &'static str {
        match self {
            JobState::Pending => "PENDING",
            JobState::Success { .. } => "SUCCESS",
            JobState::Error { .. } => "ERROR",
        }
    }

    /// Whether the job has finished (successfully or not).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Pending)
    }
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// A single tracked job: its identifier plus current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub state: JobState,
}

impl Job {
    pub fn pending(id: JobId) -> Self {
        Self {
            id,
            state: JobState::Pending,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
