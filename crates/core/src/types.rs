//! Shared identifier types.

/// Opaque identifier assigned to a job at submission time.
///
/// Callers treat this as a token: it is returned from submission and later
/// exchanged for the job's status. The UUID form is also embedded in the
/// storage key of a completed result, which is how restarted processes
/// recover job identities from the result store.
pub type JobId = uuid::Uuid;
