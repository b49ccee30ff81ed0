//! Result object key layout.
//!
//! Every completed result lives under `<prefix>/<job-id>/result`. The job
//! id embedded in the key is how a restarted process recovers job
//! identities from a store listing.

use uuid::Uuid;

/// Build the object key for a job's result.
pub fn result_key(prefix: &str, job_id: Uuid) -> String {
    format!("{prefix}/{job_id}/result")
}

/// Recover the job id from a result object key.
///
/// Returns `None` for keys that do not follow the
/// `<prefix>/<job-id>/result` layout, including foreign objects that
/// happen to share the prefix.
pub fn parse_result_key(prefix: &str, key: &str) -> Option<Uuid> {
    let rest = key.strip_prefix(prefix)?.strip_prefix('/')?;
    let (id, tail) = rest.split_once('/')?;
    if tail != "result" {
        return None;
    }
    Uuid::parse_str(id).ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
