//! Job pipeline: submission orchestration and startup reconciliation.
//!
//! [`orchestrator::JobOrchestrator`] is the public contract of the service
//! core: submit a prompt, poll for status, probe health. [`reconcile`]
//! rebuilds the in-memory registry from the result store before the
//! process accepts traffic.

pub mod orchestrator;
pub mod reconcile;

pub use orchestrator::{JobOrchestrator, JobReport, RESULT_URL_TTL};
pub use reconcile::reconcile_registry;
