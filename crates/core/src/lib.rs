//! Core domain model for the text-to-image job service.
//!
//! Defines the job lifecycle ([`job::JobState`]) and the shared in-memory
//! registry ([`registry::JobRegistry`]) that tracks every submitted job from
//! `Pending` through to a terminal state.

pub mod job;
pub mod registry;
pub mod types;

pub use job::{Job, JobState};
pub use registry::{JobRegistry, RegistryError};
pub use types::JobId;
