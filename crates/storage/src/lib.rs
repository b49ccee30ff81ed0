//! Result store adapter for the external object store.
//!
//! The [`ResultStore`] trait covers the four operations the job pipeline
//! needs: enumerate previously completed results, upload a new result,
//! presign a time-bounded download URL, and probe connectivity for health
//! reporting. [`s3::S3ResultStore`] is the production implementation;
//! [`memory::MemoryResultStore`] backs tests and local development.

pub mod key;
pub mod memory;
pub mod s3;
mod store;

pub use key::{parse_result_key, result_key};
pub use memory::MemoryResultStore;
pub use s3::S3ResultStore;
pub use store::{ResultStore, StorageError, StoredResult};
