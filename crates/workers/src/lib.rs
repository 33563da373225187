//! Outbound job clients for the external worker services.
//!
//! Two independent workers exist: the link-finder (candidate image links for
//! a question) and the compressor (low/high image variants). Both expose the
//! same job-oriented surface (create, status, result, list), wrapped here by
//! [`WorkerClient`] with bearer authentication and a closed error taxonomy.

pub mod client;
pub mod error;
pub mod types;

pub use client::{WorkerClient, WorkerConfig};
pub use error::WorkerError;
pub use types::{CompressJobRequest, CreatedJob, Job, JobFilter, JobPage, JobStatus};
