//! Shared fastq sync domain primitives.
//!
//! This crate owns requirement evaluation (predicates, the archival policy
//! gate, multi-fastq aggregation), remediation mapping and the
//! request/response contracts. It intentionally excludes HTTP clients, AWS SDK
//! and Lambda runtime concerns, which live in `fastq_sync_lambda`.

pub mod contract;
pub mod error;
pub mod jobs;
pub mod model;
pub mod readiness;
pub mod remediation;
pub mod requirements;
pub mod workflow;
