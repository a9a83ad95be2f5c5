//! AWS-oriented adapters and handlers for fastq sync requirement checks.
//!
//! This crate owns runtime integration details (Lambda handlers, HTTP clients
//! for the fastq, unarchiving and workflow services, environment
//! configuration and logging). Requirement semantics live in
//! `fastq_sync_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod logging;
pub mod runtime;
