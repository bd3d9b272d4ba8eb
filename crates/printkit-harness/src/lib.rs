//! Conformance harness for printkit.
//!
//! This crate provides:
//! - Fixture verify: run checked-in printf vectors through the core and
//!   cross-check strict cases against the host C library
//! - Fixture capture: record host `snprintf` behavior as JSON reference data
//! - Report generation: markdown and JSON conformance reports
//! - Structured logging: JSONL run logs with a SHA-256 artifact index

#![forbid(unsafe_code)]

pub mod capture;
pub mod diff;
pub mod error;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::VerificationResult;
