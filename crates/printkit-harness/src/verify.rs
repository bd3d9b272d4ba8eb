//! Verification result types.

use serde::{Deserialize, Serialize};

/// Outcome of executing one fixture case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub case_name: String,
    pub mode: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    pub expected_return: i64,
    pub actual_return: i64,
    /// Rendered diff or host-parity notes, if any.
    pub diff: Option<String>,
    /// Host comparison: `Some(true)` agreed, `Some(false)` diverged, `None`
    /// not consulted.
    pub host_parity: Option<bool>,
    /// Wall time of the case execution.
    pub latency_ns: u64,
}

impl VerificationResult {
    /// Short outcome label.
    #[must_use]
    pub fn status(&self) -> &'static str {
        if self.passed { "PASS" } else { "FAIL" }
    }
}
