//! Fixture execution.
//!
//! A [`TestRunner`] is bound to one mode and runs every case whose `mode`
//! is that mode or `both`.

use std::time::Instant;

use printkit_conformance::{DifferentialExecution, execute_fixture_case};

use crate::diff;
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::verify::VerificationResult;

pub struct TestRunner {
    /// Label for the batch, carried into logs.
    pub campaign: String,
    /// `strict` or `hardened`.
    pub mode: String,
}

/// What one execution produced, before comparison with the fixture.
struct Observed {
    output: String,
    ret: i64,
    host_parity: Option<bool>,
    notes: Vec<String>,
}

impl Observed {
    fn from_execution(run: DifferentialExecution) -> Self {
        let mut notes = Vec::new();
        if !run.host_parity {
            notes.push(format!(
                "host disagrees: host={:?} ({}), impl={:?} ({})",
                run.host_output.as_deref().unwrap_or_default(),
                run.host_return.unwrap_or(-1),
                run.impl_output,
                run.impl_return
            ));
        }
        notes.extend(run.note);
        Self {
            host_parity: run.host_output.is_some().then_some(run.host_parity),
            output: run.impl_output,
            ret: run.impl_return,
            notes,
        }
    }

    fn unsupported(reason: impl std::fmt::Display) -> Self {
        Self {
            output: format!("unsupported:{reason}"),
            ret: -1,
            host_parity: None,
            notes: Vec::new(),
        }
    }
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
            mode: mode.into(),
        }
    }

    /// Execute the cases of `fixture_set` that apply to this runner's mode.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .filter(|case| self.applies_to(case))
            .map(|case| self.run_case(case))
            .collect()
    }

    fn applies_to(&self, case: &FixtureCase) -> bool {
        case.mode.eq_ignore_ascii_case("both") || case.mode.eq_ignore_ascii_case(&self.mode)
    }

    fn run_case(&self, case: &FixtureCase) -> VerificationResult {
        let started = Instant::now();
        let observed =
            match execute_fixture_case(&case.format, &case.args, case.capacity, &self.mode) {
                Ok(run) => Observed::from_execution(run),
                Err(err) => Observed::unsupported(err),
            };
        let latency_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

        let output_ok = observed.output == case.expected_output;
        let return_ok = observed.ret == case.expected_return;
        let diff = if !output_ok {
            Some(diff::render_diff(&case.expected_output, &observed.output))
        } else if !return_ok {
            Some(format!(
                "return mismatch: expected {}, got {}",
                case.expected_return, observed.ret
            ))
        } else if observed.notes.is_empty() {
            None
        } else {
            Some(observed.notes.join("\n"))
        };

        VerificationResult {
            case_name: if case.mode.eq_ignore_ascii_case("both") {
                format!("{} [{}]", case.name, self.mode)
            } else {
                case.name.clone()
            },
            mode: self.mode.clone(),
            passed: output_ok && return_ok,
            expected: case.expected_output.clone(),
            actual: observed.output,
            expected_return: case.expected_return,
            actual_return: observed.ret,
            diff,
            host_parity: observed.host_parity,
            latency_ns,
        }
    }
}
