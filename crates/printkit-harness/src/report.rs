//! Conformance report generation.

use serde::{Deserialize, Serialize};

use crate::verify::VerificationResult;

/// Summary counts for a verification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Cases the host C library also rendered.
    pub host_checked: usize,
    pub host_mismatches: usize,
}

/// Human- and machine-readable report for one campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub title: String,
    pub mode: String,
    pub summary: ReportSummary,
    pub results: Vec<VerificationResult>,
}

impl ConformanceReport {
    /// Build a report from runner output.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        mode: impl Into<String>,
        results: Vec<VerificationResult>,
    ) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        let host_checked = results.iter().filter(|r| r.host_parity.is_some()).count();
        let host_mismatches = results
            .iter()
            .filter(|r| r.host_parity == Some(false))
            .count();
        Self {
            title: title.into(),
            mode: mode.into(),
            summary: ReportSummary {
                total: results.len(),
                passed,
                failed: results.len() - passed,
                host_checked,
                host_mismatches,
            },
            results,
        }
    }

    /// True when every case passed and the host never disagreed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.summary.failed == 0 && self.summary.host_mismatches == 0
    }

    /// Render as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let s = &self.summary;
        let mut out = format!("# {}\n\n", self.title);
        out.push_str(&format!("- Mode: {}\n", self.mode));
        out.push_str(&format!("- Total: {}\n", s.total));
        out.push_str(&format!("- Passed: {}\n", s.passed));
        out.push_str(&format!("- Failed: {}\n", s.failed));
        out.push_str(&format!(
            "- Host checked: {} ({} mismatches)\n\n",
            s.host_checked, s.host_mismatches
        ));
        out.push_str("| Case | Status | Expected | Actual | Return | Host |\n");
        out.push_str("|------|--------|----------|--------|--------|------|\n");
        for r in &self.results {
            let host = match r.host_parity {
                Some(true) => "match",
                Some(false) => "DIVERGED",
                None => "-",
            };
            out.push_str(&format!(
                "| {} | {} | `{}` | `{}` | {}/{} | {} |\n",
                r.case_name,
                r.status(),
                cell(&r.expected),
                cell(&r.actual),
                r.actual_return,
                r.expected_return,
                host
            ));
        }

        let failures: Vec<_> = self.results.iter().filter(|r| r.diff.is_some()).collect();
        if !failures.is_empty() {
            out.push_str("\n## Details\n");
            for r in failures {
                if let Some(diff) = &r.diff {
                    out.push_str(&format!("\n### {}\n\n```\n{}\n```\n", r.case_name, diff.trim_end()));
                }
            }
        }
        out
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn cell(text: &str) -> String {
    text.escape_debug().to_string().replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, passed: bool, host: Option<bool>) -> VerificationResult {
        VerificationResult {
            case_name: name.into(),
            mode: "strict".into(),
            passed,
            expected: "a|b".into(),
            actual: if passed { "a|b".into() } else { "a".into() },
            expected_return: 3,
            actual_return: if passed { 3 } else { 1 },
            diff: (!passed).then(|| "--- expected\n+++ actual\n".to_string()),
            host_parity: host,
            latency_ns: 10,
        }
    }

    #[test]
    fn summary_counts() {
        let report = ConformanceReport::new(
            "printf",
            "strict",
            vec![
                result("one", true, Some(true)),
                result("two", false, None),
                result("three", true, Some(false)),
            ],
        );
        assert_eq!(
            report.summary,
            ReportSummary {
                total: 3,
                passed: 2,
                failed: 1,
                host_checked: 2,
                host_mismatches: 1
            }
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn markdown_escapes_table_cells() {
        let report = ConformanceReport::new("printf", "strict", vec![result("one", false, None)]);
        let md = report.to_markdown();
        assert!(md.contains("`a\\|b`"));
        assert!(md.contains("### one"));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["summary"]["failed"], 1);
    }
}
