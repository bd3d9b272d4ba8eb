//! Differential execution of printf fixture cases.
//!
//! A case is rendered through `printkit-core` and, when the template and
//! arguments have a well-defined C meaning, through the host `snprintf` as
//! well. Harness tooling consumes [`DifferentialExecution`] to decide pass or
//! fail and to report host parity.

pub mod host;

use printkit_core::config::SafetyLevel;
use printkit_core::stdio::{Arg, vsnprintf_with_level};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use host::{HostRendering, HostSkip, host_snprintf, host_template};

/// Serialized form of one printf argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FixtureArg {
    Int(i64),
    Uint(u64),
    Char(u8),
    /// `null` is the absent string.
    Str(Option<String>),
    Ptr(usize),
}

impl FixtureArg {
    /// Borrow as a core argument.
    #[must_use]
    pub fn to_arg(&self) -> Arg<'_> {
        match self {
            Self::Int(v) => Arg::Int(*v),
            Self::Uint(v) => Arg::Uint(*v),
            Self::Char(c) => Arg::Char(*c),
            Self::Str(s) => Arg::Str(s.as_deref().map(str::as_bytes)),
            Self::Ptr(p) => Arg::Ptr(*p),
        }
    }
}

/// Failure to set up a case for execution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("unknown mode `{0}`")]
    UnknownMode(String),
}

/// Result of rendering one case through the core and, if comparable, the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferentialExecution {
    /// Bytes stored before the terminator, or `error:<code>` on failure.
    pub impl_output: String,
    /// Full output length, or -1 when formatting failed.
    pub impl_return: i64,
    pub host_output: Option<String>,
    pub host_return: Option<i64>,
    /// True when the host was not consulted or agreed on output and length.
    pub host_parity: bool,
    pub note: Option<String>,
}

/// Map a fixture mode name to a runtime level.
pub fn parse_mode(mode: &str) -> Result<SafetyLevel, ExecutionError> {
    match mode.to_ascii_lowercase().as_str() {
        "strict" => Ok(SafetyLevel::Strict),
        "hardened" => Ok(SafetyLevel::Hardened),
        _ => Err(ExecutionError::UnknownMode(mode.to_string())),
    }
}

/// Render a case through the core, then cross-check against the host in
/// strict mode.
pub fn execute_fixture_case(
    format: &str,
    args: &[FixtureArg],
    capacity: usize,
    mode: &str,
) -> Result<DifferentialExecution, ExecutionError> {
    let level = parse_mode(mode)?;
    let core_args: Vec<Arg<'_>> = args.iter().map(FixtureArg::to_arg).collect();
    let mut buf = vec![0u8; capacity];

    let (impl_output, impl_return) =
        match vsnprintf_with_level(&mut buf, format.as_bytes(), &core_args, level) {
            Ok(total) => (visible_text(&buf, total), total as i64),
            Err(err) => {
                return Ok(DifferentialExecution {
                    impl_output: format!("error:{}", err.code()),
                    impl_return: -1,
                    host_output: None,
                    host_return: None,
                    host_parity: true,
                    note: Some(err.to_string()),
                });
            }
        };

    if level != SafetyLevel::Strict {
        return Ok(DifferentialExecution {
            impl_output,
            impl_return,
            host_output: None,
            host_return: None,
            host_parity: true,
            note: None,
        });
    }

    match host_snprintf(format, args, capacity) {
        Ok(host) => {
            let host_parity = host.output == impl_output && host.total as i64 == impl_return;
            Ok(DifferentialExecution {
                impl_output,
                impl_return,
                host_output: Some(host.output),
                host_return: Some(host.total as i64),
                host_parity,
                note: None,
            })
        }
        Err(reason) => Ok(DifferentialExecution {
            impl_output,
            impl_return,
            host_output: None,
            host_return: None,
            host_parity: true,
            note: Some(format!("host skipped: {reason}")),
        }),
    }
}

/// Text stored in `buf` ahead of the terminator for a call that returned
/// `total`.
#[must_use]
pub fn visible_text(buf: &[u8], total: usize) -> String {
    let stored = total.min(buf.len().saturating_sub(1));
    String::from_utf8_lossy(&buf[..stored]).into_owned()
}
