//! Fixture loading and management.

use std::path::{Path, PathBuf};

use printkit_conformance::FixtureArg;
use serde::{Deserialize, Serialize};

use crate::HarnessError;

/// A single printf fixture case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Template passed to `snprintf`.
    pub format: String,
    #[serde(default)]
    pub args: Vec<FixtureArg>,
    /// Destination buffer size in bytes, terminator included.
    pub capacity: usize,
    /// Bytes stored before the terminator, or `error:<code>`.
    pub expected_output: String,
    /// Return value; -1 when formatting fails.
    pub expected_return: i64,
    /// `strict`, `hardened` or `both`.
    pub mode: String,
}

/// A collection of fixture cases for a function family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Function family name.
    pub family: String,
    /// UTC timestamp of capture.
    pub captured_at: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        Self::from_json(&content).map_err(|source| HarnessError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load every `*.json` fixture set from `path`, which may be a single file
/// or a directory. Sets are returned in file name order.
pub fn load_fixture_sets(path: &Path) -> Result<Vec<(PathBuf, FixtureSet)>, HarnessError> {
    let files = if path.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(path)
            .map_err(|e| HarnessError::io(path, e))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        files
    } else {
        vec![path.to_path_buf()]
    };
    if files.is_empty() {
        return Err(HarnessError::NoFixtures(path.to_path_buf()));
    }
    files
        .into_iter()
        .map(|file| FixtureSet::from_file(&file).map(|set| (file, set)))
        .collect()
}

/// Parse a command-line argument spec: `int:N`, `uint:N`, `char:C`,
/// `str:TEXT`, `null` or `ptr:N`. Numbers accept a `0x` prefix.
pub fn parse_cli_arg(spec: &str) -> Result<FixtureArg, String> {
    if spec == "null" {
        return Ok(FixtureArg::Str(None));
    }
    let (kind, value) = spec
        .split_once(':')
        .ok_or_else(|| format!("argument '{spec}' is not KIND:VALUE"))?;
    let bad = |e: std::num::ParseIntError| format!("argument '{spec}': {e}");
    match kind {
        "int" => {
            let (negative, digits) = match value.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, value),
            };
            let magnitude = parse_u64(digits).map_err(bad)?;
            let v = if negative {
                0i64.checked_sub_unsigned(magnitude)
            } else {
                i64::try_from(magnitude).ok()
            };
            v.map(FixtureArg::Int)
                .ok_or_else(|| format!("argument '{spec}' is out of range"))
        }
        "uint" => parse_u64(value).map(FixtureArg::Uint).map_err(bad),
        "ptr" => parse_u64(value)
            .map_err(bad)
            .and_then(|p| usize::try_from(p).map_err(|_| format!("argument '{spec}' is out of range")))
            .map(FixtureArg::Ptr),
        "char" => match value.as_bytes() {
            [c] => Ok(FixtureArg::Char(*c)),
            _ => Err(format!("argument '{spec}' must be a single byte")),
        },
        "str" => Ok(FixtureArg::Str(Some(value.to_string()))),
        _ => Err(format!("unknown argument kind '{kind}'")),
    }
}

fn parse_u64(text: &str) -> Result<u64, std::num::ParseIntError> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    }
}
