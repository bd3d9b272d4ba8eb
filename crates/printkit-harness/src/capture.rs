//! Host reference capture.
//!
//! Renders the built-in vectors through the host `snprintf` and records the
//! results as a strict-mode [`FixtureSet`].

use printkit_conformance::{FixtureArg, HostSkip, host_snprintf};

use crate::fixtures::{FixtureCase, FixtureSet};

/// One capture input.
#[derive(Debug, Clone)]
pub struct Vector {
    pub name: &'static str,
    pub format: &'static str,
    pub args: Vec<FixtureArg>,
    pub capacity: usize,
}

fn vector(name: &'static str, format: &'static str, args: Vec<FixtureArg>, capacity: usize) -> Vector {
    Vector {
        name,
        format,
        args,
        capacity,
    }
}

fn s(text: &str) -> FixtureArg {
    FixtureArg::Str(Some(text.to_string()))
}

/// Vectors with a defined C rendering on LP64 hosts.
#[must_use]
pub fn builtin_vectors() -> Vec<Vector> {
    use FixtureArg::{Char, Int, Ptr, Uint};
    vec![
        vector("literal_only", "plain text", vec![], 32),
        vector("percent_escape", "100%%", vec![], 16),
        vector("decimal_truncated", "%d", vec![Int(12345)], 4),
        vector("decimal_measure_only", "%d", vec![Int(-987)], 0),
        vector("capacity_one", "abc", vec![], 1),
        vector("int_min", "%d", vec![Int(i64::MIN)], 32),
        vector("int_max_plus", "%+i", vec![Int(i64::MAX)], 32),
        vector("space_sign", "% d|% d", vec![Int(5), Int(-5)], 16),
        vector("zero_pad_negative", "%08d", vec![Int(-42)], 16),
        vector("precision_pads_digits", "%.5d", vec![Int(-42)], 16),
        vector("zero_value_zero_precision", "[%.0d]", vec![Int(0)], 8),
        vector("left_justify_int", "[%-6d]", vec![Int(17)], 16),
        vector("unsigned_max", "%u", vec![Uint(u64::MAX)], 32),
        vector("octal_alt", "%o|%#o|%#o", vec![Uint(8), Uint(8), Uint(0)], 16),
        vector("hex_alt", "%x|%#X|%#x", vec![Uint(0xbeef), Uint(0xbeef), Uint(0)], 32),
        vector("hex_negative_reinterpreted", "%x", vec![Int(-1)], 32),
        vector("short_narrowing", "%hd|%hhu", vec![Int(70_000), Uint(300)], 16),
        vector("char_field", "[%3c|%-3c]", vec![Char(b'a'), Char(b'b')], 16),
        vector("string_width", "[%6s]", vec![s("ab")], 16),
        vector("string_left", "[%-6s]", vec![s("ab")], 16),
        vector("string_precision", "[%.2s]", vec![s("hello")], 16),
        vector("string_width_precision", "[%8.3s]", vec![s("hello")], 16),
        vector("star_width", "[%*d]", vec![Int(5), Int(42)], 16),
        vector("star_negative_width", "[%*d]", vec![Int(-5), Int(42)], 16),
        vector("star_precision", "[%.*s]", vec![Int(3), s("abcdef")], 16),
        vector("pointer", "%p", vec![Ptr(0x1234)], 16),
        vector("long_long", "%lld|%llx", vec![Int(-3), Uint(255)], 32),
        vector(
            "mixed_truncated",
            "%s=%05d (%x)",
            vec![s("key"), Int(42), Uint(0xff)],
            10,
        ),
    ]
}

/// Render one vector through the host.
pub fn capture_case(vector: &Vector) -> Result<FixtureCase, HostSkip> {
    let host = host_snprintf(vector.format, &vector.args, vector.capacity)?;
    Ok(FixtureCase {
        name: vector.name.to_string(),
        format: vector.format.to_string(),
        args: vector.args.clone(),
        capacity: vector.capacity,
        expected_output: host.output,
        expected_return: host.total as i64,
        mode: "strict".to_string(),
    })
}

/// Capture every vector the host can render. Vectors it cannot are returned
/// alongside the reason.
pub fn capture_fixture_set(
    vectors: &[Vector],
    captured_at: impl Into<String>,
) -> (FixtureSet, Vec<(String, HostSkip)>) {
    let mut cases = Vec::with_capacity(vectors.len());
    let mut skipped = Vec::new();
    for v in vectors {
        match capture_case(v) {
            Ok(case) => cases.push(case),
            Err(reason) => skipped.push((v.name.to_string(), reason)),
        }
    }
    let set = FixtureSet {
        version: "v1".to_string(),
        family: "stdio/snprintf".to_string(),
        captured_at: captured_at.into(),
        cases,
    };
    (set, skipped)
}
