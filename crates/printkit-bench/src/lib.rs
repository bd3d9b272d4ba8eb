//! Shared inputs for the printkit benchmarks.

/// Integers spanning short and full-width renderings.
pub const INT_INPUTS: [i64; 5] = [0, 7, -42, 1_234_567, i64::MIN];

/// Field widths used by the string benchmarks.
pub const STR_WIDTHS: [usize; 4] = [0, 8, 64, 512];

/// Radixes exercised by the raw converter benchmark.
pub const RADIXES: [u32; 4] = [2, 8, 10, 16];
