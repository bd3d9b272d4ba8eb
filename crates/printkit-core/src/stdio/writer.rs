//! Bounded field writers.
//!
//! Every writer takes the destination slice plus a logical start index and
//! returns the number of bytes the field *would* occupy. Physical writes stop
//! at `buf.len()`; the logical length keeps counting so the driver can report
//! the full size of a truncated result.
//!
//! Field layout for integers: `[pad][sign][prefix][zeros][digits][pad]`,
//! with the leading pad present only when right-aligned and the trailing pad
//! only when left-aligned.

use super::numeric::{ConvertError, DigitBuffer};
use super::spec::FormatSpec;

/// Text printed for an absent string argument.
pub const NULL_PLACEHOLDER: &[u8] = b"<null>";

/// Text printed for a null pointer under `%p`.
pub const NIL_POINTER: &[u8] = b"(nil)";

/// Write `ch` at `index`. Returns false, writing nothing, when `index` is
/// outside the buffer. An empty buffer accepts nothing.
pub fn write_char(buf: &mut [u8], index: usize, ch: u8) -> bool {
    match buf.get_mut(index) {
        Some(slot) => {
            *slot = ch;
            true
        }
        None => false,
    }
}

/// Write a string field starting at `start`.
///
/// `None` prints [`NULL_PLACEHOLDER`]. The text ends at its first NUL byte
/// and is clipped to the precision when one is set. Width pads with `'0'`
/// under the zero flag, spaces otherwise; left-justified fields pad after
/// the text with spaces. Returns the would-be field length.
pub fn write_string(buf: &mut [u8], start: usize, text: Option<&[u8]>, spec: &FormatSpec) -> usize {
    let text = text.unwrap_or(NULL_PLACEHOLDER);
    let natural = text.iter().position(|&b| b == 0).unwrap_or(text.len());
    let shown = match spec.precision_value() {
        Some(p) => natural.min(p),
        None => natural,
    };
    let pad = spec.min_width().saturating_sub(shown);

    let mut at = start;
    if !spec.flags.left_justify {
        at = at.saturating_add(fill(buf, at, spec.pad_byte(), pad));
    }
    at = at.saturating_add(copy(buf, at, &text[..shown]));
    if spec.flags.left_justify {
        at = at.saturating_add(fill(buf, at, b' ', pad));
    }
    at - start
}

/// Write a `%c` field. Padding is always spaces.
pub fn write_char_field(buf: &mut [u8], start: usize, ch: u8, spec: &FormatSpec) -> usize {
    let pad = spec.min_width().saturating_sub(1);
    let mut at = start;
    if !spec.flags.left_justify {
        at = at.saturating_add(fill(buf, at, b' ', pad));
    }
    write_char(buf, at, ch);
    at = at.saturating_add(1);
    if spec.flags.left_justify {
        at = at.saturating_add(fill(buf, at, b' ', pad));
    }
    at - start
}

/// Write a signed integer field in `radix`.
///
/// The sign is `'-'` for negative values, otherwise `'+'` or `' '` as the
/// flags request. Returns the would-be field length.
pub fn write_signed(
    buf: &mut [u8],
    start: usize,
    x: i64,
    radix: u32,
    upper: bool,
    spec: &FormatSpec,
) -> Result<usize, ConvertError> {
    let mut scratch = DigitBuffer::new();
    let text = scratch.format_signed(x, radix, upper)?;
    let (negative, digits) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, text),
    };
    let sign = if negative {
        Some(b'-')
    } else if spec.flags.force_sign {
        Some(b'+')
    } else if spec.flags.space_sign {
        Some(b' ')
    } else {
        None
    };
    Ok(write_integer_field(
        buf,
        start,
        sign,
        b"",
        digits,
        x == 0,
        spec,
    ))
}

/// Write an unsigned integer field in `radix`.
///
/// With the `#` flag, octal output always starts with `0` and non-zero hex
/// output gets a `0x`/`0X` prefix. Returns the would-be field length.
pub fn write_unsigned(
    buf: &mut [u8],
    start: usize,
    x: u64,
    radix: u32,
    upper: bool,
    spec: &FormatSpec,
) -> Result<usize, ConvertError> {
    let mut scratch = DigitBuffer::new();
    let digits = scratch.format_unsigned(x, radix, upper)?;
    let prefix: &[u8] = match (spec.flags.alt_form, radix) {
        (true, 8) => {
            let min_digits = spec.precision_value().unwrap_or(1);
            // Already leads with a zero once precision padding applies.
            if (x == 0 && min_digits > 0) || min_digits > digits.len() {
                b""
            } else {
                b"0"
            }
        }
        (true, 16) if x != 0 => {
            if upper {
                b"0X"
            } else {
                b"0x"
            }
        }
        _ => b"",
    };
    Ok(write_integer_field(buf, start, None, prefix, digits, x == 0, spec))
}

/// Write a `%p` field: `0x` plus lowercase hex, or `(nil)` for zero.
pub fn write_pointer(
    buf: &mut [u8],
    start: usize,
    addr: usize,
    spec: &FormatSpec,
) -> Result<usize, ConvertError> {
    if addr == 0 {
        let nil = FormatSpec {
            precision: super::spec::Precision::None,
            ..*spec
        };
        return Ok(write_string(buf, start, Some(NIL_POINTER), &nil));
    }
    let mut scratch = DigitBuffer::new();
    let digits = scratch.format_unsigned(addr as u64, 16, false)?;
    Ok(write_integer_field(buf, start, None, b"0x", digits, false, spec))
}

/// Lay out `[pad][sign][prefix][zeros][digits][pad]`.
fn write_integer_field(
    buf: &mut [u8],
    start: usize,
    sign: Option<u8>,
    prefix: &[u8],
    digits: &[u8],
    is_zero: bool,
    spec: &FormatSpec,
) -> usize {
    let precision = spec.precision_value();
    // An explicit zero precision prints no digits for a zero value.
    let digits = if is_zero && precision == Some(0) {
        &digits[..0]
    } else {
        digits
    };
    let mut zeros = precision.map_or(0, |p| p.saturating_sub(digits.len()));
    let content = usize::from(sign.is_some())
        .saturating_add(prefix.len())
        .saturating_add(zeros)
        .saturating_add(digits.len());
    let mut pad = spec.min_width().saturating_sub(content);

    // The zero flag is ignored when a precision is given.
    if spec.flags.zero_pad && !spec.flags.left_justify && precision.is_none() {
        zeros = zeros.saturating_add(pad);
        pad = 0;
    }

    let mut at = start;
    if !spec.flags.left_justify {
        at = at.saturating_add(fill(buf, at, b' ', pad));
    }
    if let Some(s) = sign {
        write_char(buf, at, s);
        at = at.saturating_add(1);
    }
    at = at.saturating_add(copy(buf, at, prefix));
    at = at.saturating_add(fill(buf, at, b'0', zeros));
    at = at.saturating_add(copy(buf, at, digits));
    if spec.flags.left_justify {
        at = at.saturating_add(fill(buf, at, b' ', pad));
    }
    at - start
}

/// Write `count` copies of `byte` from `start`, touching only in-bounds
/// slots. Returns `count`.
fn fill(buf: &mut [u8], start: usize, byte: u8, count: usize) -> usize {
    let end = start.saturating_add(count).min(buf.len());
    for index in start..end {
        write_char(buf, index, byte);
    }
    count
}

/// Copy `bytes` from `start` one at a time, dropping what does not fit.
/// Returns `bytes.len()`.
fn copy(buf: &mut [u8], start: usize, bytes: &[u8]) -> usize {
    for (offset, &b) in bytes.iter().enumerate() {
        if !write_char(buf, start.saturating_add(offset), b) {
            break;
        }
    }
    bytes.len()
}
