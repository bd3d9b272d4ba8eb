//! Integer to ASCII conversion in an arbitrary radix.
//!
//! Digits are produced least-significant first, reversed in place, and
//! followed by a NUL terminator. Signed values are never negated as a whole:
//! each remainder is negated on its own, so `i64::MIN` converts in every
//! radix without overflow.

use thiserror::Error;

/// Bytes needed for the widest conversion: 64 binary digits, a sign byte and
/// the terminator.
pub const DIGIT_BUFFER_LEN: usize = u64::BITS as usize + 2;

const MIN_RADIX: u32 = 2;
const MAX_RADIX: u32 = 36;

/// Failure of a numeric conversion. The target buffer is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("radix {0} is outside 2..=36")]
    InvalidRadix(u32),
    #[error("conversion needs {needed} bytes but the buffer holds {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },
}

/// Fixed scratch buffer owned by a single conversion.
#[derive(Debug, Clone)]
pub struct DigitBuffer {
    bytes: [u8; DIGIT_BUFFER_LEN],
    len: usize,
}

impl Default for DigitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitBuffer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0u8; DIGIT_BUFFER_LEN],
            len: 0,
        }
    }

    /// Convert a signed value and return the visible text (sign included).
    pub fn format_signed(&mut self, x: i64, radix: u32, upper: bool) -> Result<&[u8], ConvertError> {
        self.len = slong_to_ascii(&mut self.bytes, x, radix, upper)?;
        Ok(self.as_bytes())
    }

    /// Convert an unsigned value and return the visible text.
    pub fn format_unsigned(
        &mut self,
        x: u64,
        radix: u32,
        upper: bool,
    ) -> Result<&[u8], ConvertError> {
        self.len = ulong_to_ascii(&mut self.bytes, x, radix, upper)?;
        Ok(self.as_bytes())
    }

    /// Text of the last successful conversion, without the terminator.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Convert a signed integer to text in `radix`, writing into `buf`.
///
/// Returns the emitted length including a leading `'-'` for negative values.
/// A NUL terminator is written after the last digit.
pub fn slong_to_ascii(buf: &mut [u8], x: i64, radix: u32, upper: bool) -> Result<usize, ConvertError> {
    check_radix(radix)?;
    let negative = x < 0;
    let sign_len = usize::from(negative);
    let needed = sign_len + signed_digit_count(x, radix) + 1;
    check_capacity(buf, needed)?;

    // Reserve the first byte for the sign until the digits are in place.
    let digits = &mut buf[sign_len..];
    let r = i64::from(radix);
    let mut rest = x;
    let mut count = 0;
    loop {
        // Remainders of a negative value are <= 0; flip each one separately.
        let digit = (rest % r).unsigned_abs() as u8;
        digits[count] = digit_char(digit, upper);
        count += 1;
        rest /= r;
        if rest == 0 {
            break;
        }
    }
    digits[..count].reverse();

    if negative {
        buf[0] = b'-';
    }
    let len = sign_len + count;
    buf[len] = 0;
    Ok(len)
}

/// Convert an unsigned integer to text in `radix`, writing into `buf`.
///
/// Returns the number of digits written. A NUL terminator follows them.
pub fn ulong_to_ascii(buf: &mut [u8], x: u64, radix: u32, upper: bool) -> Result<usize, ConvertError> {
    check_radix(radix)?;
    let needed = unsigned_digit_count(x, radix) + 1;
    check_capacity(buf, needed)?;

    let r = u64::from(radix);
    let mut rest = x;
    let mut count = 0;
    loop {
        buf[count] = digit_char((rest % r) as u8, upper);
        count += 1;
        rest /= r;
        if rest == 0 {
            break;
        }
    }
    buf[..count].reverse();
    buf[count] = 0;
    Ok(count)
}

fn check_radix(radix: u32) -> Result<(), ConvertError> {
    if (MIN_RADIX..=MAX_RADIX).contains(&radix) {
        Ok(())
    } else {
        Err(ConvertError::InvalidRadix(radix))
    }
}

fn check_capacity(buf: &[u8], needed: usize) -> Result<(), ConvertError> {
    if buf.len() < needed {
        return Err(ConvertError::BufferTooSmall {
            needed,
            capacity: buf.len(),
        });
    }
    Ok(())
}

fn digit_char(digit: u8, upper: bool) -> u8 {
    match digit {
        0..=9 => b'0' + digit,
        _ if upper => b'A' + (digit - 10),
        _ => b'a' + (digit - 10),
    }
}

fn unsigned_digit_count(mut x: u64, radix: u32) -> usize {
    let r = u64::from(radix);
    let mut count = 1;
    while x >= r {
        x /= r;
        count += 1;
    }
    count
}

fn signed_digit_count(x: i64, radix: u32) -> usize {
    unsigned_digit_count(x.unsigned_abs(), radix)
}
