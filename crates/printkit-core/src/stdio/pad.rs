//! Padded string copies.
//!
//! [`str_pad`] returns a new, independently owned copy of a string with fill
//! bytes added on one side. The sign of `count` picks the side.

/// Owned result of [`str_pad`].
///
/// Storage keeps a trailing NUL so the bytes can be handed to C-style
/// consumers; [`PaddedString::len`] excludes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaddedString {
    data: Vec<u8>,
}

impl PaddedString {
    /// Visible length, excluding the terminator.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visible bytes, excluding the terminator.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    /// Bytes including the trailing NUL. Empty for a failed allocation.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the visible bytes.
    #[must_use]
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.data.pop();
        self.data
    }
}

/// Pad `text` with `fill`.
///
/// A negative `count` pads on the left, a positive one on the right, each by
/// `|count|` bytes; zero returns an unchanged copy. `None` text is treated as
/// empty. The result holds exactly `len + |count| + 1` bytes of storage. When
/// that size overflows or cannot be allocated, the result is empty with
/// length 0.
#[must_use]
pub fn str_pad(text: Option<&[u8]>, fill: u8, count: isize) -> PaddedString {
    let text = text.unwrap_or_default();
    let left = count < 0;
    let amount = count.unsigned_abs();

    let Some(total) = text
        .len()
        .checked_add(amount)
        .and_then(|n| n.checked_add(1))
    else {
        return PaddedString::default();
    };
    let mut data = Vec::new();
    if data.try_reserve_exact(total).is_err() {
        return PaddedString::default();
    }

    if left {
        data.resize(amount, fill);
        data.extend_from_slice(text);
    } else {
        data.extend_from_slice(text);
        data.resize(text.len() + amount, fill);
    }
    data.push(0);
    PaddedString { data }
}
