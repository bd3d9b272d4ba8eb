//! Typed printf arguments.
//!
//! [`Arg`] is the safe stand-in for a C variadic slot. Each conversion reads
//! the slot the way `va_arg` would read the matching C type. The accepted
//! pairings are decided in the driver's per-conversion dispatch
//! (`Formatter::directive` in [`super::printf`]) and, for `*` fields, by
//! its `ArgCursor::take_int`.

/// Typed argument value for one conversion or `*` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    Int(i64),
    Uint(u64),
    Char(u8),
    /// String argument. `None` is the absent (null) string.
    Str(Option<&'a [u8]>),
    Ptr(usize),
}

impl Arg<'_> {
    /// Short kind name used in error messages and fixtures.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Char(_) => "char",
            Self::Str(_) => "str",
            Self::Ptr(_) => "ptr",
        }
    }

    /// Raw 64-bit register image of an integral argument, as a variadic
    /// slot would hold it. `None` for strings.
    #[must_use]
    pub fn as_raw_bits(&self) -> Option<u64> {
        match *self {
            Self::Int(v) => Some(v as u64),
            Self::Uint(v) => Some(v),
            Self::Char(c) => Some(u64::from(c)),
            Self::Ptr(p) => Some(p as u64),
            Self::Str(_) => None,
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg<'_> {
            fn from(v: $t) -> Self {
                Arg::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg<'_> {
            fn from(v: $t) -> Self {
                Arg::Uint(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u16, u32, u64, usize);

impl From<u8> for Arg<'_> {
    fn from(c: u8) -> Self {
        Arg::Char(c)
    }
}

/// Stored for a `char` outside ASCII, which has no single-byte form.
pub const NON_ASCII_CHAR: u8 = b'?';

impl From<char> for Arg<'_> {
    /// ASCII characters become their byte; anything else becomes
    /// [`NON_ASCII_CHAR`].
    fn from(c: char) -> Self {
        Arg::Char(u8::try_from(c).ok().filter(u8::is_ascii).unwrap_or(NON_ASCII_CHAR))
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Arg::Str(Some(s.as_bytes()))
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(s: &'a [u8]) -> Self {
        Arg::Str(Some(s))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Arg<'a> {
    fn from(s: &'a [u8; N]) -> Self {
        Arg::Str(Some(s.as_slice()))
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(s: &'a String) -> Self {
        Arg::Str(Some(s.as_bytes()))
    }
}

impl<'a> From<Option<&'a str>> for Arg<'a> {
    fn from(s: Option<&'a str>) -> Self {
        Arg::Str(s.map(str::as_bytes))
    }
}

impl<'a> From<Option<&'a [u8]>> for Arg<'a> {
    fn from(s: Option<&'a [u8]>) -> Self {
        Arg::Str(s)
    }
}

impl<T> From<*const T> for Arg<'_> {
    fn from(p: *const T) -> Self {
        Arg::Ptr(p as usize)
    }
}
