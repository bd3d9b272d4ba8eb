//! printf formatting driver.
//!
//! Walks a parsed template, resolves `*` fields and arguments for each
//! directive, and hands the field to the writers in [`super::writer`]. The
//! running cursor is logical: it keeps counting past the end of the buffer so
//! the return value is the length an unbounded destination would have
//! needed.
//!
//! Argument typing follows `va_arg`: integral kinds are interchangeable and
//! reinterpreted through their 64-bit image, strings only satisfy `%s`.
//! Without a length modifier an integer is used at its full 64-bit width;
//! `h`/`hh` narrow it to 16/8 bits first.

use thiserror::Error;

use super::args::Arg;
use super::numeric::ConvertError;
use super::spec::{FormatSegment, FormatSpec, Precision, Width, parse_format_string};
use super::writer::{
    write_char, write_char_field, write_pointer, write_signed, write_string, write_unsigned,
};
use crate::config::SafetyLevel;

/// Failure of a formatting call. The C interfaces report these as a
/// negative return value.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("directive needs argument {index}, which was not supplied")]
    MissingArgument { index: usize },
    #[error("argument {index} is {found}, which %{conversion} cannot consume")]
    ArgumentMismatch {
        index: usize,
        conversion: char,
        found: &'static str,
    },
    #[error("output of {needed} bytes cannot be allocated")]
    TooLarge { needed: usize },
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("stream write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    /// Stable short name, used by fixtures and logs.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingArgument { .. } => "missing-argument",
            Self::ArgumentMismatch { .. } => "argument-mismatch",
            Self::TooLarge { .. } => "too-large",
            Self::Convert(_) => "convert",
            Self::Io(_) => "io",
        }
    }
}

/// Format into `buf` with `snprintf` semantics.
///
/// At most `buf.len() - 1` bytes of output are stored, followed by a NUL.
/// Returns the full length the output needed, which exceeds the capacity
/// when the result was truncated. An empty `buf` is never written.
pub fn vsnprintf(buf: &mut [u8], fmt: &[u8], args: &[Arg<'_>]) -> Result<usize, FormatError> {
    vsnprintf_with_level(buf, fmt, args, SafetyLevel::Strict)
}

/// [`vsnprintf`] in an explicit mode. [`SafetyLevel::Hardened`] clamps
/// width and precision, so the returned length can be shorter than the
/// unbounded output.
pub fn vsnprintf_with_level(
    buf: &mut [u8],
    fmt: &[u8],
    args: &[Arg<'_>],
    level: SafetyLevel,
) -> Result<usize, FormatError> {
    let visible = buf.len().saturating_sub(1);
    let mut formatter = Formatter {
        out: &mut buf[..visible],
        pos: 0,
        level,
    };
    let result = formatter.run(fmt, args);
    let total = formatter.pos;
    write_char(buf, total.min(visible), 0);
    result.map(|()| total)
}

/// Format into a newly allocated buffer sized by a measuring pass.
///
/// The returned bytes carry no terminator.
pub fn vasprintf(fmt: &[u8], args: &[Arg<'_>]) -> Result<Vec<u8>, FormatError> {
    vasprintf_with_level(fmt, args, SafetyLevel::Strict)
}

/// [`vasprintf`] in an explicit mode.
pub fn vasprintf_with_level(
    fmt: &[u8],
    args: &[Arg<'_>],
    level: SafetyLevel,
) -> Result<Vec<u8>, FormatError> {
    let needed = vsnprintf_with_level(&mut [], fmt, args, level)?;
    let storage = needed
        .checked_add(1)
        .ok_or(FormatError::TooLarge { needed })?;
    let mut out = Vec::new();
    out.try_reserve_exact(storage)
        .map_err(|_| FormatError::TooLarge { needed })?;
    out.resize(storage, 0);
    let written = vsnprintf_with_level(&mut out, fmt, args, level)?;
    out.truncate(written);
    Ok(out)
}

/// Render state for one call: destination, logical cursor, mode.
struct Formatter<'b> {
    out: &'b mut [u8],
    pos: usize,
    level: SafetyLevel,
}

impl Formatter<'_> {
    fn run(&mut self, fmt: &[u8], args: &[Arg<'_>]) -> Result<(), FormatError> {
        let mut args = ArgCursor { args, next: 0 };
        for segment in parse_format_string(fmt) {
            match segment {
                FormatSegment::Literal(bytes) => self.literal(bytes),
                FormatSegment::Percent => self.literal(b"%"),
                FormatSegment::Spec(spec) => self.directive(spec, &mut args)?,
            }
        }
        Ok(())
    }

    fn literal(&mut self, bytes: &[u8]) {
        for &b in bytes {
            write_char(self.out, self.pos, b);
            self.pos = self.pos.saturating_add(1);
        }
    }

    fn directive(&mut self, spec: FormatSpec, args: &mut ArgCursor<'_, '_>) -> Result<(), FormatError> {
        let spec = self.resolve_fields(spec, args)?;
        let (radix, upper) = spec.radix();
        let conversion = char::from(spec.conversion);
        let (index, arg) = args.take()?;
        let mismatch = || FormatError::ArgumentMismatch {
            index,
            conversion,
            found: arg.kind(),
        };

        let written = match spec.conversion {
            b'd' | b'i' => {
                let raw = arg.as_raw_bits().ok_or_else(mismatch)?;
                let value = spec.length.narrow_signed(raw);
                write_signed(self.out, self.pos, value, radix, upper, &spec)?
            }
            b'u' | b'o' | b'x' | b'X' => {
                let raw = arg.as_raw_bits().ok_or_else(mismatch)?;
                let value = spec.length.narrow_unsigned(raw);
                write_unsigned(self.out, self.pos, value, radix, upper, &spec)?
            }
            b'c' => {
                let raw = arg.as_raw_bits().ok_or_else(mismatch)?;
                write_char_field(self.out, self.pos, raw as u8, &spec)
            }
            b's' => match arg {
                Arg::Str(text) => write_string(self.out, self.pos, text, &spec),
                _ => return Err(mismatch()),
            },
            b'p' => {
                let raw = arg.as_raw_bits().ok_or_else(mismatch)?;
                write_pointer(self.out, self.pos, raw as usize, &spec)?
            }
            // The parser only yields supported conversions.
            _ => 0,
        };
        self.pos = self.pos.saturating_add(written);
        Ok(())
    }

    /// Replace `*` fields with argument values and apply the mode's clamp.
    fn resolve_fields(
        &self,
        mut spec: FormatSpec,
        args: &mut ArgCursor<'_, '_>,
    ) -> Result<FormatSpec, FormatError> {
        if spec.width == Width::FromArg {
            let w = args.take_int()?;
            if w < 0 {
                // A negative `*` width is the '-' flag plus |width|.
                spec.flags.left_justify = true;
                spec.flags.zero_pad = false;
            }
            spec.width = Width::Fixed(w.unsigned_abs() as usize);
        }
        if spec.precision == Precision::FromArg {
            let p = args.take_int()?;
            spec.precision = if p < 0 {
                Precision::None
            } else {
                Precision::Fixed(p as usize)
            };
        }
        if let Width::Fixed(w) = spec.width {
            spec.width = Width::Fixed(self.level.clamp_field(w));
        }
        if let Precision::Fixed(p) = spec.precision {
            spec.precision = Precision::Fixed(self.level.clamp_field(p));
        }
        Ok(spec)
    }
}

/// Sequential reader over the argument slice.
struct ArgCursor<'s, 'a> {
    args: &'s [Arg<'a>],
    next: usize,
}

impl<'a> ArgCursor<'_, 'a> {
    fn take(&mut self) -> Result<(usize, Arg<'a>), FormatError> {
        let index = self.next;
        let arg = *self
            .args
            .get(index)
            .ok_or(FormatError::MissingArgument { index })?;
        self.next += 1;
        Ok((index, arg))
    }

    /// Take a `*` field value, read as a C `int`.
    fn take_int(&mut self) -> Result<i32, FormatError> {
        let (index, arg) = self.take()?;
        arg.as_raw_bits()
            .map(|raw| raw as i32)
            .ok_or(FormatError::ArgumentMismatch {
                index,
                conversion: '*',
                found: arg.kind(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(fmt: &str, args: &[Arg<'_>]) -> String {
        let out = vasprintf_with_level(fmt.as_bytes(), args, SafetyLevel::Strict).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn truncation_reports_full_length() {
        let mut buf = [0xFFu8; 4];
        let n = vsnprintf_with_level(&mut buf, b"%d", &[Arg::Int(12345)], SafetyLevel::Strict)
            .unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf, b"123\0");
    }

    #[test]
    fn zero_capacity_is_never_written() {
        let mut buf: [u8; 0] = [];
        let n = vsnprintf_with_level(&mut buf, b"abc%s", &[Arg::from("def")], SafetyLevel::Strict)
            .unwrap();
        assert_eq!(n, 6);
    }

    #[test]
    fn capacity_one_holds_only_terminator() {
        let mut buf = [b'x'; 1];
        let n = vsnprintf_with_level(&mut buf, b"hello", &[], SafetyLevel::Strict).unwrap();
        assert_eq!(n, 5);
        assert_eq!(buf, [0]);
    }

    #[test]
    fn conversions_dispatch() {
        assert_eq!(render("%d|%i", &[Arg::Int(-7), Arg::Int(8)]), "-7|8");
        assert_eq!(render("%u", &[Arg::Uint(u64::MAX)]), "18446744073709551615");
        assert_eq!(render("%o %x %X", &[Arg::Uint(8), Arg::Uint(255), Arg::Uint(255)]), "10 ff FF");
        assert_eq!(render("[%c]", &[Arg::Char(b'q')]), "[q]");
        assert_eq!(render("%s!", &[Arg::from("hey")]), "hey!");
        assert_eq!(render("100%%", &[]), "100%");
        assert_eq!(render("%p", &[Arg::Ptr(0x1000)]), "0x1000");
    }

    #[test]
    fn integer_kinds_are_reinterpreted() {
        assert_eq!(render("%d", &[Arg::Uint(u64::MAX)]), "-1");
        assert_eq!(render("%x", &[Arg::Int(-1)]), "ffffffffffffffff");
        assert_eq!(render("%d", &[Arg::Char(b'A')]), "65");
        assert_eq!(render("%c", &[Arg::Int(0x141)]), "A");
    }

    #[test]
    fn length_modifiers_narrow() {
        assert_eq!(render("%hhd", &[Arg::Int(300)]), "44");
        assert_eq!(render("%hd", &[Arg::Int(-1)]), "-1");
        assert_eq!(render("%hu", &[Arg::Int(-1)]), "65535");
        assert_eq!(render("%hhx", &[Arg::Uint(0x1ff)]), "ff");
        assert_eq!(render("%ld", &[Arg::Int(i64::MIN)]), "-9223372036854775808");
    }

    #[test]
    fn unmodified_integers_use_full_width() {
        assert_eq!(
            render("%d|%u", &[Arg::Int(1 << 32), Arg::Int(-1)]),
            "4294967296|18446744073709551615"
        );
        assert_eq!(render("%x", &[Arg::Uint(1 << 40)]), "10000000000");
    }

    #[test]
    fn star_width_and_precision() {
        assert_eq!(render("[%*d]", &[Arg::Int(5), Arg::Int(42)]), "[   42]");
        assert_eq!(render("[%*d]", &[Arg::Int(-5), Arg::Int(42)]), "[42   ]");
        assert_eq!(render("[%.*s]", &[Arg::Int(3), Arg::from("abcdef")]), "[abc]");
        assert_eq!(render("[%.*s]", &[Arg::Int(-1), Arg::from("abcdef")]), "[abcdef]");
    }

    #[test]
    fn unknown_directive_is_literal_and_consumes_nothing() {
        assert_eq!(render("%f %d", &[Arg::Int(3)]), "%f 3");
        assert_eq!(render("%-8.3q|%s", &[Arg::from("x")]), "%-8.3q|x");
    }

    #[test]
    fn absent_string_prints_placeholder() {
        assert_eq!(render("%s", &[Arg::Str(None)]), "<null>");
        assert_eq!(render("%8s", &[Arg::Str(None)]), "  <null>");
    }

    #[test]
    fn missing_argument_is_an_error() {
        let mut buf = [0xAAu8; 8];
        let err = vsnprintf_with_level(&mut buf, b"ab%dcd", &[], SafetyLevel::Strict).unwrap_err();
        assert!(matches!(err, FormatError::MissingArgument { index: 0 }));
        // Output so far is still terminated.
        assert_eq!(&buf[..3], b"ab\0");
    }

    #[test]
    fn mismatched_argument_is_an_error() {
        let err = vasprintf_with_level(b"%d", &[Arg::from("no")], SafetyLevel::Strict).unwrap_err();
        assert!(matches!(
            err,
            FormatError::ArgumentMismatch {
                index: 0,
                conversion: 'd',
                found: "str"
            }
        ));
        assert_eq!(err.code(), "argument-mismatch");
        let err = vasprintf_with_level(b"%s", &[Arg::Int(1)], SafetyLevel::Strict).unwrap_err();
        assert!(matches!(err, FormatError::ArgumentMismatch { conversion: 's', .. }));
        let err =
            vasprintf_with_level(b"%*d", &[Arg::Str(None), Arg::Int(1)], SafetyLevel::Strict)
                .unwrap_err();
        assert!(matches!(err, FormatError::ArgumentMismatch { conversion: '*', .. }));
    }

    #[test]
    fn hardened_clamps_width() {
        let mut buf = [0u8; 16];
        let n = vsnprintf_with_level(&mut buf, b"%99999d", &[Arg::Int(1)], SafetyLevel::Hardened)
            .unwrap();
        assert_eq!(n, crate::config::HARDENED_FIELD_LIMIT);
        let n = vsnprintf_with_level(&mut buf, b"%99999d", &[Arg::Int(1)], SafetyLevel::Strict)
            .unwrap();
        assert_eq!(n, 99_999);
        assert_eq!(&buf[..15], b"               ");
        assert_eq!(buf[15], 0);
    }

    #[test]
    fn default_entry_points_never_clamp() {
        let mut buf = [0u8; 8];
        assert_eq!(vsnprintf(&mut buf, b"%5000d", &[Arg::Int(1)]).unwrap(), 5000);
        assert_eq!(vsnprintf(&mut buf, b"%.6000s", &[Arg::from("x")]).unwrap(), 1);
        assert_eq!(vasprintf(b"%4097x", &[Arg::Uint(1)]).unwrap().len(), 4097);
    }

    #[test]
    fn missing_argument_message_names_the_slot() {
        let err = vasprintf(b"%d %d", &[Arg::Int(1)]).unwrap_err();
        assert_eq!(err.to_string(), "directive needs argument 1, which was not supplied");
    }

    #[test]
    fn extra_arguments_are_ignored() {
        assert_eq!(render("%d", &[Arg::Int(1), Arg::Int(2)]), "1");
    }
}
