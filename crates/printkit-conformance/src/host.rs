//! Reference rendering through the host C library.
//!
//! Every variadic slot is passed as one `c_long` word. On LP64 targets that
//! word occupies the same slot the promoted `int`, `long` and pointer
//! arguments would, so `va_arg` reads back the intended value. Integer
//! directives without a length modifier are rewritten to `l` so the host
//! reads them at the same 64-bit width the core uses.

use std::ffi::CString;

use libc::{c_char, c_long};
use printkit_core::stdio::{FormatSpec, LengthMod, Precision, Width, parse_format_spec};
use thiserror::Error;

use crate::{FixtureArg, visible_text};

/// Largest argument list [`host_snprintf`] forwards.
pub const MAX_HOST_ARGS: usize = 8;

/// Why a case cannot be rendered by the host with defined behavior.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostSkip {
    #[error("conversion %{0} has no portable host rendering")]
    Unsupported(char),
    #[error("directive runs off the end of the template")]
    Unterminated,
    #[error("percent escape with flags or width")]
    DecoratedPercent,
    #[error("zero or alternate flags on %{0}")]
    Decorated(char),
    #[error("absent string argument")]
    AbsentString,
    #[error("argument {index} does not match %{conversion}")]
    Mismatch { index: usize, conversion: char },
    #[error("template needs {needed} arguments, {supplied} supplied")]
    MissingArguments { needed: usize, supplied: usize },
    #[error("{0} arguments exceed the forwarding limit")]
    TooManyArguments(usize),
    #[error("host long is not 64 bits")]
    UnsupportedTarget,
    #[error("host snprintf returned {0}")]
    HostFailure(i32),
}

/// Host output for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRendering {
    /// Bytes stored before the terminator.
    pub output: String,
    /// Return value of `snprintf`.
    pub total: usize,
}

/// Rewrite `format` for the host and check that `args` satisfy it.
///
/// Returns the host template and the number of arguments it consumes.
pub fn host_template(format: &str, args: &[FixtureArg]) -> Result<(CString, usize), HostSkip> {
    let bytes = format.as_bytes();
    let bytes = &bytes[..bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len())];
    let mut out = Vec::with_capacity(bytes.len() + 8);
    let mut next = 0usize;
    let mut pos = 0usize;

    while pos < bytes.len() {
        if bytes[pos] != b'%' {
            out.push(bytes[pos]);
            pos += 1;
            continue;
        }
        let (spec, consumed) = parse_format_spec(&bytes[pos + 1..]).ok_or(HostSkip::Unterminated)?;
        let directive = &bytes[pos..pos + 1 + consumed];
        pos += 1 + consumed;

        if spec.conversion == b'%' {
            if directive != b"%%" {
                return Err(HostSkip::DecoratedPercent);
            }
            out.extend_from_slice(directive);
            continue;
        }
        check_directive(&spec)?;

        if spec.width == Width::FromArg {
            take_integral(args, &mut next, &spec)?;
        }
        if spec.precision == Precision::FromArg {
            take_integral(args, &mut next, &spec)?;
        }
        if spec.conversion == b's' {
            match args.get(next) {
                Some(FixtureArg::Str(Some(_))) => next += 1,
                Some(FixtureArg::Str(None)) => return Err(HostSkip::AbsentString),
                Some(_) => {
                    return Err(HostSkip::Mismatch {
                        index: next,
                        conversion: 's',
                    });
                }
                None => return Err(missing(next, args)),
            }
        } else {
            take_integral(args, &mut next, &spec)?;
        }

        let widen = spec.length == LengthMod::None
            && matches!(spec.conversion, b'd' | b'i' | b'u' | b'o' | b'x' | b'X');
        if widen {
            out.extend_from_slice(&directive[..directive.len() - 1]);
            out.push(b'l');
            out.push(spec.conversion);
        } else {
            out.extend_from_slice(directive);
        }
    }

    let template = CString::new(out).map_err(|_| HostSkip::Unterminated)?;
    Ok((template, next))
}

/// Render `format` with `args` through the host `snprintf` into a buffer of
/// `capacity` bytes.
pub fn host_snprintf(
    format: &str,
    args: &[FixtureArg],
    capacity: usize,
) -> Result<HostRendering, HostSkip> {
    if size_of::<c_long>() != 8 {
        return Err(HostSkip::UnsupportedTarget);
    }
    let (template, _) = host_template(format, args)?;
    if args.len() > MAX_HOST_ARGS {
        return Err(HostSkip::TooManyArguments(args.len()));
    }

    let strings: Vec<Option<CString>> = args
        .iter()
        .map(|arg| match arg {
            FixtureArg::Str(Some(s)) => {
                let bytes = s.as_bytes();
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                CString::new(&bytes[..end]).ok()
            }
            _ => None,
        })
        .collect();
    let words: Vec<c_long> = args
        .iter()
        .zip(&strings)
        .map(|(arg, owned)| match arg {
            FixtureArg::Int(v) => *v as c_long,
            FixtureArg::Uint(v) => *v as c_long,
            FixtureArg::Char(c) => c_long::from(*c),
            FixtureArg::Ptr(p) => *p as c_long,
            FixtureArg::Str(_) => owned.as_ref().map_or(0, |c| c.as_ptr() as c_long),
        })
        .collect();

    let mut buf = vec![0u8; capacity];
    let dst = if capacity == 0 {
        std::ptr::null_mut()
    } else {
        buf.as_mut_ptr().cast::<c_char>()
    };
    let fmt = template.as_ptr();
    let w = words.as_slice();

    // SAFETY: `dst` is null with size 0 or points at `capacity` writable
    // bytes. `fmt` is NUL-terminated and `host_template` checked that every
    // directive it contains is fed by a word of the matching class; string
    // words point into `strings`, which outlives the call.
    let rc = unsafe {
        match w.len() {
            0 => libc::snprintf(dst, capacity, fmt),
            1 => libc::snprintf(dst, capacity, fmt, w[0]),
            2 => libc::snprintf(dst, capacity, fmt, w[0], w[1]),
            3 => libc::snprintf(dst, capacity, fmt, w[0], w[1], w[2]),
            4 => libc::snprintf(dst, capacity, fmt, w[0], w[1], w[2], w[3]),
            5 => libc::snprintf(dst, capacity, fmt, w[0], w[1], w[2], w[3], w[4]),
            6 => libc::snprintf(dst, capacity, fmt, w[0], w[1], w[2], w[3], w[4], w[5]),
            7 => libc::snprintf(dst, capacity, fmt, w[0], w[1], w[2], w[3], w[4], w[5], w[6]),
            8 => libc::snprintf(
                dst, capacity, fmt, w[0], w[1], w[2], w[3], w[4], w[5], w[6], w[7],
            ),
            n => return Err(HostSkip::TooManyArguments(n)),
        }
    };
    if rc < 0 {
        return Err(HostSkip::HostFailure(rc));
    }
    let total = rc as usize;
    Ok(HostRendering {
        output: visible_text(&buf, total),
        total,
    })
}

/// Reject directives whose host rendering is implementation-defined.
fn check_directive(spec: &FormatSpec) -> Result<(), HostSkip> {
    let conversion = char::from(spec.conversion);
    if !spec.is_supported() {
        return Err(HostSkip::Unsupported(conversion));
    }
    let decorated = match spec.conversion {
        b's' | b'c' => spec.flags.zero_pad || spec.flags.alt_form,
        b'p' => {
            spec.flags.zero_pad
                || spec.flags.alt_form
                || spec.flags.force_sign
                || spec.flags.space_sign
                || spec.precision != Precision::None
        }
        _ => false,
    };
    if decorated {
        return Err(HostSkip::Decorated(conversion));
    }
    Ok(())
}

fn take_integral(args: &[FixtureArg], next: &mut usize, spec: &FormatSpec) -> Result<(), HostSkip> {
    match args.get(*next) {
        Some(FixtureArg::Str(_)) => Err(HostSkip::Mismatch {
            index: *next,
            conversion: char::from(spec.conversion),
        }),
        Some(_) => {
            *next += 1;
            Ok(())
        }
        None => Err(missing(*next, args)),
    }
}

fn missing(next: usize, args: &[FixtureArg]) -> HostSkip {
    HostSkip::MissingArguments {
        needed: next + 1,
        supplied: args.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_integer_directives_gain_long_modifier() {
        let args = [
            FixtureArg::Int(1),
            FixtureArg::Uint(2),
            FixtureArg::Uint(3),
            FixtureArg::Int(4),
            FixtureArg::Uint(5),
        ];
        let (template, used) = host_template("%d|%5lx|%hhu|%-*X%%", &args).unwrap();
        assert_eq!(template.as_bytes(), b"%ld|%5lx|%hhu|%-*lX%%");
        assert_eq!(used, 5);
    }

    #[test]
    fn undefined_cases_are_skipped() {
        assert_eq!(
            host_template("%f", &[FixtureArg::Int(0)]),
            Err(HostSkip::Unsupported('f'))
        );
        assert_eq!(
            host_template("%s", &[FixtureArg::Str(None)]),
            Err(HostSkip::AbsentString)
        );
        assert_eq!(
            host_template("%05s", &[FixtureArg::Str(Some("a".into()))]),
            Err(HostSkip::Decorated('s'))
        );
        assert_eq!(
            host_template("%d", &[FixtureArg::Str(Some("a".into()))]),
            Err(HostSkip::Mismatch {
                index: 0,
                conversion: 'd'
            })
        );
        assert_eq!(
            host_template("%d %d", &[FixtureArg::Int(1)]),
            Err(HostSkip::MissingArguments {
                needed: 2,
                supplied: 1
            })
        );
    }

    #[test]
    fn host_renders_and_truncates() {
        let out = host_snprintf("%d", &[FixtureArg::Int(12345)], 4).unwrap();
        assert_eq!(out.output, "123");
        assert_eq!(out.total, 5);

        let out = host_snprintf(
            "%s=%c%ld",
            &[
                FixtureArg::Str(Some("k".into())),
                FixtureArg::Char(b'v'),
                FixtureArg::Int(i64::MIN),
            ],
            64,
        )
        .unwrap();
        assert_eq!(out.output, format!("k=v{}", i64::MIN));
    }

    #[test]
    fn zero_capacity_only_measures() {
        let out = host_snprintf("%x", &[FixtureArg::Uint(0xabcdef)], 0).unwrap();
        assert_eq!(out.output, "");
        assert_eq!(out.total, 6);
    }
}
