//! Variadic-style wrappers over the `v*` functions.
//!
//! Each argument goes through [`Arg::from`](crate::stdio::Arg), so integers,
//! bytes, `&str`, byte slices and `Option<&str>` can be passed directly. The
//! template may be a `&str` or a byte string.
//!
//! ```
//! let mut buf = [0u8; 4];
//! let n = printkit_core::snprintf!(&mut buf, "%d", 12345).unwrap();
//! assert_eq!(n, 5);
//! assert_eq!(&buf, b"123\0");
//! ```

/// `snprintf(buf, fmt, args...)` over [`vsnprintf`](crate::stdio::vsnprintf).
#[macro_export]
macro_rules! snprintf {
    ($buf:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::stdio::vsnprintf(
            $buf,
            ::core::convert::AsRef::<[u8]>::as_ref(&$fmt),
            &[$($crate::stdio::Arg::from($arg)),*],
        )
    };
}

/// `asprintf(fmt, args...)` over [`vasprintf`](crate::stdio::vasprintf).
#[macro_export]
macro_rules! asprintf {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::stdio::vasprintf(
            ::core::convert::AsRef::<[u8]>::as_ref(&$fmt),
            &[$($crate::stdio::Arg::from($arg)),*],
        )
    };
}

/// `fprintf(stream, fmt, args...)` over [`vfprintf`](crate::stdio::vfprintf).
#[macro_export]
macro_rules! fprintf {
    ($stream:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::stdio::vfprintf(
            $stream,
            ::core::convert::AsRef::<[u8]>::as_ref(&$fmt),
            &[$($crate::stdio::Arg::from($arg)),*],
        )
    };
}

/// `printf(fmt, args...)` over [`vprintf`](crate::stdio::vprintf).
#[macro_export]
macro_rules! printf {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::stdio::vprintf(
            ::core::convert::AsRef::<[u8]>::as_ref(&$fmt),
            &[$($crate::stdio::Arg::from($arg)),*],
        )
    };
}
