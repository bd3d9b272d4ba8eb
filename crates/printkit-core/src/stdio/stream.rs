//! Stream front ends: `vfprintf` and `vprintf`.
//!
//! The output is measured, rendered into an owned buffer, then handed to the
//! destination in one `write_all`, so a stream never sees a partial
//! directive.

use std::io::Write;

use super::args::Arg;
use super::printf::{FormatError, vasprintf};

/// Format to any [`Write`] destination. Returns the number of bytes written.
pub fn vfprintf<W: Write + ?Sized>(
    stream: &mut W,
    fmt: &[u8],
    args: &[Arg<'_>],
) -> Result<usize, FormatError> {
    let rendered = vasprintf(fmt, args)?;
    stream.write_all(&rendered)?;
    Ok(rendered.len())
}

/// Format to standard output.
pub fn vprintf(fmt: &[u8], args: &[Arg<'_>]) -> Result<usize, FormatError> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    let written = vfprintf(&mut lock, fmt, args)?;
    lock.flush()?;
    Ok(written)
}
