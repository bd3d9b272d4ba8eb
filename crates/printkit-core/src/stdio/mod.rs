//! Standard formatted output.
//!
//! Implements the `<stdio.h>` printf family: integer-to-text conversion,
//! bounded buffer writers, the padding helper, the directive parser and the
//! formatter driver with its stream front ends.

pub mod args;
pub mod numeric;
pub mod pad;
pub mod printf;
pub mod spec;
pub mod stream;
pub mod writer;

pub use args::{Arg, NON_ASCII_CHAR};
pub use numeric::{ConvertError, DIGIT_BUFFER_LEN, DigitBuffer, slong_to_ascii, ulong_to_ascii};
pub use pad::{PaddedString, str_pad};
pub use printf::{FormatError, vasprintf, vasprintf_with_level, vsnprintf, vsnprintf_with_level};
pub use spec::{
    FormatFlags, FormatSegment, FormatSpec, LengthMod, Precision, Width, parse_format_spec,
    parse_format_string,
};
pub use stream::{vfprintf, vprintf};
pub use writer::{
    NULL_PLACEHOLDER, write_char, write_char_field, write_pointer, write_signed, write_string,
    write_unsigned,
};
