//! Format directive model and parser.
//!
//! A directive is `%[flags][width][.precision][length]conversion`. The parser
//! walks a template into literal runs and decoded [`FormatSpec`]s. Directives
//! whose conversion byte is not supported are kept as literal text so they
//! reach the output unchanged.

/// Directive flags, one boolean per flag character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    /// `-`
    pub left_justify: bool,
    /// `+`
    pub force_sign: bool,
    /// ` `
    pub space_sign: bool,
    /// `#`
    pub alt_form: bool,
    /// `0`
    pub zero_pad: bool,
}

impl FormatFlags {
    /// Set the flag for `byte`. Returns false when `byte` is not a flag.
    fn set(&mut self, byte: u8) -> bool {
        match byte {
            b'-' => self.left_justify = true,
            b'+' => self.force_sign = true,
            b' ' => self.space_sign = true,
            b'#' => self.alt_form = true,
            b'0' => self.zero_pad = true,
            _ => return false,
        }
        true
    }

    /// `+` beats ` ` and `-` beats `0`.
    fn resolve(mut self) -> Self {
        self.space_sign &= !self.force_sign;
        self.zero_pad &= !self.left_justify;
        self
    }
}

/// Minimum field width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
    /// `*`: taken from the next argument.
    FromArg,
}

/// Precision. An explicit `.0` is `Fixed(0)`, not `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(usize),
    /// `.*`: taken from the next argument.
    FromArg,
}

/// Integer length modifier: `hh`, `h`, `l`, `ll`, `z`, `t`, `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMod {
    None,
    Hh,
    H,
    L,
    Ll,
    Z,
    T,
    J,
}

impl LengthMod {
    /// Reinterpret a raw 64-bit slot as the signed type this modifier
    /// selects. Only `h` and `hh` narrow; everything else keeps 64 bits.
    #[must_use]
    pub const fn narrow_signed(self, raw: u64) -> i64 {
        match self {
            Self::Hh => raw as i8 as i64,
            Self::H => raw as i16 as i64,
            _ => raw as i64,
        }
    }

    /// Unsigned counterpart of [`LengthMod::narrow_signed`].
    #[must_use]
    pub const fn narrow_unsigned(self, raw: u64) -> u64 {
        match self {
            Self::Hh => raw as u8 as u64,
            Self::H => raw as u16 as u64,
            _ => raw,
        }
    }
}

/// One decoded `%` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    pub width: Width,
    pub precision: Precision,
    pub length: LengthMod,
    pub conversion: u8,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self::plain(b's')
    }
}

impl FormatSpec {
    /// Spec for `conversion` with no flags, width or precision.
    #[must_use]
    pub fn plain(conversion: u8) -> Self {
        Self {
            flags: FormatFlags::default(),
            width: Width::None,
            precision: Precision::None,
            length: LengthMod::None,
            conversion,
        }
    }

    /// Minimum field width, 0 when unset.
    #[must_use]
    pub fn min_width(&self) -> usize {
        match self.width {
            Width::Fixed(w) => w,
            _ => 0,
        }
    }

    /// Explicit precision, if any.
    #[must_use]
    pub fn precision_value(&self) -> Option<usize> {
        match self.precision {
            Precision::Fixed(p) => Some(p),
            _ => None,
        }
    }

    /// Byte used to fill leading padding.
    #[must_use]
    pub fn pad_byte(&self) -> u8 {
        if self.flags.zero_pad && !self.flags.left_justify {
            b'0'
        } else {
            b' '
        }
    }

    /// Whether the driver knows how to render this conversion.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        matches!(
            self.conversion,
            b'd' | b'i' | b'u' | b'o' | b'x' | b'X' | b's' | b'c' | b'p' | b'%'
        )
    }

    /// Radix and letter case of an integer conversion.
    #[must_use]
    pub fn radix(&self) -> (u32, bool) {
        match self.conversion {
            b'o' => (8, false),
            b'x' | b'p' => (16, false),
            b'X' => (16, true),
            _ => (10, false),
        }
    }
}

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSegment<'a> {
    /// Bytes copied to the output as-is. Unsupported and unterminated
    /// directives are kept here verbatim.
    Literal(&'a [u8]),
    /// A directive whose conversion is `%`; renders one `%` and takes no
    /// argument.
    Percent,
    /// A supported conversion.
    Spec(FormatSpec),
}

/// Byte cursor over the text after a `%`.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Advance past `byte` if it is next.
    fn eat(&mut self, byte: u8) -> bool {
        let hit = self.peek() == Some(byte);
        self.pos += usize::from(hit);
        hit
    }

    /// Consume a run of ASCII digits. `None` when there are none; values
    /// that overflow saturate at `usize::MAX`.
    fn number(&mut self) -> Option<usize> {
        let start = self.pos;
        let mut value = 0usize;
        while let Some(d @ b'0'..=b'9') = self.peek() {
            value = value.saturating_mul(10).saturating_add(usize::from(d - b'0'));
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    fn length(&mut self) -> LengthMod {
        if self.eat(b'h') {
            if self.eat(b'h') { LengthMod::Hh } else { LengthMod::H }
        } else if self.eat(b'l') {
            if self.eat(b'l') { LengthMod::Ll } else { LengthMod::L }
        } else if self.eat(b'z') {
            LengthMod::Z
        } else if self.eat(b't') {
            LengthMod::T
        } else if self.eat(b'j') {
            LengthMod::J
        } else {
            LengthMod::None
        }
    }
}

/// Decode one directive from `fmt`, the bytes following a `%`.
///
/// Returns the spec and the number of bytes consumed, conversion byte
/// included, or `None` when the input ends before a conversion byte. The
/// conversion byte itself is not validated; see [`FormatSpec::is_supported`].
#[must_use]
pub fn parse_format_spec(fmt: &[u8]) -> Option<(FormatSpec, usize)> {
    let mut cur = Cursor { bytes: fmt, pos: 0 };

    let mut flags = FormatFlags::default();
    while cur.peek().is_some_and(|b| flags.set(b)) {
        cur.pos += 1;
    }

    let width = if cur.eat(b'*') {
        Width::FromArg
    } else {
        cur.number().map_or(Width::None, Width::Fixed)
    };

    let precision = if !cur.eat(b'.') {
        Precision::None
    } else if cur.eat(b'*') {
        Precision::FromArg
    } else {
        // A bare '.' means precision zero.
        Precision::Fixed(cur.number().unwrap_or(0))
    };

    let length = cur.length();
    let conversion = cur.peek()?;
    cur.pos += 1;

    let spec = FormatSpec {
        flags: flags.resolve(),
        width,
        precision,
        length,
        conversion,
    };
    Some((spec, cur.pos))
}

/// Split a template into segments.
///
/// The template ends at its first NUL byte. Supported directives become
/// [`FormatSegment::Spec`], any directive converting `%` becomes
/// [`FormatSegment::Percent`], and everything else, unknown conversions and
/// a dangling trailing directive included, stays literal.
#[must_use]
pub fn parse_format_string(fmt: &[u8]) -> Vec<FormatSegment<'_>> {
    let end = fmt.iter().position(|&b| b == 0).unwrap_or(fmt.len());
    let fmt = &fmt[..end];
    let mut segments = Vec::new();
    let mut rest = fmt;

    while !rest.is_empty() {
        let Some(percent) = rest.iter().position(|&b| b == b'%') else {
            segments.push(FormatSegment::Literal(rest));
            break;
        };
        if percent > 0 {
            segments.push(FormatSegment::Literal(&rest[..percent]));
        }
        let directive = &rest[percent..];
        let Some((spec, consumed)) = parse_format_spec(&directive[1..]) else {
            segments.push(FormatSegment::Literal(directive));
            break;
        };
        let (raw, tail) = directive.split_at(1 + consumed);
        segments.push(if spec.conversion == b'%' {
            FormatSegment::Percent
        } else if spec.is_supported() {
            FormatSegment::Spec(spec)
        } else {
            FormatSegment::Literal(raw)
        });
        rest = tail;
    }
    segments
}
