//! Formatter operating modes.
//!
//! The plain entry points (`vsnprintf`, `vasprintf`, the stream front ends
//! and the macros) always format in [`SafetyLevel::Strict`]: width and
//! precision are honored as written and the returned length is the full
//! length the output needs. Callers that want bounded field sizes pass
//! [`SafetyLevel::Hardened`] to the `_with_level` variants explicitly; the
//! mode is never taken from the environment.

/// Largest width or precision honored in hardened mode.
pub const HARDENED_FIELD_LIMIT: usize = 4096;

/// Formatter operating mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyLevel {
    /// Width and precision are taken verbatim.
    #[default]
    Strict,
    /// Width and precision are clamped to [`HARDENED_FIELD_LIMIT`].
    Hardened,
    /// Benchmark baseline. Formats like `Strict`.
    Off,
}

impl SafetyLevel {
    /// Parse a mode name, case-insensitively. Unknown names are `Strict`.
    ///
    /// Besides the canonical names this accepts `default`/`posix` for
    /// strict, `clamp`/`safe` for hardened and `none`/`disabled` for off.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hardened" | "clamp" | "safe" => Self::Hardened,
            "off" | "none" | "disabled" => Self::Off,
            _ => Self::Strict,
        }
    }

    /// True when field sizes are clamped.
    #[must_use]
    pub const fn clamps_fields(self) -> bool {
        matches!(self, Self::Hardened)
    }

    /// Apply this mode's bound to a width or precision.
    #[must_use]
    pub fn clamp_field(self, value: usize) -> usize {
        if self.clamps_fields() {
            value.min(HARDENED_FIELD_LIMIT)
        } else {
            value
        }
    }

    /// Lowercase name, as used in fixtures and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Hardened => "hardened",
            Self::Off => "off",
        }
    }
}

impl std::fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_names() {
        let cases = [
            ("strict", SafetyLevel::Strict),
            ("POSIX", SafetyLevel::Strict),
            ("hardened", SafetyLevel::Hardened),
            (" Clamp ", SafetyLevel::Hardened),
            ("off", SafetyLevel::Off),
            ("disabled", SafetyLevel::Off),
            ("bogus", SafetyLevel::Strict),
        ];
        for (name, want) in cases {
            assert_eq!(SafetyLevel::from_str_loose(name), want, "{name}");
        }
    }

    #[test]
    fn only_hardened_clamps() {
        let big = 1 << 20;
        assert_eq!(SafetyLevel::Strict.clamp_field(big), big);
        assert_eq!(SafetyLevel::Off.clamp_field(big), big);
        assert_eq!(SafetyLevel::Hardened.clamp_field(big), HARDENED_FIELD_LIMIT);
        assert_eq!(SafetyLevel::Hardened.clamp_field(12), 12);
        assert_eq!(SafetyLevel::Hardened.to_string(), "hardened");
    }

    #[test]
    fn default_is_unclamped() {
        assert_eq!(SafetyLevel::default(), SafetyLevel::Strict);
        assert!(!SafetyLevel::default().clamps_fields());
    }
}
