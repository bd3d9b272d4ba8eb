use printkit_core::config::SafetyLevel;
use printkit_core::stdio::{
    Arg, FormatFlags, FormatSpec, NULL_PLACEHOLDER, Precision, Width, slong_to_ascii, str_pad,
    ulong_to_ascii, vasprintf, vsnprintf, vsnprintf_with_level, write_string,
};

/// Deterministic xorshift64 stream for sweeps.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

fn signed_samples() -> Vec<i64> {
    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
    let mut out = vec![0, 1, -1, 35, -35, 36, i64::MAX, i64::MIN, i64::MIN + 1];
    for _ in 0..256 {
        let raw = rng.next() as i64;
        out.push(raw);
        out.push(raw >> (rng.next() % 63));
    }
    out
}

fn spec_with(width: Option<usize>, precision: Option<usize>, left: bool) -> FormatSpec {
    FormatSpec {
        flags: FormatFlags {
            left_justify: left,
            ..FormatFlags::default()
        },
        width: width.map_or(Width::None, Width::Fixed),
        precision: precision.map_or(Precision::None, Precision::Fixed),
        ..FormatSpec::plain(b's')
    }
}

#[test]
fn signed_conversion_round_trips_in_every_radix() {
    let mut buf = [0u8; 80];
    for x in signed_samples() {
        for radix in 2..=36u32 {
            let n = slong_to_ascii(&mut buf, x, radix, radix % 2 == 0).unwrap();
            assert_eq!(buf[n], 0, "terminator after digits for {x} base {radix}");
            let text = std::str::from_utf8(&buf[..n]).unwrap();
            let back = i64::from_str_radix(text, radix)
                .unwrap_or_else(|e| panic!("{text:?} base {radix}: {e}"));
            assert_eq!(back, x, "base {radix}");
        }
    }
}

#[test]
fn unsigned_conversion_round_trips_in_every_radix() {
    let mut buf = [0u8; 80];
    let mut rng = XorShift(0xD1B5_4A32_D192_ED03);
    let mut samples = vec![0u64, 1, u64::MAX, 1 << 63];
    samples.extend((0..256).map(|_| rng.next()));
    for x in samples {
        for radix in 2..=36u32 {
            let n = ulong_to_ascii(&mut buf, x, radix, false).unwrap();
            let text = std::str::from_utf8(&buf[..n]).unwrap();
            assert_eq!(u64::from_str_radix(text, radix).unwrap(), x);
        }
    }
}

#[test]
fn base_ten_matches_decimal_display() {
    let mut buf = [0u8; 32];
    for x in signed_samples() {
        let n = slong_to_ascii(&mut buf, x, 10, false).unwrap();
        assert_eq!(&buf[..n], x.to_string().as_bytes());
        assert_eq!(buf[0] == b'-', x < 0);
    }
    let n = slong_to_ascii(&mut buf, 0, 10, false).unwrap();
    assert_eq!(&buf[..n], b"0");
}

#[test]
fn most_negative_value_in_every_radix() {
    let mut buf = [0u8; 80];
    for radix in 2..=36u32 {
        let n = slong_to_ascii(&mut buf, i64::MIN, radix, true).unwrap();
        let text = std::str::from_utf8(&buf[..n]).unwrap();
        assert!(text.starts_with('-'));
        assert_eq!(i64::from_str_radix(text, radix).unwrap(), i64::MIN);
    }
    let n = slong_to_ascii(&mut buf, i64::MIN, 2, false).unwrap();
    assert_eq!(n, 65);
}

#[test]
fn pad_length_and_placement() {
    let text = b"core";
    for count in [-9isize, -1, 0, 1, 9] {
        let out = str_pad(Some(text), b'*', count);
        assert_eq!(out.len(), text.len() + count.unsigned_abs());
        if count >= 0 {
            assert!(out.as_bytes().starts_with(text));
        } else {
            assert!(out.as_bytes().ends_with(text));
        }
        if count == 0 {
            assert_eq!(out.as_bytes(), text);
        }
    }
}

#[test]
fn write_string_width_and_precision_examples() {
    let mut buf = [0u8; 16];
    let n = write_string(&mut buf, 0, Some(b"ab"), &spec_with(Some(6), None, false));
    assert_eq!(n, 6);
    assert_eq!(&buf[..6], b"    ab");

    let mut buf = [0u8; 16];
    let n = write_string(&mut buf, 0, Some(b"hello"), &spec_with(None, Some(2), false));
    assert_eq!(n, 2);
    assert_eq!(&buf[..2], b"he");

    let mut buf = [b'#'; 16];
    let n = write_string(&mut buf, 0, Some(b"hello"), &spec_with(Some(8), Some(2), true));
    assert_eq!(n, 8);
    assert_eq!(&buf[..8], b"he      ");
    assert_eq!(buf[8], b'#');
}

#[test]
fn truncated_snprintf_reports_full_length() {
    let mut buf = [0xAAu8; 4];
    let n = vsnprintf(&mut buf, b"%d", &[Arg::Int(12345)]).unwrap();
    assert_eq!(n, 5);
    assert_eq!(&buf, b"123\0");
}

#[test]
fn terminator_always_inside_capacity() {
    let fmt = b"[%-8s|%+06d|%#x]";
    let args = [Arg::from("abc"), Arg::Int(-42), Arg::Uint(0xBEEF)];
    let full = vasprintf(fmt, &args).unwrap();
    for cap in 0..=full.len() + 2 {
        let mut buf = vec![0xEEu8; cap];
        let n = vsnprintf(&mut buf, fmt, &args).unwrap();
        assert_eq!(n, full.len());
        if cap == 0 {
            continue;
        }
        let term = n.min(cap - 1);
        assert_eq!(buf[term], 0);
        assert_eq!(&buf[..term], &full[..term]);
    }
}

#[test]
fn absent_string_prints_placeholder() {
    let out = vasprintf(b"%s", &[Arg::Str(None)]).unwrap();
    assert_eq!(out, NULL_PLACEHOLDER);
    let out = vasprintf(b"[%8s]", &[Arg::Str(None)]).unwrap();
    assert_eq!(out, b"[  <null>]");
}

#[test]
fn mixed_directives_render_like_c() {
    let out = vasprintf(
        b"%c|%5.3d|%-5u|%o|%#o|%X|%%|%i",
        &[
            Arg::Char(b'q'),
            Arg::Int(7),
            Arg::Uint(12),
            Arg::Uint(8),
            Arg::Uint(8),
            Arg::Uint(0xabc),
            Arg::Int(-9),
        ],
    )
    .unwrap();
    assert_eq!(out, b"q|  007|12   |10|010|ABC|%|-9");
}

#[test]
fn hardened_mode_bounds_field_width() {
    let mut buf = vec![0u8; 8];
    let strict = vsnprintf_with_level(&mut buf, b"%100000d", &[Arg::Int(1)], SafetyLevel::Strict)
        .unwrap();
    assert_eq!(strict, 100_000);
    let hardened =
        vsnprintf_with_level(&mut buf, b"%100000d", &[Arg::Int(1)], SafetyLevel::Hardened)
            .unwrap();
    assert_eq!(hardened, printkit_core::config::HARDENED_FIELD_LIMIT);
}

#[test]
fn macros_accept_native_values() {
    let mut buf = [0u8; 32];
    let n = printkit_core::snprintf!(&mut buf, "%s:%d:%u", "port", -1i32, 8080u16).unwrap();
    assert_eq!(&buf[..n], b"port:-1:8080");

    let out = printkit_core::asprintf!("%5s|%-3c|", Some("ok"), 'x').unwrap();
    assert_eq!(out, b"   ok|x  |");

    let mut sink = Vec::new();
    printkit_core::fprintf!(&mut sink, "%x", u64::MAX).unwrap();
    assert_eq!(sink, b"ffffffffffffffff");
}
