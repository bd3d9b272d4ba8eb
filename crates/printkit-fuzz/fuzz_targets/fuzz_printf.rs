#![no_main]
use libfuzzer_sys::fuzz_target;
use printkit_core::config::SafetyLevel;
use printkit_core::stdio::{Arg, FormatError, vasprintf_with_level, vsnprintf_with_level};

// Layout: [capacity][mode][template...]. A fixed argument list covers every
// conversion kind; templates that ask for more simply fail cleanly.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let capacity = usize::from(data[0]);
    let level = if data[1] & 1 == 0 {
        SafetyLevel::Strict
    } else {
        SafetyLevel::Hardened
    };
    let fmt = &data[2..];
    let args = [
        Arg::Int(-1),
        Arg::Uint(u64::MAX),
        Arg::Char(b'x'),
        Arg::Str(Some(b"fuzz")),
        Arg::Ptr(0x1000),
        Arg::Int(3),
        Arg::Str(None),
        Arg::Int(i64::MIN),
    ];

    let mut buf = vec![0xA5u8; capacity];
    let bounded = vsnprintf_with_level(&mut buf, fmt, &args, level);
    let unbounded = vasprintf_with_level(fmt, &args, level);

    match (bounded, unbounded) {
        (Ok(total), Ok(full)) => {
            assert_eq!(total, full.len());
            if capacity > 0 {
                let term = total.min(capacity - 1);
                assert_eq!(buf[term], 0);
                assert_eq!(&buf[..term], &full[..term]);
            }
        }
        (Err(_), Err(_)) => {}
        // A saturated width measures fine but cannot be allocated.
        (Ok(_), Err(FormatError::TooLarge { .. })) => {}
        (a, b) => panic!("bounded {a:?} and unbounded {b:?} disagree"),
    }
});
