#![no_main]
use libfuzzer_sys::fuzz_target;
use printkit_core::stdio::str_pad;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let fill = data[0];
    // Keep counts small enough to allocate.
    let count = isize::from(i16::from_le_bytes([data[1], data[2]]));
    let text = &data[3..];
    let out = str_pad(Some(text), fill, count);
    assert_eq!(out.len(), text.len() + count.unsigned_abs());
    if count >= 0 {
        assert!(out.as_bytes().starts_with(text));
    } else {
        assert!(out.as_bytes().ends_with(text));
    }
    assert_eq!(out.as_bytes_with_nul().last(), Some(&0));
});
