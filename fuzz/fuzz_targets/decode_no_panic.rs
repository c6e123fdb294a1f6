#![no_main]
use libfuzzer_sys::fuzz_target;
use packbits::{decode, decoded_len};

fuzz_target!(|comp: &[u8]| {
    // Property: decoder must never panic on arbitrary input.
    // It may return Ok(_) or a defined Error, and agrees with decoded_len.
    match (decode(comp), decoded_len(comp)) {
        (Ok(d), Ok(n)) => assert_eq!(d.len(), n),
        (Err(a), Err(b)) => assert_eq!(a, b),
        (a, b) => panic!("decode {:?} vs decoded_len {:?}", a.map(|d| d.len()), b),
    }
});
