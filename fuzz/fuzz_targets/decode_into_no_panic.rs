#![no_main]
use libfuzzer_sys::fuzz_target;
use packbits::decode_into;

fuzz_target!(|input: (u16, &[u8])| {
    // Property: a fixed output buffer of any size never overflows or panics.
    let (cap, comp) = input;
    let mut out = vec![0u8; cap as usize % 4096];
    if let Ok(n) = decode_into(comp, &mut out) {
        assert!(n <= out.len());
    }
});
