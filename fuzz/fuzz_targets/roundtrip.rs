#![no_main]
use libfuzzer_sys::fuzz_target;
use packbits::{decode, Encoder};

fuzz_target!(|data: &[u8]| {
    // Property: decode(encode(x)) == x, for every encoder setting.
    for encoder in [Encoder::new(), Encoder::new().min_run(2).max_run(128)] {
        let c = match encoder.encode(data) {
            Ok(c) => c,
            Err(e) => panic!("unbounded encode failed: {:?}", e),
        };
        assert!(c.len() <= encoder.max_encoded_len(data.len()));
        match decode(&c) {
            Ok(d) => assert_eq!(d.as_slice(), data),
            Err(e) => panic!("decode failed on encoder output: {:?}", e),
        }
    }
});
