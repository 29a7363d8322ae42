#![no_main]

//! Move parser fuzzer.
//!
//! Agent output is untrusted: parsing must never panic, and anything accepted
//! must display back to text that parses to the same move.

use libfuzzer_sys::fuzz_target;
use tricolor::game::{HOLES, Move};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Some(mv) = Move::parse(&text) {
        assert!(mv.hole() < HOLES);
        assert_eq!(Move::parse(&mv.to_string()), Some(mv));
    }
});
