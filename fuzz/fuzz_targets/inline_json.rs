#![no_main]
//! Fuzz target: inliner over JSON-encoded programs.
//!
//! Invariants checked:
//! - Decoding arbitrary bytes never panics.
//! - Any program that decodes can be inlined against any candidate set.
//! - Without freshening the unique counter comes back unchanged.

use ember_core::Program;
use ember_inline::{inline_program, InlineOptions, Inlines};
use libfuzzer_sys::fuzz_target;
use serde::Deserialize;

#[derive(Deserialize)]
struct Input {
    #[serde(default)]
    candidates: Inlines,
    program: Program,
}

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 64 * 1024 {
        &data[..64 * 1024]
    } else {
        data
    };

    let Ok(input) = serde_json::from_slice::<Input>(data) else {
        return;
    };

    let (_, watermark) = inline_program(
        input.program,
        &input.candidates,
        17,
        &InlineOptions::default(),
    );
    assert_eq!(watermark, 17);
});
