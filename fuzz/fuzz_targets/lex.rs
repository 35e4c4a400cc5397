#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes, including invalid UTF-8. Must never panic.
    if let Ok(lexed) = jparse::lexer::tokenize_bytes(data) {
        for token in &lexed.tokens {
            assert!(token.span.start < token.span.end);
            assert!(token.span.end <= data.len());
        }
    }
});
