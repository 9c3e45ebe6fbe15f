#![no_main]

use libfuzzer_sys::fuzz_target;
use typeset_text::{combine_whitespace, tokenize};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for line in text.split('\n') {
        let tokens = tokenize(line);
        let joined: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(joined, line, "tokens must concatenate to the line");
        assert!(tokens.iter().all(|t| !t.text.is_empty()));
    }

    let once = combine_whitespace(text);
    assert_eq!(combine_whitespace(&once), once);
});
