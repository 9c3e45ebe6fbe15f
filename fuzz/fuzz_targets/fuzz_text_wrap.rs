#![no_main]

use libfuzzer_sys::fuzz_target;
use typeset_text::{
    FixedAdvanceRuler, LineMeasurer, Measurer, SingleLineWrapper, TextTrimming, WrapOptions,
    Wrapper,
};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Cap length to keep fuzzing fast.
    if text.len() > 2048 {
        return;
    }

    let measurer = LineMeasurer::new(FixedAdvanceRuler::new(1.0, 1.0));

    // Wrap at various widths and heights: must never panic.
    for width in [1.0, 3.0, 10.0, 40.0, 80.0] {
        for (trimming, breaking) in [
            (TextTrimming::Ellipsis, true),
            (TextTrimming::Ellipsis, false),
            (TextTrimming::None, true),
        ] {
            let wrapper = Wrapper::with_options(
                WrapOptions::new()
                    .text_trimming(trimming)
                    .allow_breaking_words(breaking),
            );
            for height in [0.0, 2.0, f64::INFINITY] {
                let result = wrapper.wrap(text, &measurer, width, height);

                // Each wrapped line must fit within the width.
                for line in result.lines() {
                    let w = measurer.measure(line).width;
                    assert!(
                        w <= width,
                        "Wrapped line exceeds width {}: width={} '{}'",
                        width,
                        w,
                        line
                    );
                }
                assert!(height.is_infinite() || result.no_lines as f64 <= height);
            }
        }
    }

    // Single-line narrowing: must never panic.
    if !text.contains('\n') && text.len() <= 512 {
        let _narrowed = SingleLineWrapper::new().wrap(text, &measurer, 20.0, f64::INFINITY);
    }
});
