//! End-to-end wrapping scenarios through the public API, using a
//! proportional function ruler behind the measurement cache.

use typeset_text::{
    CachePolicy, CachedMeasurer, Dimensions, LineMeasurer, MeasureBy, Measurer, SingleLineWrapper,
    TextTrimming, TextWrap, WrapError, WrapOptions, Wrapper, combine_whitespace, tokenize,
};

/// Narrow letters are 4 wide, wide letters 12, everything else 8.
fn proportional(text: &str) -> Dimensions {
    let width = text
        .chars()
        .map(|c| match c {
            'i' | 'l' | 'j' | '.' | ',' | '!' => 4.0,
            'm' | 'w' | 'M' | 'W' => 12.0,
            _ => 8.0,
        })
        .sum();
    Dimensions::new(width, 16.0)
}

fn measurer() -> CachedMeasurer<LineMeasurer<fn(&str) -> Dimensions>> {
    CachedMeasurer::new(LineMeasurer::new(proportional as fn(&str) -> Dimensions))
}

#[test]
fn paragraph_fills_lines_greedily() {
    let m = measurer();
    // "the" = 24, " " = 8, "quick" = 36, "brown" = 44, "fox" = 24
    let result = Wrapper::new().wrap("the quick brown fox", &m, 80.0, f64::INFINITY);
    assert_eq!(result.wrapped_text, "the quick\nbrown fox");
    assert_eq!(result.no_lines, 2);
    assert!(!result.is_truncated());
}

#[test]
fn box_height_bounds_the_line_count() {
    let m = measurer();
    let text = "the quick brown fox jumps over the lazy dog";
    let result = Wrapper::new().wrap(text, &m, 70.0, 40.0);
    assert_eq!(result.no_lines, 2);
    assert!(result.wrapped_text.ends_with("..."));
    assert!(result.truncated_text.ends_with("lazy dog"));
    for line in result.lines() {
        assert!(m.measure(line).width <= 70.0, "{line:?}");
    }
}

#[test]
fn options_builder_configures_wrapper() {
    let m = measurer();
    let wrapper = Wrapper::with_options(
        WrapOptions::new()
            .allow_breaking_words(true)
            .breaking_character('~')
            .text_trimming(TextTrimming::None),
    );
    // "internationalization" is far wider than 60.
    let result = wrapper.wrap("internationalization", &m, 60.0, f64::INFINITY);
    assert!(result.no_lines > 1);
    assert_eq!(result.no_broke_words, 1);
    let rebuilt: String = result
        .wrapped_text
        .split('\n')
        .map(|line| line.trim_end_matches('~'))
        .collect();
    assert_eq!(rebuilt, "internationalization");
}

#[test]
fn cache_sees_repeated_measurements() {
    let m = measurer();
    let wrapper = Wrapper::new();
    wrapper.wrap("repeat repeat repeat", &m, 50.0, f64::INFINITY);
    let first = m.stats();
    wrapper.wrap("repeat repeat repeat", &m, 50.0, f64::INFINITY);
    let second = m.stats();
    assert_eq!(first.misses, second.misses);
    assert!(second.hits > first.hits);
}

#[test]
fn reset_after_style_change_remeasures() {
    let m = measurer();
    m.measure("style");
    assert_eq!(m.stats().size, 1);
    m.reset();
    assert_eq!(m.stats().size, 0);
}

#[test]
fn per_character_measurement_agrees_for_additive_ruler() {
    let whole = LineMeasurer::new(proportional as fn(&str) -> Dimensions);
    let per_char = LineMeasurer::new(proportional as fn(&str) -> Dimensions)
        .measure_by(MeasureBy::PerCharacter)
        .with_character_cache(CachePolicy::bounded(64));
    for text in ["hello", "wild mix, of glyphs!", "  padded  "] {
        assert_eq!(whole.measure(text).width, per_char.measure(text).width, "{text:?}");
    }
}

#[test]
fn normalized_whitespace_wraps_like_single_spaces() {
    let m = measurer();
    let messy = combine_whitespace("the \t quick\t\tbrown    fox");
    assert_eq!(messy, "the quick brown fox");
    let a = Wrapper::new().wrap(&messy, &m, 80.0, f64::INFINITY);
    let b = Wrapper::new().wrap("the quick brown fox", &m, 80.0, f64::INFINITY);
    assert_eq!(a.wrapped_text, b.wrapped_text);
}

#[test]
fn tokenizer_classifies_punctuation_runs() {
    let tokens: Vec<&str> = tokenize("Wait... what?!").iter().map(|t| t.text).collect();
    assert_eq!(tokens, vec!["Wait", "...", " ", "what", "?", "!"]);
}

#[test]
fn single_line_wrapper_through_trait_object() {
    let m = measurer();
    let wrapper: Box<dyn TextWrap> = Box::new(SingleLineWrapper::new());
    let err = wrapper.wrap("one\ntwo", &m, 100.0, 100.0).unwrap_err();
    assert_eq!(err, WrapError::MultilineInput { lines: 2 });

    let ok = wrapper.wrap("the quick brown fox", &m, 100.0, 100.0).unwrap();
    let plain = Wrapper::new().wrap("the quick brown fox", &m, 100.0, 100.0);
    assert!(ok.is_equivalent(&plain));
}
