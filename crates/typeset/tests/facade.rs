//! The facade wires text and render crates together.

use typeset::prelude::*;

fn ruler() -> FixedAdvanceRuler {
    FixedAdvanceRuler::new(8.0, 16.0)
}

fn try_trimming(value: &str) -> typeset::Result<TextTrimming> {
    Ok(value.parse::<TextTrimming>()?)
}

#[test]
fn question_mark_converts_both_error_kinds() {
    assert_eq!(try_trimming("none"), Ok(TextTrimming::None));
    assert!(matches!(try_trimming("clip"), Err(Error::Wrap(_))));

    let mut ts = Typesetter::new(ruler(), RecordingPenFactory::new());
    let written: typeset::Result<()> = ts
        .write("x", 10.0, 10.0, &WriteOptions::new().text_shear(90.0))
        .map_err(Error::from);
    assert!(matches!(written, Err(Error::Write(_))));
}

#[test]
fn prelude_covers_a_full_round() {
    let measurer = CachedMeasurer::new(LineMeasurer::new(ruler()));
    let result = Wrapper::with_options(WrapOptions::new().max_lines(Some(1)))
        .wrap("first second third", &measurer, 100.0, f64::INFINITY);
    assert_eq!(result.no_lines, 1);
    assert!(result.wrapped_text.ends_with("..."));
    assert!(result.is_truncated());

    let pens = RecordingPenFactory::new();
    let mut ts = Typesetter::new(ruler(), pens.clone());
    ts.write(
        "first second third",
        100.0,
        100.0,
        &WriteOptions::new().x_align(XAlign::Right).y_align(YAlign::Bottom),
    )
    .unwrap();
    let pen = pens.last().unwrap();
    assert!(pen.lines.iter().all(|line| line.x_align == XAlign::Right));
}

#[test]
fn crate_aliases_reach_module_paths() {
    let tokens = text::tokenizer::tokenize("a,b");
    assert_eq!(tokens.len(), 3);
    assert_eq!(render::writer::SUPPORTED_ROTATIONS, [-90, 0, 90, 180]);
}
