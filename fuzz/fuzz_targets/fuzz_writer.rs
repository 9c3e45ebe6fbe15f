#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use typeset_render::{RecordingPenFactory, Typesetter, WriteOptions, XAlign, YAlign};
use typeset_text::FixedAdvanceRuler;

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    width: u16,
    height: u16,
    rotation: i32,
    shear: i8,
    x_align: u8,
    y_align: u8,
}

fuzz_target!(|input: Input| {
    if input.text.len() > 1024 {
        return;
    }

    let options = WriteOptions::new()
        .text_rotation(input.rotation)
        .text_shear(f64::from(input.shear))
        .x_align(match input.x_align % 3 {
            0 => XAlign::Left,
            1 => XAlign::Center,
            _ => XAlign::Right,
        })
        .y_align(match input.y_align % 3 {
            0 => YAlign::Top,
            1 => YAlign::Center,
            _ => YAlign::Bottom,
        });

    let pens = RecordingPenFactory::new();
    let mut typesetter = Typesetter::new(FixedAdvanceRuler::new(1.0, 1.0), pens.clone());
    let written = typesetter.write(
        &input.text,
        f64::from(input.width),
        f64::from(input.height),
        &options,
    );

    // Pens are only created for valid options, and always destroyed.
    match written {
        Ok(()) => assert!(pens.records().iter().all(|pen| pen.destroyed)),
        Err(_) => assert!(pens.records().is_empty()),
    }
});
