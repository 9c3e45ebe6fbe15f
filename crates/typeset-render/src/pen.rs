#![forbid(unsafe_code)]

//! Backend drawing surface.
//!
//! A [`PenFactory`] is the rendering backend (SVG, canvas, HTML, a terminal
//! buffer). For every block of text the writer asks it for a [`Pen`] placed
//! by a [`Transform`], writes the lines one by one and then destroys the pen.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Horizontal alignment of each line inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl XAlign {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for XAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vertical alignment of the block of lines inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

impl YAlign {
    /// Fraction of the free vertical space placed above the text.
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => 0.5,
            Self::Bottom => 1.0,
        }
    }
}

/// Placement of a pen: translate, then rotate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub translate: (f64, f64),
    /// Degrees, clockwise.
    pub rotate: f64,
}

impl Transform {
    #[must_use]
    pub const fn new(translate: (f64, f64), rotate: f64) -> Self {
        Self { translate, rotate }
    }
}

/// Draws lines of one text block.
pub trait Pen {
    /// Draw `line` in a row `width` wide, `x_offset` and `y_offset` from the
    /// pen origin. `y_offset` is the baseline of the row.
    fn write(&mut self, line: &str, width: f64, x_align: XAlign, x_offset: f64, y_offset: f64);

    /// Release backend resources. Called once, after the last line.
    fn destroy(&mut self) {}
}

/// Creates pens for a rendering backend.
pub trait PenFactory {
    type Pen: Pen;

    fn create_pen(&mut self, text: &str, transform: &Transform, element_id: &str) -> Self::Pen;
}

/// One line written to a [`RecordingPen`].
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenLine {
    pub text: String,
    pub width: f64,
    pub x_align: XAlign,
    pub x_offset: f64,
    pub y_offset: f64,
}

/// Everything a [`RecordingPen`] was asked to do.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PenRecord {
    pub element_id: String,
    pub text: String,
    pub transform: Transform,
    pub lines: Vec<WrittenLine>,
    pub destroyed: bool,
}

/// In-memory backend that records every pen it hands out.
///
/// Clones share the same log, so a test can keep one handle while the writer
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingPenFactory {
    log: Rc<RefCell<Vec<PenRecord>>>,
}

impl RecordingPenFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all pens created so far.
    pub fn records(&self) -> Vec<PenRecord> {
        self.log.borrow().clone()
    }

    /// The most recently created pen.
    pub fn last(&self) -> Option<PenRecord> {
        self.log.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl PenFactory for RecordingPenFactory {
    type Pen = RecordingPen;

    fn create_pen(&mut self, text: &str, transform: &Transform, element_id: &str) -> RecordingPen {
        let mut log = self.log.borrow_mut();
        log.push(PenRecord {
            element_id: element_id.to_owned(),
            text: text.to_owned(),
            transform: *transform,
            ..PenRecord::default()
        });
        RecordingPen {
            log: Rc::clone(&self.log),
            index: log.len() - 1,
        }
    }
}

/// Pen handed out by [`RecordingPenFactory`].
#[derive(Debug)]
pub struct RecordingPen {
    log: Rc<RefCell<Vec<PenRecord>>>,
    index: usize,
}

impl RecordingPen {
    fn with_record(&self, f: impl FnOnce(&mut PenRecord)) {
        if let Some(record) = self.log.borrow_mut().get_mut(self.index) {
            f(record);
        }
    }
}

impl Pen for RecordingPen {
    fn write(&mut self, line: &str, width: f64, x_align: XAlign, x_offset: f64, y_offset: f64) {
        self.with_record(|record| {
            record.lines.push(WrittenLine {
                text: line.to_owned(),
                width,
                x_align,
                x_offset,
                y_offset,
            });
        });
    }

    fn destroy(&mut self) {
        self.with_record(|record| record.destroyed = true);
    }
}
