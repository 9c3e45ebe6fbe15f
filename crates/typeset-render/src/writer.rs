#![forbid(unsafe_code)]

//! Writing wrapped text into a rotated, sheared box.
//!
//! ```text
//!  text ─▶ combine_whitespace ─▶ wrap (primary × secondary) ─▶ lines
//!                                                                │
//!   Transform { translate, rotate: rotation + shear } ◀──────────┤
//!                                                                ▼
//!                     pen.write(line, primary, x_align, x_offset, y_offset)
//! ```
//!
//! The primary dimension is the one text runs along: the box width for
//! horizontal text, the height for text rotated by ±90°. Shear slants every
//! line by `line_height * tan(shear)`, so the usable primary length shrinks
//! by that shift and the secondary length by `cos(shear)`.

use typeset_text::{Measurer, TextWrap, WrappingResult, combine_whitespace};

use crate::error::{Result, WriteError};
use crate::pen::{Pen, PenFactory, Transform, XAlign, YAlign};

/// Rotations a writer can lay text out in, in degrees.
pub const SUPPORTED_ROTATIONS: [i32; 4] = [-90, 0, 90, 180];

/// Largest shear magnitude, in degrees.
pub const MAX_SHEAR: f64 = 80.0;

/// Prefix of the element ids handed to pens.
pub const ELEMENT_ID_PREFIX: &str = "typeset";

/// Placement of text inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WriteOptions {
    pub x_align: XAlign,
    pub y_align: YAlign,
    /// Degrees; one of [`SUPPORTED_ROTATIONS`].
    pub text_rotation: i32,
    /// Degrees in `[-MAX_SHEAR, MAX_SHEAR]`.
    pub text_shear: f64,
}

impl WriteOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn x_align(mut self, x_align: XAlign) -> Self {
        self.x_align = x_align;
        self
    }

    #[must_use]
    pub fn y_align(mut self, y_align: YAlign) -> Self {
        self.y_align = y_align;
        self
    }

    #[must_use]
    pub fn text_rotation(mut self, degrees: i32) -> Self {
        self.text_rotation = degrees;
        self
    }

    #[must_use]
    pub fn text_shear(mut self, degrees: f64) -> Self {
        self.text_shear = degrees;
        self
    }

    /// Check rotation and shear.
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_ROTATIONS.contains(&self.text_rotation) {
            return Err(WriteError::UnsupportedRotation {
                degrees: self.text_rotation,
            });
        }
        if !(-MAX_SHEAR..=MAX_SHEAR).contains(&self.text_shear) {
            return Err(WriteError::unsupported_shear(self.text_shear));
        }
        Ok(())
    }

    /// Text runs along the box width unless rotated by ±90°.
    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        (self.text_rotation.abs() - 90).abs() > 45
    }
}

/// Geometry of one write, before any pen is involved.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub transform: Transform,
    /// Length available along each line.
    pub primary: f64,
    /// Length available across lines.
    pub secondary: f64,
    pub shear_shift: f64,
    pub line_height: f64,
    pub lines: Vec<PositionedLine>,
}

/// A line with its offset from the pen origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedLine {
    pub text: String,
    pub x_offset: f64,
    pub y_offset: f64,
}

/// Lays out text with a measurer and an optional wrapper and hands the lines
/// to pens from a backend.
pub struct Writer<M, P> {
    measurer: M,
    wrapper: Option<Box<dyn TextWrap>>,
    pens: P,
    next_id: u64,
}

impl<M: Measurer, P: PenFactory> Writer<M, P> {
    /// Writer without wrapping: only explicit newlines break lines.
    #[must_use]
    pub fn new(measurer: M, pens: P) -> Self {
        Self {
            measurer,
            wrapper: None,
            pens,
            next_id: 0,
        }
    }

    #[must_use]
    pub fn with_wrapper(mut self, wrapper: impl TextWrap + 'static) -> Self {
        self.wrapper = Some(Box::new(wrapper));
        self
    }

    pub fn set_wrapper(&mut self, wrapper: Option<Box<dyn TextWrap>>) -> &mut Self {
        self.wrapper = wrapper;
        self
    }

    pub fn wrapper(&self) -> Option<&dyn TextWrap> {
        self.wrapper.as_deref()
    }

    pub fn wrapper_mut(&mut self) -> Option<&mut (dyn TextWrap + 'static)> {
        self.wrapper.as_deref_mut()
    }

    #[inline]
    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    #[inline]
    pub fn pen_factory(&self) -> &P {
        &self.pens
    }

    /// Wrap `text` with the configured wrapper, or keep its lines as they
    /// are when there is none.
    pub fn wrap(&self, text: &str, width: f64, height: f64) -> Result<WrappingResult> {
        match &self.wrapper {
            Some(wrapper) => Ok(wrapper.wrap(text, &self.measurer, width, height)?),
            None => Ok(WrappingResult::unwrapped(text)),
        }
    }

    /// Compute where every line of `text` goes in a `width` × `height` box.
    pub fn layout(
        &self,
        text: &str,
        width: f64,
        height: f64,
        options: &WriteOptions,
    ) -> Result<Layout> {
        options.validate()?;

        let horizontal = options.is_horizontal();
        let (primary, secondary) = if horizontal {
            (width, height)
        } else {
            (height, width)
        };

        let shear = options.text_shear.to_radians();
        let line_height = self.measurer.line_height();
        let shear_shift = line_height * shear.tan();
        let primary = primary / shear.cos() - shear_shift.abs();
        let secondary = secondary * shear.cos();

        tracing::debug!(
            rotation = options.text_rotation,
            shear = options.text_shear,
            horizontal,
            primary,
            secondary,
            "laying out text"
        );

        let wrapped = self.wrap(&combine_whitespace(text), primary, secondary)?;
        let rows: Vec<&str> = wrapped.wrapped_text.split('\n').collect();

        let free = secondary - rows.len() as f64 * line_height;
        let y_off = options.y_align.factor() * free;
        let (sx, sy) = (y_off * shear.sin(), y_off * shear.cos());
        let translate = match options.text_rotation {
            90 => (width + sy, sx),
            -90 => (-sy, height - sx),
            180 => (width - sx, height - sy),
            _ => (sx, sy),
        };
        let transform = Transform::new(
            translate,
            f64::from(options.text_rotation) + options.text_shear,
        );

        let lines = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let steps = if shear_shift > 0.0 { i + 1 } else { i };
                PositionedLine {
                    text: (*row).to_owned(),
                    x_offset: steps as f64 * shear_shift,
                    y_offset: (i + 1) as f64 * line_height,
                }
            })
            .collect();

        Ok(Layout {
            transform,
            primary,
            secondary,
            shear_shift,
            line_height,
            lines,
        })
    }

    /// Write `text` into a `width` × `height` box with a fresh pen.
    ///
    /// # Errors
    ///
    /// Unsupported rotation or shear, checked before anything is measured,
    /// and errors of the configured wrapper.
    pub fn write(
        &mut self,
        text: &str,
        width: f64,
        height: f64,
        options: &WriteOptions,
    ) -> Result<()> {
        let layout = self.layout(text, width, height, options)?;
        let element_id = self.next_element_id();

        let mut pen = self.pens.create_pen(text, &layout.transform, &element_id);
        for line in &layout.lines {
            pen.write(
                &line.text,
                layout.primary,
                options.x_align,
                line.x_offset,
                line.y_offset,
            );
        }
        pen.destroy();

        tracing::debug!(element_id = %element_id, lines = layout.lines.len(), "wrote text");
        Ok(())
    }

    fn next_element_id(&mut self) -> String {
        let id = format!("{ELEMENT_ID_PREFIX}-{}", self.next_id);
        self.next_id += 1;
        id
    }
}
