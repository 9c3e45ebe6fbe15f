#![forbid(unsafe_code)]

//! Typeset public facade crate.
//!
//! Re-exports the measuring, wrapping and writing types from the internal
//! crates and offers a prelude for day-to-day use.
//!
//! # Example
//! ```
//! use typeset::prelude::*;
//!
//! let pens = RecordingPenFactory::new();
//! let mut typesetter = Typesetter::new(FixedAdvanceRuler::new(8.0, 16.0), pens.clone());
//! typesetter.write("Hello, typeset!", 64.0, 64.0, &WriteOptions::new())?;
//! assert_eq!(pens.last().map(|pen| pen.lines.len()), Some(2));
//! # Ok::<(), typeset::Error>(())
//! ```

use std::fmt;

// --- Text re-exports -------------------------------------------------------

pub use typeset_text::{
    CachePolicy, CacheStats, CachedMeasurer, Dimensions, ELLIPSIS, FixedAdvanceRuler,
    LineMeasurer, MeasureBy, MeasurementCache, Measurer, REFERENCE_TEXT, Ruler, RulerFactory,
    SingleLineWrapper, TextTrimming, TextWrap, Token, TokenKind, WrapError, WrapOptions, Wrapper,
    WrappingResult, combine_whitespace, tokenize,
};

// --- Render re-exports -----------------------------------------------------

pub use typeset_render::{
    Layout, Pen, PenFactory, PenRecord, PositionedLine, RecordingPen, RecordingPenFactory,
    Transform, Typesetter, WriteError, WriteOptions, Writer, WrittenLine, XAlign, YAlign,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for typeset users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Wrapper configuration or precondition failure.
    Wrap(WrapError),
    /// Writer option or wrapping failure.
    Write(WriteError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wrap(err) => write!(f, "{err}"),
            Self::Write(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wrap(err) => Some(err),
            Self::Write(err) => Some(err),
        }
    }
}

impl From<WrapError> for Error {
    fn from(err: WrapError) -> Self {
        Self::Wrap(err)
    }
}

impl From<WriteError> for Error {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Wrap(inner) => Self::Wrap(inner),
            other => Self::Write(other),
        }
    }
}

/// Standard result type for typeset APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CachedMeasurer, Dimensions, Error, FixedAdvanceRuler, LineMeasurer, Measurer,
        RecordingPenFactory, Result, SingleLineWrapper, TextTrimming, TextWrap, Typesetter,
        WrapOptions, WriteOptions, Wrapper, WrappingResult, XAlign, YAlign,
    };

    pub use crate::{render, text};
}

pub use typeset_render as render;
pub use typeset_text as text;
