#![forbid(unsafe_code)]

//! Writing wrapped text to rendering backends.
//!
//! - [`pen`]: the backend seam ([`PenFactory`], [`Pen`]) and an in-memory
//!   recording backend.
//! - [`writer`]: rotation, shear and alignment of wrapped lines.
//! - [`typesetter`]: cached measurement, wrapping and writing in one value.

pub mod error;
pub mod pen;
pub mod typesetter;
pub mod writer;

pub use error::{Result, WriteError};
pub use pen::{
    Pen, PenFactory, PenRecord, RecordingPen, RecordingPenFactory, Transform, WrittenLine, XAlign,
    YAlign,
};
pub use typesetter::Typesetter;
pub use writer::{Layout, PositionedLine, WriteOptions, Writer};
