#![forbid(unsafe_code)]

//! Text measurement and wrapping for Typeset.
//!
//! - [`tokenizer`] splits lines into words, dividers and whitespace.
//! - [`measure`] turns strings into [`Dimensions`] through a pluggable
//!   [`Ruler`], with guard padding and per-character measurement.
//! - [`cache`] memoizes measurements by string.
//! - [`wrap`] fits text into a bounded box and reports what was truncated.

pub mod cache;
pub mod error;
pub mod measure;
pub mod tokenizer;
pub mod wrap;

pub use cache::{CachePolicy, CacheStats, MeasurementCache};
pub use error::{Result, WrapError};
pub use measure::{
    CachedMeasurer, Dimensions, FixedAdvanceRuler, LineMeasurer, MeasureBy, Measurer,
    REFERENCE_TEXT, Ruler, RulerFactory,
};
pub use tokenizer::{Token, TokenKind, combine_whitespace, tokenize};
pub use wrap::{
    ELLIPSIS, SingleLineWrapper, TextTrimming, TextWrap, WrapOptions, Wrapper, WrappingResult,
};
