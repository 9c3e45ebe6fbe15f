#![forbid(unsafe_code)]

//! Text measurement on top of a pluggable backend ruler.
//!
//! A [`Ruler`] is whatever the rendering backend offers for measuring a
//! string (an SVG `getBBox`, a canvas `measureText`, a font rasterizer).
//! Rulers are expensive and often inaccurate at the edges: many collapse
//! leading and trailing whitespace. [`LineMeasurer`] turns a ruler into a
//! [`Measurer`] the wrapper can trust:
//!
//! ```text
//!        text
//!          │ split on '\n'  (width = max, height = sum)
//!          ▼
//!   ┌──────────────┐  MeasureBy::WholeLine     guard + line + guard
//!   │ LineMeasurer │─────────────────────────▶ ruler, minus 2 × guard
//!   └──────┬───────┘
//!          │ MeasureBy::PerCharacter
//!          ▼
//!   one measurement per grapheme cluster (optionally cached),
//!   widths summed, heights maxed
//! ```
//!
//! [`CachedMeasurer`] is the decorator that memoizes whole strings on top of
//! any measurer.
//!
//! # Example
//! ```
//! use typeset_text::measure::{CachedMeasurer, FixedAdvanceRuler, LineMeasurer, Measurer};
//!
//! let measurer = CachedMeasurer::new(LineMeasurer::new(FixedAdvanceRuler::new(8.0, 16.0)));
//! let dims = measurer.measure("a b");
//! assert_eq!(dims.width, 24.0);
//! assert_eq!(measurer.line_height(), 16.0);
//! ```

use std::cell::{Cell, RefCell};

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use crate::cache::{CachePolicy, CacheStats, MeasurementCache};

/// Canonical string measured to find the height of one line. It mixes
/// ascenders and descenders and doubles as the whitespace guard.
pub const REFERENCE_TEXT: &str = "bdpql";

/// Width and height of a measured string.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Backend measurement primitive.
pub trait Ruler {
    /// Measure `text` as the backend renders it.
    fn measure_text(&self, text: &str) -> Dimensions;
}

impl<F> Ruler for F
where
    F: Fn(&str) -> Dimensions,
{
    fn measure_text(&self, text: &str) -> Dimensions {
        self(text)
    }
}

/// Zero-argument factory for a backend [`Ruler`].
///
/// Backends implement this to hand out a ruler bound to their current
/// element, font and style.
pub trait RulerFactory {
    type Ruler: Ruler;

    fn create_ruler(&self) -> Self::Ruler;
}

impl<F, R> RulerFactory for F
where
    F: Fn() -> R,
    R: Ruler,
{
    type Ruler = R;

    fn create_ruler(&self) -> R {
        self()
    }
}

/// Measurement interface consumed by the wrappers.
///
/// Implementations must be deterministic for identical input while the
/// backend font and style stay fixed; callers cache on that assumption.
pub trait Measurer {
    /// Measure `text`, which may span several lines.
    fn measure(&self, text: &str) -> Dimensions;

    /// Measure [`REFERENCE_TEXT`].
    fn measure_reference(&self) -> Dimensions {
        self.measure(REFERENCE_TEXT)
    }

    /// Height of a single line of text.
    fn line_height(&self) -> f64 {
        self.measure_reference().height
    }

    /// Drop cached state after a font or style change.
    fn reset(&self) {}
}

impl<M: Measurer + ?Sized> Measurer for &M {
    fn measure(&self, text: &str) -> Dimensions {
        (**self).measure(text)
    }

    fn measure_reference(&self) -> Dimensions {
        (**self).measure_reference()
    }

    fn line_height(&self) -> f64 {
        (**self).line_height()
    }

    fn reset(&self) {
        (**self).reset();
    }
}

/// Unit a [`LineMeasurer`] asks the ruler to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasureBy {
    /// One ruler call per line.
    #[default]
    WholeLine,
    /// One ruler call per grapheme cluster; widths are summed.
    ///
    /// Use when whole-string measurement is unreliable (fallback fonts) or
    /// to bound a cache by the number of distinct clusters.
    PerCharacter,
}

/// Turns a backend [`Ruler`] into a [`Measurer`].
pub struct LineMeasurer<R> {
    ruler: R,
    measure_by: MeasureBy,
    use_guards: bool,
    guard_width: Cell<Option<f64>>,
    char_cache: Option<RefCell<MeasurementCache>>,
}

impl<R: Ruler> LineMeasurer<R> {
    /// Whole-line measurement with whitespace guards.
    #[must_use]
    pub fn new(ruler: R) -> Self {
        Self {
            ruler,
            measure_by: MeasureBy::WholeLine,
            use_guards: true,
            guard_width: Cell::new(None),
            char_cache: None,
        }
    }

    /// Build a measurer from a backend ruler factory.
    #[must_use]
    pub fn from_factory<F>(factory: &F) -> Self
    where
        F: RulerFactory<Ruler = R>,
    {
        Self::new(factory.create_ruler())
    }

    /// Set the measurement unit.
    #[must_use]
    pub fn measure_by(mut self, measure_by: MeasureBy) -> Self {
        self.measure_by = measure_by;
        self
    }

    /// Enable or disable whitespace guards.
    ///
    /// Even with guards disabled, a lone space or tab is guarded: most
    /// backends report it as zero width.
    #[must_use]
    pub fn with_guards(mut self, use_guards: bool) -> Self {
        self.use_guards = use_guards;
        self
    }

    /// Measure per character and memoize each cluster.
    #[must_use]
    pub fn with_character_cache(mut self, policy: CachePolicy) -> Self {
        self.measure_by = MeasureBy::PerCharacter;
        self.char_cache = Some(RefCell::new(MeasurementCache::with_policy(policy)));
        self
    }

    #[inline]
    pub fn ruler(&self) -> &R {
        &self.ruler
    }

    #[inline]
    pub fn unit(&self) -> MeasureBy {
        self.measure_by
    }

    /// Statistics of the per-character cache, if one is configured.
    pub fn character_cache_stats(&self) -> Option<CacheStats> {
        self.char_cache.as_ref().map(|cache| cache.borrow().stats())
    }

    fn guard_width(&self) -> f64 {
        if let Some(width) = self.guard_width.get() {
            return width;
        }
        let width = self.ruler.measure_text(REFERENCE_TEXT).width;
        tracing::trace!(width, "measured whitespace guard");
        self.guard_width.set(Some(width));
        width
    }

    fn measure_guarded(&self, line: &str) -> Dimensions {
        let guarded = self.use_guards || line == " " || line == "\t";
        if !guarded {
            return self.ruler.measure_text(line);
        }
        let padded = format!("{REFERENCE_TEXT}{line}{REFERENCE_TEXT}");
        let dims = self.ruler.measure_text(&padded);
        Dimensions::new((dims.width - 2.0 * self.guard_width()).max(0.0), dims.height)
    }

    fn measure_cluster(&self, cluster: &str) -> Dimensions {
        match &self.char_cache {
            Some(cache) => cache
                .borrow_mut()
                .get_or_compute(cluster, |c| self.measure_guarded(c)),
            None => self.measure_guarded(cluster),
        }
    }

    fn measure_line(&self, line: &str) -> Dimensions {
        if line.is_empty() {
            return Dimensions::ZERO;
        }
        match self.measure_by {
            MeasureBy::WholeLine => self.measure_guarded(line),
            MeasureBy::PerCharacter => line
                .graphemes(true)
                .map(|cluster| self.measure_cluster(cluster))
                .fold(Dimensions::ZERO, |acc, dims| {
                    Dimensions::new(acc.width + dims.width, acc.height.max(dims.height))
                }),
        }
    }
}

impl<R: Ruler> Measurer for LineMeasurer<R> {
    fn measure(&self, text: &str) -> Dimensions {
        if text.is_empty() {
            return Dimensions::ZERO;
        }
        if !text.contains('\n') {
            return self.measure_line(text);
        }
        text.split('\n')
            .map(|line| self.measure_line(line))
            .fold(Dimensions::ZERO, |acc, dims| {
                Dimensions::new(acc.width.max(dims.width), acc.height + dims.height)
            })
    }

    fn reset(&self) {
        self.guard_width.set(None);
        if let Some(cache) = &self.char_cache {
            cache.borrow_mut().clear();
        }
    }
}

/// Decorator memoizing whole-string measurements of another measurer.
pub struct CachedMeasurer<M> {
    inner: M,
    cache: RefCell<MeasurementCache>,
}

impl<M: Measurer> CachedMeasurer<M> {
    /// Wrap `inner` with an unbounded cache.
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self::with_policy(inner, CachePolicy::Unbounded)
    }

    #[must_use]
    pub fn with_policy(inner: M, policy: CachePolicy) -> Self {
        Self {
            inner,
            cache: RefCell::new(MeasurementCache::with_policy(policy)),
        }
    }

    #[inline]
    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.borrow().stats()
    }
}

impl<M: Measurer> Measurer for CachedMeasurer<M> {
    fn measure(&self, text: &str) -> Dimensions {
        self.cache
            .borrow_mut()
            .get_or_compute(text, |t| self.inner.measure(t))
    }

    fn reset(&self) {
        self.cache.borrow_mut().clear();
        self.inner.reset();
    }
}

/// Ruler for fixed-advance fonts: every terminal cell has the same width.
///
/// Wide characters (CJK, most emoji) take two cells. Every measured string
/// reports the same line height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceRuler {
    advance: f64,
    line_height: f64,
}

impl FixedAdvanceRuler {
    #[must_use]
    pub const fn new(advance: f64, line_height: f64) -> Self {
        Self {
            advance,
            line_height,
        }
    }

    fn cells(text: &str) -> usize {
        text.chars()
            .map(|c| if c == '\t' { 1 } else { c.width().unwrap_or(0) })
            .sum()
    }
}

impl Ruler for FixedAdvanceRuler {
    fn measure_text(&self, text: &str) -> Dimensions {
        Dimensions::new(Self::cells(text) as f64 * self.advance, self.line_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono() -> LineMeasurer<FixedAdvanceRuler> {
        LineMeasurer::new(FixedAdvanceRuler::new(10.0, 20.0))
    }

    /// A backend that drops leading and trailing whitespace, like SVG text.
    fn trimming_ruler(text: &str) -> Dimensions {
        Dimensions::new(text.trim().chars().count() as f64 * 10.0, 20.0)
    }

    #[test]
    fn empty_text_is_zero() {
        assert_eq!(mono().measure(""), Dimensions::ZERO);
    }

    #[test]
    fn reference_height_is_line_height() {
        let m = mono();
        assert_eq!(m.measure_reference(), Dimensions::new(50.0, 20.0));
        assert_eq!(m.line_height(), 20.0);
    }

    #[test]
    fn single_line_width() {
        assert_eq!(mono().measure("hello"), Dimensions::new(50.0, 20.0));
    }

    #[test]
    fn multi_line_takes_max_width_and_sums_heights() {
        let dims = mono().measure("ab\nabcd\nc");
        assert_eq!(dims, Dimensions::new(40.0, 60.0));
    }

    #[test]
    fn guards_recover_trimmed_whitespace() {
        let m = LineMeasurer::new(trimming_ruler);
        assert_eq!(m.measure(" ").width, 10.0);
        assert_eq!(m.measure("  a  ").width, 50.0);
    }

    #[test]
    fn unguarded_measurement_loses_whitespace_except_lone_space() {
        let m = LineMeasurer::new(trimming_ruler).with_guards(false);
        assert_eq!(m.measure("  a  ").width, 10.0);
        assert_eq!(m.measure(" ").width, 10.0);
        assert_eq!(m.measure("\t").width, 10.0);
    }

    #[test]
    fn per_character_sums_widths_and_maxes_heights() {
        let ruler = |text: &str| {
            let tall = text.contains('X');
            Dimensions::new(text.chars().count() as f64 * 10.0, if tall { 30.0 } else { 20.0 })
        };
        let m = LineMeasurer::new(ruler).measure_by(MeasureBy::PerCharacter);
        let dims = m.measure("aXb");
        assert_eq!(dims.width, 30.0);
        assert_eq!(dims.height, 30.0);
    }

    #[test]
    fn per_character_cache_is_bounded_by_distinct_clusters() {
        let m = mono().with_character_cache(CachePolicy::Unbounded);
        m.measure("abcabc");
        m.measure("cab");
        let stats = m.character_cache_stats().unwrap();
        assert_eq!(stats.size, 3);
        assert_eq!(stats.misses, 3);
        assert_eq!(m.unit(), MeasureBy::PerCharacter);
    }

    #[test]
    fn wide_characters_take_two_cells() {
        assert_eq!(mono().measure("日本").width, 40.0);
    }

    #[test]
    fn cached_measurer_calls_backend_once_per_string() {
        let calls = Cell::new(0);
        let ruler = |text: &str| {
            calls.set(calls.get() + 1);
            Dimensions::new(text.len() as f64, 1.0)
        };
        let m = CachedMeasurer::new(LineMeasurer::new(ruler).with_guards(false));
        m.measure("abc");
        m.measure("abc");
        m.measure("abc");
        assert_eq!(calls.get(), 1);
        m.measure("abd");
        assert_eq!(calls.get(), 2);
        assert_eq!(m.stats().hits, 2);
    }

    #[test]
    fn reset_clears_every_layer() {
        let calls = Cell::new(0);
        let ruler = |text: &str| {
            calls.set(calls.get() + 1);
            Dimensions::new(text.len() as f64, 1.0)
        };
        let m = CachedMeasurer::new(
            LineMeasurer::new(ruler).with_character_cache(CachePolicy::Unbounded),
        );
        m.measure("ab");
        let before = calls.get();
        m.reset();
        assert!(m.stats().size == 0);
        assert_eq!(m.inner().character_cache_stats().unwrap().size, 0);
        m.measure("ab");
        assert_eq!(calls.get(), before * 2);
    }

    #[test]
    fn from_factory_uses_created_ruler() {
        let factory = || FixedAdvanceRuler::new(5.0, 9.0);
        let m = LineMeasurer::from_factory(&factory);
        assert_eq!(m.measure("abcd"), Dimensions::new(20.0, 9.0));
    }

    #[test]
    fn measuring_through_a_reference() {
        let m = mono();
        let by_ref: &dyn Measurer = &m;
        assert_eq!(by_ref.measure("ab").width, 20.0);
    }
}
