#![forbid(unsafe_code)]

//! One-stop setup: cached measurement, a word-breaking wrapper and a writer
//! over one backend.

use typeset_text::{
    CachedMeasurer, Dimensions, LineMeasurer, Measurer, Ruler, RulerFactory, TextWrap, WrapOptions,
    Wrapper, WrappingResult,
};

use crate::error::Result;
use crate::pen::PenFactory;
use crate::writer::{WriteOptions, Writer};

/// Measurer, wrapper and writer wired together for one backend.
pub struct Typesetter<R, P> {
    writer: Writer<CachedMeasurer<LineMeasurer<R>>, P>,
}

impl<R: Ruler, P: PenFactory> Typesetter<R, P> {
    /// Typesetter measuring with `ruler` and drawing with `pens`. Words wider
    /// than the box are broken.
    #[must_use]
    pub fn new(ruler: R, pens: P) -> Self {
        let measurer = CachedMeasurer::new(LineMeasurer::new(ruler));
        let wrapper = Wrapper::with_options(WrapOptions::new().allow_breaking_words(true));
        Self {
            writer: Writer::new(measurer, pens).with_wrapper(wrapper),
        }
    }

    #[must_use]
    pub fn from_factory<F>(factory: &F, pens: P) -> Self
    where
        F: RulerFactory<Ruler = R>,
    {
        Self::new(factory.create_ruler(), pens)
    }

    pub fn measure(&self, text: &str) -> Dimensions {
        self.writer.measurer().measure(text)
    }

    pub fn wrap(&self, text: &str, width: f64, height: f64) -> Result<WrappingResult> {
        self.writer.wrap(text, width, height)
    }

    pub fn write(
        &mut self,
        text: &str,
        width: f64,
        height: f64,
        options: &WriteOptions,
    ) -> Result<()> {
        self.writer.write(text, width, height, options)
    }

    /// Forget every cached measurement, e.g. after a font change.
    pub fn clear_measurer_cache(&self) {
        self.writer.measurer().reset();
    }

    pub fn wrapper_mut(&mut self) -> Option<&mut (dyn TextWrap + 'static)> {
        self.writer.wrapper_mut()
    }

    pub fn set_wrapper(&mut self, wrapper: impl TextWrap + 'static) -> &mut Self {
        self.writer.set_wrapper(Some(Box::new(wrapper)));
        self
    }

    #[inline]
    pub fn writer(&self) -> &Writer<CachedMeasurer<LineMeasurer<R>>, P> {
        &self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pen::RecordingPenFactory;
    use typeset_text::{FixedAdvanceRuler, SingleLineWrapper};

    fn typesetter() -> (Typesetter<FixedAdvanceRuler, RecordingPenFactory>, RecordingPenFactory) {
        let pens = RecordingPenFactory::new();
        (Typesetter::new(FixedAdvanceRuler::new(10.0, 20.0), pens.clone()), pens)
    }

    #[test]
    fn breaks_words_by_default() {
        let (ts, _) = typesetter();
        let result = ts.wrap("hello", 37.5, f64::INFINITY).unwrap();
        assert_eq!(result.wrapped_text, "he-\nllo");
    }

    #[test]
    fn measurements_are_cached_until_cleared() {
        let (ts, _) = typesetter();
        ts.measure("abc");
        ts.measure("abc");
        let stats = ts.writer().measurer().stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));

        ts.clear_measurer_cache();
        assert_eq!(ts.writer().measurer().stats().size, 0);
    }

    #[test]
    fn wrapper_can_be_reconfigured() {
        let (mut ts, _) = typesetter();
        if let Some(wrapper) = ts.wrapper_mut() {
            wrapper.options_mut().max_lines = Some(1);
        }
        let result = ts.wrap("aa bb cc", 50.0, f64::INFINITY).unwrap();
        assert_eq!(result.no_lines, 1);
        assert!(result.is_truncated());
    }

    #[test]
    fn wrapper_can_be_replaced() {
        let (mut ts, _) = typesetter();
        ts.set_wrapper(SingleLineWrapper::new());
        assert!(ts.wrap("a\nb", 100.0, 100.0).is_err());
    }

    #[test]
    fn writes_through_backend() {
        let (mut ts, pens) = typesetter();
        ts.write("hello world", 60.0, 100.0, &WriteOptions::new())
            .unwrap();
        let record = pens.last().unwrap();
        assert_eq!(record.lines.len(), 2);
        assert!(record.destroyed);
    }

    #[test]
    fn builds_from_ruler_factory() {
        let factory = || FixedAdvanceRuler::new(5.0, 10.0);
        let ts = Typesetter::from_factory(&factory, RecordingPenFactory::new());
        assert_eq!(ts.measure("ab"), Dimensions::new(10.0, 10.0));
    }
}
