#![forbid(unsafe_code)]

//! Greedy wrapping of text into a bounded box.
//!
//! [`Wrapper`] fills lines token by token (see [`tokenizer`](crate::tokenizer))
//! until the width is used up, then moves to the next line. When the box runs
//! out of lines, or a token cannot fit at all, the rest of the text is
//! truncated: an ellipsis is appended to the last line and everything that
//! did not make it is reported in [`WrappingResult::truncated_text`].
//!
//! - Whitespace at a wrap point is dropped, never carried to the next line.
//! - Words longer than a line are split with a breaking character when
//!   [`WrapOptions::allow_breaking_words`] is set. Splits happen on grapheme
//!   cluster boundaries.
//! - Blank logical lines do not count as lines.
//!
//! [`SingleLineWrapper`] narrows the width of a single line of text as far as
//! possible without changing how it wraps.
//!
//! # Example
//! ```
//! use typeset_text::measure::{FixedAdvanceRuler, LineMeasurer};
//! use typeset_text::wrap::Wrapper;
//!
//! let measurer = LineMeasurer::new(FixedAdvanceRuler::new(1.0, 1.0));
//! let result = Wrapper::new().wrap("Hello world foo bar", &measurer, 10.0, f64::INFINITY);
//! assert_eq!(result.wrapped_text, "Hello\nworld foo\nbar");
//! assert_eq!(result.no_lines, 3);
//! assert!(result.truncated_text.is_empty());
//! ```

use std::fmt;
use std::str::FromStr;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Result, WrapError};
use crate::measure::Measurer;
use crate::tokenizer::{Token, tokenize};

/// Marker appended to a line whose content was cut short.
pub const ELLIPSIS: &str = "...";

/// Default character inserted where a word is split.
pub const DEFAULT_BREAKING_CHARACTER: char = '-';

/// What to do with text that does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextTrimming {
    /// Mark the last visible line with [`ELLIPSIS`].
    #[default]
    Ellipsis,
    /// Cut without a marker.
    None,
}

impl TextTrimming {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ellipsis => "ellipsis",
            Self::None => "none",
        }
    }
}

impl fmt::Display for TextTrimming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextTrimming {
    type Err = WrapError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ellipsis" => Ok(Self::Ellipsis),
            "none" => Ok(Self::None),
            other => Err(WrapError::invalid_trimming(other)),
        }
    }
}

/// Wrapper configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapOptions {
    /// Maximum number of lines, `None` for no limit beyond the box height.
    pub max_lines: Option<usize>,
    /// Truncation marker policy.
    pub text_trimming: TextTrimming,
    /// Split words that are wider than a line.
    pub allow_breaking_words: bool,
    /// Character appended to the first half of a split word.
    pub breaking_character: char,
}

impl WrapOptions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_lines: None,
            text_trimming: TextTrimming::Ellipsis,
            allow_breaking_words: false,
            breaking_character: DEFAULT_BREAKING_CHARACTER,
        }
    }

    #[must_use]
    pub fn max_lines(mut self, max_lines: Option<usize>) -> Self {
        self.max_lines = max_lines;
        self
    }

    #[must_use]
    pub fn text_trimming(mut self, text_trimming: TextTrimming) -> Self {
        self.text_trimming = text_trimming;
        self
    }

    #[must_use]
    pub fn allow_breaking_words(mut self, allow: bool) -> Self {
        self.allow_breaking_words = allow;
        self
    }

    #[must_use]
    pub fn breaking_character(mut self, c: char) -> Self {
        self.breaking_character = c;
        self
    }
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a wrap.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WrappingResult {
    /// The input, untouched.
    pub original_text: String,
    /// Lines joined by `\n`, possibly carrying breaking characters and an
    /// ellipsis.
    pub wrapped_text: String,
    /// Number of non-empty lines in `wrapped_text`.
    pub no_lines: usize,
    /// Number of tokens split across lines.
    pub no_broke_words: usize,
    /// Content that did not fit, empty when everything fit.
    pub truncated_text: String,
}

impl WrappingResult {
    fn new(text: &str) -> Self {
        Self {
            original_text: text.to_owned(),
            ..Self::default()
        }
    }

    /// Result for text laid out without wrapping: every logical line is kept
    /// as is and blank lines do not count.
    #[must_use]
    pub fn unwrapped(text: &str) -> Self {
        Self {
            original_text: text.to_owned(),
            wrapped_text: text.to_owned(),
            no_lines: text.split('\n').filter(|line| !line.trim().is_empty()).count(),
            ..Self::default()
        }
    }

    /// Iterate the wrapped lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.wrapped_text.split('\n').filter(|line| !line.is_empty())
    }

    #[must_use]
    pub fn is_truncated(&self) -> bool {
        !self.truncated_text.is_empty()
    }

    /// Two results are equivalent when they use the same number of lines and
    /// leave the same text behind.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.no_lines == other.no_lines && self.truncated_text == other.truncated_text
    }
}

/// Wrapping strategy, object safe so writers can hold any wrapper.
pub trait TextWrap {
    fn options(&self) -> &WrapOptions;

    fn options_mut(&mut self) -> &mut WrapOptions;

    fn wrap(
        &self,
        text: &str,
        measurer: &dyn Measurer,
        width: f64,
        height: f64,
    ) -> Result<WrappingResult>;
}

/// Greedy line breaker with truncation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wrapper {
    options: WrapOptions,
}

impl Wrapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: WrapOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &WrapOptions {
        &self.options
    }

    #[inline]
    pub fn options_mut(&mut self) -> &mut WrapOptions {
        &mut self.options
    }

    #[inline]
    pub fn max_lines(&self) -> Option<usize> {
        self.options.max_lines
    }

    pub fn set_max_lines(&mut self, max_lines: Option<usize>) -> &mut Self {
        self.options.max_lines = max_lines;
        self
    }

    #[inline]
    pub fn text_trimming(&self) -> TextTrimming {
        self.options.text_trimming
    }

    pub fn set_text_trimming(&mut self, text_trimming: TextTrimming) -> &mut Self {
        self.options.text_trimming = text_trimming;
        self
    }

    /// Parse and set the trimming policy. On error the wrapper is unchanged.
    pub fn try_set_text_trimming(&mut self, value: &str) -> Result<&mut Self> {
        let trimming = value.parse()?;
        Ok(self.set_text_trimming(trimming))
    }

    #[inline]
    pub fn allow_breaking_words(&self) -> bool {
        self.options.allow_breaking_words
    }

    pub fn set_allow_breaking_words(&mut self, allow: bool) -> &mut Self {
        self.options.allow_breaking_words = allow;
        self
    }

    #[inline]
    pub fn breaking_character(&self) -> char {
        self.options.breaking_character
    }

    pub fn set_breaking_character(&mut self, c: char) -> &mut Self {
        self.options.breaking_character = c;
        self
    }

    /// Wrap `text` into a `width` × `height` box.
    ///
    /// `height` may be `f64::INFINITY` for an unbounded box.
    pub fn wrap<M>(&self, text: &str, measurer: &M, width: f64, height: f64) -> WrappingResult
    where
        M: Measurer + ?Sized,
    {
        let available_lines = self.available_lines(measurer, height);
        if available_lines == 0 {
            let mut result = WrappingResult::new(text);
            result.truncated_text = text.to_owned();
            tracing::debug!(width, height, "no line fits the box");
            return result;
        }

        let lines: Vec<&str> = text.split('\n').collect();
        let last_with_content = lines.iter().rposition(|line| !line.trim().is_empty());

        let mut pass = WrapPass {
            options: &self.options,
            measurer,
            width,
            available_lines,
            can_fit_text: true,
            current_line: String::new(),
            held_whitespace: None,
            result: WrappingResult::new(text),
        };
        for (index, line) in lines.iter().enumerate() {
            let more_content = last_with_content.is_some_and(|last| last > index);
            pass.break_line(line, index > 0, more_content);
        }

        let mut result = pass.result;
        if result.truncated_text.trim().is_empty() {
            result.truncated_text.clear();
        }
        tracing::debug!(
            width,
            height,
            no_lines = result.no_lines,
            no_broke_words = result.no_broke_words,
            truncated_len = result.truncated_text.len(),
            "wrapped text"
        );
        result
    }

    /// Wrap without a height limit.
    pub fn wrap_unbounded<M>(&self, text: &str, measurer: &M, width: f64) -> WrappingResult
    where
        M: Measurer + ?Sized,
    {
        self.wrap(text, measurer, width, f64::INFINITY)
    }

    fn available_lines<M: Measurer + ?Sized>(&self, measurer: &M, height: f64) -> usize {
        let line_height = measurer.line_height();
        let by_height = if line_height > 0.0 {
            (height / line_height).floor()
        } else {
            f64::INFINITY
        };
        // Saturating cast: infinity becomes usize::MAX, NaN and negatives 0.
        let by_height = by_height as usize;
        self.options
            .max_lines
            .map_or(by_height, |max| max.min(by_height))
    }
}

impl TextWrap for Wrapper {
    fn options(&self) -> &WrapOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut WrapOptions {
        &mut self.options
    }

    fn wrap(
        &self,
        text: &str,
        measurer: &dyn Measurer,
        width: f64,
        height: f64,
    ) -> Result<WrappingResult> {
        Ok(Wrapper::wrap(self, text, measurer, width, height))
    }
}

/// Result of trying to place (part of) a token on the current line.
enum Step<'t> {
    /// Appended whole.
    Placed,
    /// Whitespace that does not fit; dropped at the wrap point.
    DroppedWhitespace,
    /// The line is done; `rest` goes on the next line.
    Wrapped { rest: &'t str, broke_word: bool },
    /// Nothing fits, not even on an empty line.
    Stuck,
}

/// Mutable state of a single `wrap` call.
struct WrapPass<'w, M: ?Sized> {
    options: &'w WrapOptions,
    measurer: &'w M,
    width: f64,
    available_lines: usize,
    can_fit_text: bool,
    current_line: String,
    /// Whitespace dropped at a wrap point; the current line is committed only
    /// once a non-whitespace token follows it.
    held_whitespace: Option<String>,
    result: WrappingResult,
}

impl<M: Measurer + ?Sized> WrapPass<'_, M> {
    fn width_of(&self, text: &str) -> f64 {
        self.measurer.measure(text).width
    }

    fn fits(&self, text: &str) -> bool {
        self.width_of(text) <= self.width
    }

    fn lines_exhausted(&self) -> bool {
        self.result.no_lines >= self.available_lines
    }

    fn trimming_enabled(&self) -> bool {
        self.options.text_trimming != TextTrimming::None
    }

    fn break_line(&mut self, line: &str, is_continuation: bool, more_content: bool) {
        if is_continuation && self.result.is_truncated() {
            self.result.truncated_text.push('\n');
        }

        for token in tokenize(line) {
            self.place_token(token);
        }
        self.held_whitespace = None;

        let committed = self.current_line.trim_end().to_owned();
        self.current_line.clear();
        if committed.is_empty() {
            return;
        }

        self.result.no_lines += 1;
        if self.lines_exhausted() && more_content && self.can_fit_text && self.trimming_enabled() {
            let (kept, removed) = self.add_ellipsis(&committed);
            self.push_wrapped(&kept);
            self.result.truncated_text.push_str(&removed);
            self.can_fit_text = false;
        } else {
            self.push_wrapped(&committed);
        }
    }

    /// Whether `token` fits on an empty line, broken if breaking is allowed.
    fn can_fit_token(&self, token: &str) -> bool {
        if self.fits(token) {
            return true;
        }
        if !self.options.allow_breaking_words {
            return false;
        }
        let clusters: Vec<&str> = token.graphemes(true).collect();
        let last = clusters.len().saturating_sub(1);
        clusters.iter().enumerate().all(|(i, cluster)| {
            if i == last {
                self.fits(cluster)
            } else {
                self.fits(&format!("{cluster}{}", self.options.breaking_character))
            }
        })
    }

    fn place_token(&mut self, token: Token<'_>) {
        if let Some(held) = self.held_whitespace.as_mut() {
            if token.is_whitespace() {
                held.push_str(token.text);
                return;
            }
            let pending = format!("{held}{}", token.text);
            self.held_whitespace = None;
            if !self.wrap_line(&pending, false) {
                return;
            }
        }

        let unplaceable = !token.is_whitespace() && !self.can_fit_token(token.text);
        if !self.can_fit_text || self.lines_exhausted() || unplaceable {
            self.finish_wrapping(token.text);
            return;
        }

        let mut rest = token.text;
        let mut counted_break = false;
        loop {
            match self.fit_into_line(rest, token.is_whitespace()) {
                Step::Placed => return,
                Step::DroppedWhitespace => {
                    if !self.current_line.is_empty() {
                        self.held_whitespace = Some(token.text.to_owned());
                    }
                    return;
                }
                Step::Wrapped { rest: next, broke_word } => {
                    if broke_word && !counted_break {
                        counted_break = true;
                        self.result.no_broke_words += 1;
                    }
                    if !self.wrap_line(next, broke_word) || next.is_empty() {
                        return;
                    }
                    rest = next;
                }
                Step::Stuck => {
                    self.finish_wrapping(rest);
                    return;
                }
            }
        }
    }

    fn fit_into_line<'t>(&mut self, token: &'t str, is_whitespace: bool) -> Step<'t> {
        if self.fits(&format!("{}{token}", self.current_line)) {
            self.current_line.push_str(token);
            return Step::Placed;
        }
        if is_whitespace {
            return Step::DroppedWhitespace;
        }
        let line_started = !self.current_line.is_empty();
        if !self.options.allow_breaking_words {
            return if line_started {
                Step::Wrapped {
                    rest: token,
                    broke_word: false,
                }
            } else {
                Step::Stuck
            };
        }

        let breaking = self.options.breaking_character;
        let mut fit_len = 0;
        let mut probe = String::with_capacity(self.current_line.len() + token.len() + 4);
        for (offset, cluster) in token.grapheme_indices(true) {
            let end = offset + cluster.len();
            probe.clear();
            probe.push_str(&self.current_line);
            probe.push_str(&token[..end]);
            probe.push(breaking);
            if !self.fits(&probe) {
                break;
            }
            fit_len = end;
        }

        if fit_len == 0 {
            return if line_started {
                Step::Wrapped {
                    rest: token,
                    broke_word: false,
                }
            } else {
                Step::Stuck
            };
        }

        self.current_line.push_str(&token[..fit_len]);
        self.current_line.push(breaking);
        Step::Wrapped {
            rest: &token[fit_len..],
            broke_word: true,
        }
    }

    /// Commit the current line and start a new one.
    ///
    /// Returns `false` once the line budget is used up; the committed line
    /// then carries the ellipsis and `pending` is truncated.
    fn wrap_line(&mut self, pending: &str, ends_with_break: bool) -> bool {
        let mut line = std::mem::take(&mut self.current_line);
        let unbroken_len = if ends_with_break {
            line.len().saturating_sub(self.options.breaking_character.len_utf8())
        } else {
            line.len()
        };
        line.truncate(line.trim_end().len());
        if line.is_empty() {
            return true;
        }

        self.result.no_lines += 1;
        if !self.lines_exhausted() {
            self.push_wrapped(&line);
            return true;
        }

        if self.trimming_enabled() {
            line.truncate(unbroken_len);
        }
        let (kept, removed) = self.add_ellipsis(&line);
        self.push_wrapped(&kept);
        self.result.truncated_text.push_str(&removed);
        self.result.truncated_text.push_str(pending);
        false
    }

    /// Ellipsize whatever is on the current line plus `token` and stop.
    fn finish_wrapping(&mut self, token: &str) {
        if self.can_fit_text && !self.lines_exhausted() && self.trimming_enabled() {
            let mut line = std::mem::take(&mut self.current_line);
            line.push_str(token);
            let (kept, removed) = self.add_ellipsis(&line);
            if removed.len() < token.len() {
                self.result.no_broke_words += 1;
            }
            if !kept.is_empty() {
                self.result.no_lines += 1;
            }
            self.push_wrapped(&kept);
            self.result.truncated_text.push_str(&removed);
        } else {
            self.result.truncated_text.push_str(token);
        }
        self.can_fit_text = false;
    }

    /// Shorten `line` until it fits with [`ELLIPSIS`] appended.
    ///
    /// Returns the kept text (with the marker) and the removed suffix.
    fn add_ellipsis(&self, line: &str) -> (String, String) {
        if !self.trimming_enabled() {
            return (line.to_owned(), String::new());
        }

        let body = line.trim_end();
        let ellipsis_width = self.width_of(ELLIPSIS);
        if self.width < ellipsis_width {
            let period_width = ellipsis_width / 3.0;
            let periods = if period_width > 0.0 {
                ((self.width / period_width).floor() as usize).min(3)
            } else {
                3
            };
            return (".".repeat(periods), body.to_owned());
        }

        let mut end = body.len();
        while end > 0 && self.width_of(&body[..end]) + ellipsis_width > self.width {
            end = body[..end]
                .grapheme_indices(true)
                .next_back()
                .map_or(0, |(offset, _)| offset);
            end = body[..end].trim_end().len();
        }

        let kept = format!("{}{ELLIPSIS}", &body[..end]);
        let removed = body[end..].trim().to_owned();
        (kept, removed)
    }

    fn push_wrapped(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        if !self.result.wrapped_text.is_empty() {
            self.result.wrapped_text.push('\n');
        }
        self.result.wrapped_text.push_str(line);
    }
}

/// Wrapper for one line of text that picks the narrowest width keeping the
/// same wrap outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SingleLineWrapper {
    wrapper: Wrapper,
}

impl SingleLineWrapper {
    /// Number of bisection steps over the width.
    pub const NO_WRAP_ITERATIONS: usize = 5;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_wrapper(wrapper: Wrapper) -> Self {
        Self { wrapper }
    }

    #[inline]
    pub fn wrapper(&self) -> &Wrapper {
        &self.wrapper
    }

    #[inline]
    pub fn wrapper_mut(&mut self) -> &mut Wrapper {
        &mut self.wrapper
    }

    /// Wrap a single line of text.
    ///
    /// # Errors
    ///
    /// [`WrapError::MultilineInput`] if `text` contains a newline.
    pub fn wrap<M>(
        &self,
        text: &str,
        measurer: &M,
        width: f64,
        height: f64,
    ) -> Result<WrappingResult>
    where
        M: Measurer + ?Sized,
    {
        let lines = text.split('\n').count();
        if lines > 1 {
            return Err(WrapError::MultilineInput { lines });
        }

        let mut best = self.wrapper.wrap(text, measurer, width, height);
        if best.no_lines < 2 {
            return Ok(best);
        }

        let mut left = 0.0;
        let mut right = width;
        let mut narrowest = width;
        for _ in 0..Self::NO_WRAP_ITERATIONS {
            if right <= left {
                break;
            }
            let candidate_width = (left + right) / 2.0;
            let candidate = self.wrapper.wrap(text, measurer, candidate_width, height);
            if best.is_equivalent(&candidate) {
                right = candidate_width;
                narrowest = candidate_width;
                best = candidate;
            } else {
                left = candidate_width;
            }
        }

        tracing::debug!(width, narrowest, no_lines = best.no_lines, "narrowed single line");
        Ok(best)
    }
}

impl TextWrap for SingleLineWrapper {
    fn options(&self) -> &WrapOptions {
        self.wrapper.options()
    }

    fn options_mut(&mut self) -> &mut WrapOptions {
        self.wrapper.options_mut()
    }

    fn wrap(
        &self,
        text: &str,
        measurer: &dyn Measurer,
        width: f64,
        height: f64,
    ) -> Result<WrappingResult> {
        SingleLineWrapper::wrap(self, text, measurer, width, height)
    }
}
