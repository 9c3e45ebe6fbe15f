#![forbid(unsafe_code)]

//! Splitting a line of text into the atomic units the wrapper works with.
//!
//! A [`Token`] is a run of grapheme clusters of one class:
//! - a run of word characters (`hello`, `x_1`),
//! - a run of one repeated divider character (`,`, `!!!`, `--`),
//! - a run of whitespace.
//!
//! Adjacent, different dividers are separate tokens. Concatenating the
//! tokens of a line always gives back the line.
//!
//! # Example
//! ```
//! use typeset_text::tokenizer::tokenize;
//!
//! let tokens: Vec<&str> = tokenize("hello, world").iter().map(|t| t.text).collect();
//! assert_eq!(tokens, vec!["hello", ",", " ", "world"]);
//! ```

use unicode_segmentation::UnicodeSegmentation;

/// Class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Alphanumerics and underscores.
    Word,
    /// A run of one repeated non-word, non-whitespace character.
    Divider,
    /// Spaces, tabs and other whitespace.
    Whitespace,
}

impl TokenKind {
    /// Classify a grapheme cluster by its first scalar value.
    #[must_use]
    pub fn of_cluster(cluster: &str) -> Self {
        match cluster.chars().next() {
            Some(c) if c.is_whitespace() => Self::Whitespace,
            Some(c) if is_word_char(c) => Self::Word,
            _ => Self::Divider,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_whitespace(self) -> bool {
        matches!(self, Self::Whitespace)
    }
}

/// An immutable slice of the tokenized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub kind: TokenKind,
}

impl<'a> Token<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            kind: TokenKind::of_cluster(text),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }
}

/// Word characters: the Unicode flavour of the regex `\w` class.
#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_whitespace_cluster(cluster: &str) -> bool {
    cluster.chars().next().is_some_and(char::is_whitespace)
}

fn is_divider_cluster(cluster: &str) -> bool {
    TokenKind::of_cluster(cluster) == TokenKind::Divider
}

/// Decide whether `next` starts a new token after a token ending in `last`.
fn starts_new_token(last: &str, next: &str) -> bool {
    let last_ws = is_whitespace_cluster(last);
    let next_ws = is_whitespace_cluster(next);
    if last_ws && next_ws {
        return false;
    }
    if last_ws || next_ws {
        return true;
    }
    if !is_divider_cluster(last) && !is_divider_cluster(next) {
        return false;
    }
    last != next
}

/// Split a single line (no `\n`) into tokens.
///
/// Returns an empty vector for an empty line.
#[must_use]
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut last: Option<&str> = None;

    for (offset, cluster) in line.grapheme_indices(true) {
        if let Some(prev) = last
            && starts_new_token(prev, cluster)
        {
            tokens.push(Token::new(&line[start..offset]));
            start = offset;
        }
        last = Some(cluster);
    }

    if start < line.len() {
        tokens.push(Token::new(&line[start..]));
    }

    tokens
}

/// Collapse every run of spaces and tabs into a single space.
///
/// Newlines are kept, so the logical line structure survives.
#[must_use]
pub fn combine_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c == ' ' || c == '\t' {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}
