use thiserror::Error;

pub type Result<T> = std::result::Result<T, WrapError>;

/// Errors raised by wrapper configuration and wrapper preconditions.
///
/// Content that does not fit is never an error; it is reported through
/// [`WrappingResult::truncated_text`](crate::wrap::WrappingResult::truncated_text).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WrapError {
    #[error("unsupported text trimming option: {value:?} (expected \"ellipsis\" or \"none\")")]
    InvalidTextTrimming { value: String },

    #[error("single-line wrapper cannot wrap {lines} lines of text")]
    MultilineInput { lines: usize },
}

impl WrapError {
    #[must_use]
    pub fn invalid_trimming(value: impl Into<String>) -> Self {
        Self::InvalidTextTrimming {
            value: value.into(),
        }
    }
}
