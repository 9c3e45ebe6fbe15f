use thiserror::Error;
use typeset_text::WrapError;

pub type Result<T> = std::result::Result<T, WriteError>;

/// Errors raised while writing text to a pen.
///
/// Both option checks run before anything is measured or drawn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error("unsupported text rotation: {degrees} (expected -90, 0, 90 or 180)")]
    UnsupportedRotation { degrees: i32 },

    #[error("unsupported text shear: {degrees} (expected a value between -80 and 80)")]
    UnsupportedShear { degrees: String },

    #[error(transparent)]
    Wrap(#[from] WrapError),
}

impl WriteError {
    #[must_use]
    pub fn unsupported_shear(degrees: f64) -> Self {
        Self::UnsupportedShear {
            degrees: degrees.to_string(),
        }
    }
}
