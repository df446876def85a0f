use thiserror::Error;

use crate::warning::ContinuityWarning;

#[derive(Debug, Error)]
pub enum TrajError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("mismatch: {0}")]
    Mismatch(String),
    #[error("invalid: {0}")]
    Invalid(String),
    /// A frame reached an unwrapping step without a usable periodic box.
    #[error("frame {frame}: box dimensions are required to unwrap positions")]
    MissingBox { frame: usize },
    /// An advisory escalated to a hard error by the caller.
    #[error(transparent)]
    Continuity(#[from] ContinuityWarning),
}

pub type TrajResult<T> = Result<T, TrajError>;

impl TrajError {
    pub fn is_missing_box(&self) -> bool {
        matches!(self, TrajError::MissingBox { .. })
    }
}
