use std::fmt;

use thiserror::Error;

/// How a visited frame index departs from the expected successor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discontinuity {
    /// Moved forward by something other than the configured stride.
    Skipped,
    /// Moved backward.
    Rewound,
    /// Visited the same index twice in a row.
    Repeated,
}

impl fmt::Display for Discontinuity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discontinuity::Skipped => write!(f, "skipped"),
            Discontinuity::Rewound => write!(f, "rewound"),
            Discontinuity::Repeated => write!(f, "repeated"),
        }
    }
}

/// Non-fatal advisory raised when frames are not visited one stride apart.
///
/// Unwrapping still proceeds; the result is exact only when no particle moved
/// by more than half a cell between `previous` and `current`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error(
    "non-contiguous frame access ({kind}): frame {current} after frame {previous} \
     with stride {stride}; unwrapping is only exact if no particle moved more than \
     half a cell in between"
)]
pub struct ContinuityWarning {
    pub previous: usize,
    pub current: usize,
    pub stride: usize,
    pub kind: Discontinuity,
}
