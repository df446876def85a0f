use std::cmp::Ordering;

use traj_core::warning::{ContinuityWarning, Discontinuity};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuardState {
    #[default]
    Uninitialized,
    Sequential,
    /// At least one visited frame was not one stride after its predecessor.
    /// Stays set until the guard is reset.
    OutOfOrder,
}

/// Tracks the order in which frames are visited.
///
/// Any index other than `previous + stride` takes the continuity path,
/// including revisits of the same frame.
#[derive(Clone, Debug)]
pub struct ContinuityGuard {
    check: bool,
    stride: usize,
    state: GuardState,
    last_frame: Option<usize>,
    discontinuities: usize,
}

impl ContinuityGuard {
    pub fn new(check: bool, stride: usize) -> Self {
        Self {
            check,
            stride: stride.max(1),
            state: GuardState::Uninitialized,
            last_frame: None,
            discontinuities: 0,
        }
    }

    /// Records a visit to `frame`. Returns an advisory when checking is on
    /// and the visit breaks the expected order; never fails.
    pub fn observe(&mut self, frame: usize) -> Option<ContinuityWarning> {
        self.observe_since(frame, None)
    }

    /// Like [`ContinuityGuard::observe`], with `stale` naming the last visit
    /// of a particle that was absent from the previously visited frame. A
    /// frame that is in order for the guard but not for that particle still
    /// takes the continuity path.
    pub fn observe_since(&mut self, frame: usize, stale: Option<usize>) -> Option<ContinuityWarning> {
        let previous = self.last_frame.replace(frame);
        let Some(previous) = previous else {
            self.state = GuardState::Sequential;
            return None;
        };
        let (previous, kind) = match classify(previous, frame, self.stride) {
            Some(kind) => (previous, kind),
            None => {
                let stale = stale.filter(|&last| last != previous)?;
                (stale, classify(stale, frame, self.stride)?)
            }
        };
        self.discontinuities += 1;
        let entering = self.state != GuardState::OutOfOrder;
        self.state = GuardState::OutOfOrder;
        if !self.check {
            return None;
        }
        let warning = ContinuityWarning {
            previous,
            current: frame,
            stride: self.stride,
            kind,
        };
        if entering {
            log::warn!("nojump: {warning}");
        } else {
            log::debug!("nojump: {warning}");
        }
        Some(warning)
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn last_frame(&self) -> Option<usize> {
        self.last_frame
    }

    pub fn discontinuities(&self) -> usize {
        self.discontinuities
    }

    pub fn reset(&mut self) {
        self.state = GuardState::Uninitialized;
        self.last_frame = None;
        self.discontinuities = 0;
    }
}

fn classify(previous: usize, current: usize, stride: usize) -> Option<Discontinuity> {
    match current.cmp(&previous) {
        Ordering::Equal => Some(Discontinuity::Repeated),
        Ordering::Less => Some(Discontinuity::Rewound),
        Ordering::Greater if current - previous == stride => None,
        Ordering::Greater => Some(Discontinuity::Skipped),
    }
}
