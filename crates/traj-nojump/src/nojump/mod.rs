//! Continuous unwrapping of wrapped trajectories.
//!
//! Each visited frame is compared with the previously visited one: the
//! minimum-image step between the two wrapped positions is added to a running
//! cartesian position per particle. Visiting frames out of order still yields
//! a trajectory, but only with an advisory, since exactness then depends on no
//! particle having moved more than half a cell between the two visits.

mod accumulator;
mod continuity;
mod displacement;

pub use accumulator::{ParticleState, UnwrapAccumulator};
pub use continuity::{ContinuityGuard, GuardState};
pub use displacement::{resolve_displacement, Displacement};

use traj_core::cell::UnitCell;
use traj_core::error::{TrajError, TrajResult};
use traj_core::frame::Frame;
use traj_core::warning::ContinuityWarning;

use crate::config::NoJumpConfig;
use crate::transform::Transform;

/// Stateful per-frame unwrapping transform.
///
/// One instance follows one trajectory iteration; call [`NoJumpTransform::reset`]
/// (or run it through the executor, which resets on every run) before
/// replaying frames.
#[derive(Clone, Debug)]
pub struct NoJumpTransform {
    config: NoJumpConfig,
    guard: ContinuityGuard,
    accumulator: UnwrapAccumulator,
}

impl Default for NoJumpTransform {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NoJumpTransform {
    pub fn new(check_continuity: bool) -> Self {
        let config = NoJumpConfig::new(check_continuity);
        Self {
            config,
            guard: ContinuityGuard::new(config.check_continuity, config.stride),
            accumulator: UnwrapAccumulator::new(),
        }
    }

    pub fn from_config(config: NoJumpConfig) -> TrajResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            guard: ContinuityGuard::new(config.check_continuity, config.stride),
            accumulator: UnwrapAccumulator::new(),
        })
    }

    pub fn config(&self) -> &NoJumpConfig {
        &self.config
    }

    /// Replaces the wrapped positions of `frame` with unwrapped ones.
    ///
    /// Fails with [`TrajError::MissingBox`] when the frame has no usable box
    /// and with [`TrajError::Invalid`] on non-finite coordinates; in both
    /// cases no state is touched. A frame without particles is a no-op.
    pub fn apply(&mut self, frame: &mut Frame) -> TrajResult<Option<ContinuityWarning>> {
        let cell = UnitCell::from_box3(frame.box_)
            .map_err(|_| TrajError::MissingBox { frame: frame.index })?;
        if frame.is_empty() {
            return Ok(None);
        }
        if let Some(id) = frame
            .positions
            .iter()
            .position(|pos| pos.iter().any(|x| !x.is_finite()))
        {
            return Err(TrajError::Invalid(format!(
                "frame {}: particle {id} has a non-finite position",
                frame.index
            )));
        }
        // particles missing from the previous visit are compared against
        // their own last frame
        let expected = self.guard.last_frame();
        let stale = (0..frame.n_particles())
            .filter_map(|id| self.accumulator.state(id))
            .map(|state| state.last_frame)
            .find(|&last| Some(last) != expected);
        let warning = self.guard.observe_since(frame.index, stale);
        for (id, pos) in frame.positions.iter_mut().enumerate() {
            *pos = self.accumulator.advance(id, frame.index, *pos, &cell);
        }
        Ok(warning)
    }

    pub fn reset(&mut self) {
        self.guard.reset();
        self.accumulator.clear();
    }

    pub fn guard_state(&self) -> GuardState {
        self.guard.state()
    }

    pub fn discontinuities(&self) -> usize {
        self.guard.discontinuities()
    }

    pub fn particle(&self, id: usize) -> Option<&ParticleState> {
        self.accumulator.state(id)
    }
}

impl Transform for NoJumpTransform {
    fn name(&self) -> &'static str {
        "nojump"
    }

    fn parallelizable(&self) -> bool {
        false
    }

    fn reset(&mut self) {
        NoJumpTransform::reset(self);
    }

    fn apply(&mut self, frame: &mut Frame) -> TrajResult<Option<ContinuityWarning>> {
        NoJumpTransform::apply(self, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traj_core::frame::Box3;
    use traj_core::warning::Discontinuity;

    fn cube(l: f64) -> Box3 {
        Box3::Orthorhombic {
            lx: l,
            ly: l,
            lz: l,
        }
    }

    #[test]
    fn missing_box_leaves_state_untouched() {
        let mut nojump = NoJumpTransform::default();
        let mut first = Frame::new(0, vec![[1.0, 1.0, 1.0]], cube(10.0));
        nojump.apply(&mut first).unwrap();

        let mut boxless = Frame::new(1, vec![[9.0, 1.0, 1.0]], Box3::None);
        let err = nojump.apply(&mut boxless).unwrap_err();
        assert!(matches!(err, TrajError::MissingBox { frame: 1 }));
        assert_eq!(boxless.positions, vec![[9.0, 1.0, 1.0]]);
        assert_eq!(nojump.particle(0).unwrap().last_frame, 0);

        let mut next = Frame::new(1, vec![[9.0, 1.0, 1.0]], cube(10.0));
        assert!(nojump.apply(&mut next).unwrap().is_none());
        assert!((next.positions[0][0] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_box_counts_as_missing() {
        let mut nojump = NoJumpTransform::default();
        let mut frame = Frame::new(
            4,
            vec![[0.0; 3]],
            Box3::Orthorhombic {
                lx: 0.0,
                ly: 1.0,
                lz: 1.0,
            },
        );
        assert!(nojump.apply(&mut frame).unwrap_err().is_missing_box());
        assert_eq!(nojump.guard_state(), GuardState::Uninitialized);
    }

    #[test]
    fn each_frame_uses_its_own_box() {
        let mut nojump = NoJumpTransform::default();
        let mut a = Frame::new(0, vec![[1.0, 0.0, 0.0]], cube(10.0));
        let mut b = Frame::new(1, vec![[3.5, 0.0, 0.0]], cube(4.0));
        nojump.apply(&mut a).unwrap();
        nojump.apply(&mut b).unwrap();
        assert!((b.positions[0][0] + 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_frame_is_a_no_op() {
        let mut nojump = NoJumpTransform::default();
        let mut frame = Frame::new(0, Vec::new(), cube(1.0));
        assert!(nojump.apply(&mut frame).unwrap().is_none());
        assert!(frame.positions.is_empty());
        assert_eq!(nojump.guard_state(), GuardState::Uninitialized);
    }

    #[test]
    fn rewind_warns_and_still_unwraps() {
        let mut nojump = NoJumpTransform::default();
        let mut f0 = Frame::new(5, vec![[0.5, 0.5, 0.5]], cube(1.0));
        let mut f1 = Frame::new(2, vec![[0.9, 0.5, 0.5]], cube(1.0));
        nojump.apply(&mut f0).unwrap();
        let warning = nojump.apply(&mut f1).unwrap().unwrap();
        assert_eq!(warning.kind, Discontinuity::Rewound);
        assert_eq!(nojump.guard_state(), GuardState::OutOfOrder);
        assert!((f1.positions[0][0] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn unchecked_transform_is_silent_but_identical() {
        let run = |check: bool| {
            let mut nojump = NoJumpTransform::new(check);
            let mut out = Vec::new();
            let mut warnings = 0;
            for (idx, x) in [(0usize, 0.1), (3, 0.8), (1, 0.2)] {
                let mut frame = Frame::new(idx, vec![[x, 0.0, 0.0]], cube(1.0));
                if nojump.apply(&mut frame).unwrap().is_some() {
                    warnings += 1;
                }
                out.push(frame.positions[0][0]);
            }
            (out, warnings)
        };
        let (checked, n_checked) = run(true);
        let (unchecked, n_unchecked) = run(false);
        assert_eq!(checked, unchecked);
        assert_eq!(n_checked, 2);
        assert_eq!(n_unchecked, 0);
    }

    #[test]
    fn reset_restarts_from_wrapped_positions() {
        let mut nojump = NoJumpTransform::default();
        for idx in 0..3 {
            let mut frame = Frame::new(idx, vec![[0.4 * idx as f64 % 1.0, 0.0, 0.0]], cube(1.0));
            nojump.apply(&mut frame).unwrap();
        }
        nojump.reset();
        assert!(nojump.particle(0).is_none());
        let mut frame = Frame::new(9, vec![[0.3, 0.0, 0.0]], cube(1.0));
        assert!(nojump.apply(&mut frame).unwrap().is_none());
        assert_eq!(frame.positions[0], [0.3, 0.0, 0.0]);
    }

    #[test]
    fn particle_absent_from_a_frame_is_reported() {
        let mut nojump = NoJumpTransform::default();
        let mut f0 = Frame::new(0, vec![[0.1, 0.5, 0.5], [0.5, 0.5, 0.5]], cube(1.0));
        let mut f1 = Frame::new(1, vec![[0.3, 0.5, 0.5]], cube(1.0));
        let mut f2 = Frame::new(2, vec![[0.5, 0.5, 0.5], [0.9, 0.5, 0.5]], cube(1.0));
        assert!(nojump.apply(&mut f0).unwrap().is_none());
        assert!(nojump.apply(&mut f1).unwrap().is_none());
        let warning = nojump.apply(&mut f2).unwrap().unwrap();
        assert_eq!(warning.kind, Discontinuity::Skipped);
        assert_eq!((warning.previous, warning.current), (0, 2));
        assert_eq!(nojump.particle(1).unwrap().last_frame, 2);
        assert!((f2.positions[0][0] - 0.5).abs() < 1e-12);
        assert!((f2.positions[1][0] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn non_finite_position_is_rejected() {
        let mut nojump = NoJumpTransform::default();
        let mut f0 = Frame::new(0, vec![[0.5; 3]], cube(1.0));
        nojump.apply(&mut f0).unwrap();
        let mut bad = Frame::new(1, vec![[f64::INFINITY, 0.5, 0.5]], cube(1.0));
        assert!(matches!(nojump.apply(&mut bad), Err(TrajError::Invalid(_))));
        assert_eq!(nojump.particle(0).unwrap().last_frame, 0);
        let mut nan = Frame::new(1, vec![[0.5, f64::NAN, 0.5]], cube(1.0));
        assert!(nojump.apply(&mut nan).is_err());
        assert_eq!(nojump.guard_state(), GuardState::Sequential);
    }

    #[test]
    fn zero_stride_config_is_rejected() {
        let cfg = NoJumpConfig::default().with_stride(0);
        assert!(NoJumpTransform::from_config(cfg).is_err());
    }
}
