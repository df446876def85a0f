#![allow(dead_code)]

use traj_nojump::{
    Box3, ContinuityWarning, Frame, InMemoryTrajectory, Transform, TrajResult, UnitCell,
};

pub fn unit_cube() -> Box3 {
    Box3::Orthorhombic {
        lx: 1.0,
        ly: 1.0,
        lz: 1.0,
    }
}

pub fn skewed_cell() -> UnitCell {
    UnitCell::from_lengths_angles([10.0, 11.0, 12.0], [80.0, 95.0, 70.0]).expect("valid cell")
}

/// One particle stepping 1/3 along every axis and wrapped back into the unit
/// range every third frame: 0, 1/3, 2/3, 0, ...
pub fn sawtooth_positions(n_frames: usize) -> Vec<Vec<[f64; 3]>> {
    (0..n_frames)
        .map(|k| vec![[(k % 3) as f64 / 3.0; 3]])
        .collect()
}

/// Unwrapped reference trajectories moving at constant fractional velocity.
pub fn constant_velocity(
    cell: &UnitCell,
    starts: &[[f64; 3]],
    velocities: &[[f64; 3]],
    n_frames: usize,
) -> Vec<Vec<[f64; 3]>> {
    (0..n_frames)
        .map(|k| {
            starts
                .iter()
                .zip(velocities)
                .map(|(s, v)| {
                    let t = k as f64;
                    cell.to_cartesian([s[0] + t * v[0], s[1] + t * v[1], s[2] + t * v[2]])
                })
                .collect()
        })
        .collect()
}

pub fn wrap_all(cell: &UnitCell, frames: &[Vec<[f64; 3]>]) -> Vec<Vec<[f64; 3]>> {
    frames
        .iter()
        .map(|coords| coords.iter().map(|&r| cell.wrap(r)).collect())
        .collect()
}

pub fn wrapped_trajectory(cell: &UnitCell, reference: &[Vec<[f64; 3]>]) -> InMemoryTrajectory {
    InMemoryTrajectory::from_positions(wrap_all(cell, reference), cell.to_box3())
        .expect("consistent frames")
}

pub fn assert_close(actual: [f64; 3], expected: [f64; 3], rtol: f64, context: &str) {
    for k in 0..3 {
        let tol = rtol * expected[k].abs().max(1.0);
        assert!(
            (actual[k] - expected[k]).abs() <= tol,
            "{context}: component {k} differs: {actual:?} vs {expected:?}"
        );
    }
}

/// Upstream wrapping step, standing in for an independent wrap operation.
pub struct WrapInto {
    pub cell: UnitCell,
}

impl Transform for WrapInto {
    fn name(&self) -> &'static str {
        "wrap"
    }

    fn apply(&mut self, frame: &mut Frame) -> TrajResult<Option<ContinuityWarning>> {
        for pos in frame.positions.iter_mut() {
            *pos = self.cell.wrap(*pos);
        }
        frame.box_ = self.cell.to_box3();
        Ok(None)
    }
}
