#![forbid(unsafe_code)]

pub mod config;
pub mod executor;
pub mod io;
pub mod nojump;
pub mod transform;

pub use config::{FrameSelection, NoJumpConfig, RunConfig};
pub use executor::{
    normalize_frame_indices, Executor, FrameSource, InMemoryTrajectory, TransformedFrames,
};
pub use nojump::{
    resolve_displacement, ContinuityGuard, Displacement, GuardState, NoJumpTransform,
    ParticleState, UnwrapAccumulator,
};
pub use transform::{SetBoxTransform, Transform, TransformPipeline};
pub use traj_core::{
    Box3, ContinuityWarning, Discontinuity, Frame, TrajError, TrajResult, UnitCell,
};
