use traj_core::error::{TrajError, TrajResult};
use traj_core::frame::{Box3, Frame};
use traj_core::warning::ContinuityWarning;

use crate::config::FrameSelection;
use crate::transform::{Transform, TransformPipeline};

/// Random-access source of frames.
pub trait FrameSource {
    fn n_particles(&self) -> usize;
    fn n_frames(&self) -> usize;
    fn read_frame(&mut self, index: usize) -> TrajResult<Frame>;
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryTrajectory {
    n_particles: usize,
    frames: Vec<Frame>,
}

impl InMemoryTrajectory {
    /// Frames are re-indexed by position; all must hold the same number of
    /// particles.
    pub fn new(frames: Vec<Frame>) -> TrajResult<Self> {
        let n_particles = frames.first().map(|f| f.n_particles()).unwrap_or(0);
        let mut frames = frames;
        for (idx, frame) in frames.iter_mut().enumerate() {
            if frame.n_particles() != n_particles {
                return Err(TrajError::Mismatch(format!(
                    "frame {idx} has {} particles, expected {n_particles}",
                    frame.n_particles()
                )));
            }
            frame.index = idx;
        }
        Ok(Self {
            n_particles,
            frames,
        })
    }

    pub fn from_positions(positions: Vec<Vec<[f64; 3]>>, box_: Box3) -> TrajResult<Self> {
        let boxes = vec![box_; positions.len()];
        Self::with_boxes(positions, boxes)
    }

    pub fn with_boxes(positions: Vec<Vec<[f64; 3]>>, boxes: Vec<Box3>) -> TrajResult<Self> {
        if positions.len() != boxes.len() {
            return Err(TrajError::Mismatch(format!(
                "{} frames but {} boxes",
                positions.len(),
                boxes.len()
            )));
        }
        let frames = positions
            .into_iter()
            .zip(boxes)
            .enumerate()
            .map(|(idx, (coords, box_))| Frame::new(idx, coords, box_))
            .collect();
        Self::new(frames)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl FrameSource for InMemoryTrajectory {
    fn n_particles(&self) -> usize {
        self.n_particles
    }

    fn n_frames(&self) -> usize {
        self.frames.len()
    }

    fn read_frame(&mut self, index: usize) -> TrajResult<Frame> {
        self.frames.get(index).cloned().ok_or_else(|| {
            TrajError::Mismatch(format!(
                "frame index {index} out of range for trajectory with {} frames",
                self.frames.len()
            ))
        })
    }
}

/// Frames in visiting order plus every advisory raised along the way.
#[derive(Clone, Debug, Default)]
pub struct TransformedFrames {
    pub frames: Vec<Frame>,
    pub warnings: Vec<ContinuityWarning>,
}

impl TransformedFrames {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Drives a transform pipeline over a frame source.
///
/// Every run starts from a freshly reset pipeline.
pub struct Executor {
    pipeline: TransformPipeline,
    deny_warnings: bool,
}

impl Executor {
    pub fn new(pipeline: TransformPipeline) -> Self {
        Self {
            pipeline,
            deny_warnings: false,
        }
    }

    pub fn with_transform<T: Transform + 'static>(transform: T) -> Self {
        Self::new(TransformPipeline::new().with(transform))
    }

    /// Turns the first advisory of a run into `TrajError::Continuity`.
    pub fn with_deny_warnings(mut self, deny_warnings: bool) -> Self {
        self.deny_warnings = deny_warnings;
        self
    }

    pub fn run(&mut self, source: &mut dyn FrameSource) -> TrajResult<TransformedFrames> {
        let indices: Vec<usize> = (0..source.n_frames()).collect();
        self.run_selected(source, &indices)
    }

    pub fn run_strided(
        &mut self,
        source: &mut dyn FrameSource,
        start: usize,
        stop: Option<usize>,
        step: usize,
    ) -> TrajResult<TransformedFrames> {
        if step == 0 {
            return Err(TrajError::Invalid("frame step must be at least 1".into()));
        }
        let stop = stop.unwrap_or(usize::MAX).min(source.n_frames());
        let indices: Vec<usize> = (start..stop).step_by(step).collect();
        self.run_selected(source, &indices)
    }

    /// Visits `indices` in the given order; repeats and rewinds are allowed.
    pub fn run_selected(
        &mut self,
        source: &mut dyn FrameSource,
        indices: &[usize],
    ) -> TrajResult<TransformedFrames> {
        let n_frames = source.n_frames();
        if let Some(&bad) = indices.iter().find(|&&idx| idx >= n_frames) {
            return Err(TrajError::Mismatch(format!(
                "frame index {bad} out of range for trajectory with {n_frames} frames"
            )));
        }
        self.pipeline.reset();
        log::debug!(
            "running [{}] over {} of {} frames",
            self.pipeline.names().join(", "),
            indices.len(),
            n_frames
        );
        let mut out = TransformedFrames {
            frames: Vec::with_capacity(indices.len()),
            warnings: Vec::new(),
        };
        for &idx in indices {
            let mut frame = source.read_frame(idx)?;
            let warnings = self.pipeline.apply(&mut frame)?;
            if self.deny_warnings {
                if let Some(&first) = warnings.first() {
                    return Err(first.into());
                }
            }
            out.warnings.extend(warnings);
            out.frames.push(frame);
        }
        log::debug!(
            "processed {} frames with {} continuity warnings",
            out.frames.len(),
            out.warnings.len()
        );
        Ok(out)
    }

    pub fn run_selection(
        &mut self,
        source: &mut dyn FrameSource,
        selection: &FrameSelection,
    ) -> TrajResult<TransformedFrames> {
        match selection {
            FrameSelection::All => self.run(source),
            FrameSelection::Slice { start, stop, step } => {
                self.run_strided(source, *start, *stop, *step)
            }
            FrameSelection::Indices(raw) => {
                let indices = normalize_frame_indices(raw.clone(), source.n_frames());
                if indices.len() != raw.len() {
                    return Err(TrajError::Mismatch(format!(
                        "frame indices {raw:?} out of range for trajectory with {} frames",
                        source.n_frames()
                    )));
                }
                self.run_selected(source, &indices)
            }
        }
    }
}

/// Resolves negative indices from the end and drops out-of-range ones.
pub fn normalize_frame_indices(frame_indices: Vec<i64>, n_frames: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(frame_indices.len());
    for raw in frame_indices.into_iter() {
        let mut idx = raw;
        if idx < 0 {
            idx += n_frames as i64;
        }
        if idx >= 0 && (idx as usize) < n_frames {
            out.push(idx as usize);
        }
    }
    out
}
