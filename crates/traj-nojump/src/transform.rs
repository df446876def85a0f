use traj_core::error::TrajResult;
use traj_core::frame::{Box3, Frame};
use traj_core::warning::ContinuityWarning;

/// A per-frame coordinate transform. Transforms mutate the frame in place and
/// may return an advisory that must not abort processing.
pub trait Transform {
    fn name(&self) -> &'static str;
    /// Whether frames may be handed to this transform in any order.
    fn parallelizable(&self) -> bool {
        true
    }
    fn reset(&mut self) {}
    fn apply(&mut self, frame: &mut Frame) -> TrajResult<Option<ContinuityWarning>>;
}

/// Ordered list of transforms applied to every visited frame.
#[derive(Default)]
pub struct TransformPipeline {
    transforms: Vec<Box<dyn Transform>>,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.push(transform);
        self
    }

    pub fn push<T: Transform + 'static>(&mut self, transform: T) {
        self.transforms.push(Box::new(transform));
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    pub fn parallelizable(&self) -> bool {
        self.transforms.iter().all(|t| t.parallelizable())
    }

    pub fn reset(&mut self) {
        for transform in self.transforms.iter_mut() {
            transform.reset();
        }
    }

    /// Runs every transform in order. The first error aborts the frame.
    pub fn apply(&mut self, frame: &mut Frame) -> TrajResult<Vec<ContinuityWarning>> {
        let mut warnings = Vec::new();
        for transform in self.transforms.iter_mut() {
            if let Some(warning) = transform.apply(frame)? {
                warnings.push(warning);
            }
        }
        Ok(warnings)
    }
}

/// Assigns a fixed box to every frame, e.g. for trajectories stored without
/// cell information.
#[derive(Clone, Copy, Debug)]
pub struct SetBoxTransform {
    box_: Box3,
}

impl SetBoxTransform {
    pub fn new(box_: Box3) -> Self {
        Self { box_ }
    }

    pub fn from_dimensions(dimensions: [f64; 6]) -> Self {
        Self::new(Box3::from_dimensions(dimensions))
    }
}

impl Transform for SetBoxTransform {
    fn name(&self) -> &'static str {
        "set_box"
    }

    fn apply(&mut self, frame: &mut Frame) -> TrajResult<Option<ContinuityWarning>> {
        frame.box_ = self.box_;
        Ok(None)
    }
}
