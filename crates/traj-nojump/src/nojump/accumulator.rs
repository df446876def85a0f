use traj_core::cell::UnitCell;

use super::displacement::resolve_displacement;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleState {
    /// Wrapped position seen on the last visit.
    pub last_wrapped: [f64; 3],
    /// Continuous position accumulated along the visited frames.
    pub unwrapped: [f64; 3],
    pub last_frame: usize,
    /// Lattice translation from the wrapped to the unwrapped position, in
    /// cell vectors of whichever box is current.
    pub image: [i64; 3],
}

impl ParticleState {
    fn start(frame: usize, wrapped: [f64; 3]) -> Self {
        Self {
            last_wrapped: wrapped,
            unwrapped: wrapped,
            last_frame: frame,
            image: [0; 3],
        }
    }
}

/// Per-particle unwrapping state, stored as an arena indexed by particle id.
/// Slots are filled lazily the first time a particle is seen.
#[derive(Clone, Debug, Default)]
pub struct UnwrapAccumulator {
    particles: Vec<Option<ParticleState>>,
}

impl UnwrapAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves particle `id` to `frame` and returns its unwrapped position.
    ///
    /// The wrapped input is first moved by the particle's image in `cell`, so
    /// a box that changes between visits shifts the image along with it. The
    /// folded displacement from the previous unwrapped position is then added
    /// to the accumulated cartesian position.
    pub fn advance(
        &mut self,
        id: usize,
        frame: usize,
        wrapped: [f64; 3],
        cell: &UnitCell,
    ) -> [f64; 3] {
        if id >= self.particles.len() {
            self.particles.resize(id + 1, None);
        }
        let slot = &mut self.particles[id];
        let Some(state) = slot.as_mut() else {
            let state = ParticleState::start(frame, wrapped);
            *slot = Some(state);
            return state.unwrapped;
        };
        let offset = cell.to_cartesian(state.image.map(|n| n as f64));
        let candidate = [
            wrapped[0] + offset[0],
            wrapped[1] + offset[1],
            wrapped[2] + offset[2],
        ];
        let step = resolve_displacement(state.unwrapped, candidate, cell);
        for k in 0..3 {
            state.unwrapped[k] += step.vector[k];
            state.image[k] = state.image[k].saturating_sub(step.image_shift[k]);
        }
        state.last_wrapped = wrapped;
        state.last_frame = frame;
        state.unwrapped
    }

    pub fn state(&self, id: usize) -> Option<&ParticleState> {
        self.particles.get(id).and_then(Option::as_ref)
    }

    pub fn n_tracked(&self) -> usize {
        self.particles.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.iter().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
