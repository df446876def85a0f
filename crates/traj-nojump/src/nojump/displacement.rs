use traj_core::cell::UnitCell;

/// Minimum-image step between two wrapped positions of one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Displacement {
    /// Cartesian displacement after folding.
    pub vector: [f64; 3],
    /// Whole cell repeats removed from the raw fractional difference, per axis.
    pub image_shift: [i64; 3],
}

/// Resolves the displacement from `previous` to `current` under the
/// minimum-image convention of `cell`.
///
/// The fold happens in fractional space so skewed cells are handled exactly;
/// each fractional component ends up in `(-0.5, 0.5]`.
pub fn resolve_displacement(previous: [f64; 3], current: [f64; 3], cell: &UnitCell) -> Displacement {
    let raw = [
        current[0] - previous[0],
        current[1] - previous[1],
        current[2] - previous[2],
    ];
    let frac = cell.to_fractional(raw);
    let mut folded = [0.0f64; 3];
    let mut image_shift = [0i64; 3];
    for k in 0..3 {
        let shift = (frac[k] - 0.5).ceil();
        folded[k] = frac[k] - shift;
        image_shift[k] = shift as i64;
    }
    Displacement {
        vector: cell.to_cartesian(folded),
        image_shift,
    }
}
