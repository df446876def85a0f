use crate::cell::UnitCell;

/// Periodic box carried by a frame. `None` means the frame has no box data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Box3 {
    #[default]
    None,
    Orthorhombic { lx: f64, ly: f64, lz: f64 },
    /// Row-major lattice matrix, rows are the cell vectors.
    Triclinic { m: [f64; 9] },
}

impl Box3 {
    /// Cell from `[a, b, c]` and `[alpha, beta, gamma]` in degrees. Values that
    /// do not describe a cell with positive volume give `Box3::None`.
    pub fn from_lengths_angles(lengths: [f64; 3], angles_deg: [f64; 3]) -> Self {
        UnitCell::from_lengths_angles(lengths, angles_deg)
            .map(|cell| cell.to_box3())
            .unwrap_or(Box3::None)
    }

    pub fn from_dimensions(dimensions: [f64; 6]) -> Self {
        let [a, b, c, alpha, beta, gamma] = dimensions;
        Self::from_lengths_angles([a, b, c], [alpha, beta, gamma])
    }

    pub fn from_matrix(cell: [[f64; 3]; 3]) -> Self {
        Box3::Triclinic {
            m: [
                cell[0][0], cell[0][1], cell[0][2], cell[1][0], cell[1][1], cell[1][2], cell[2][0],
                cell[2][1], cell[2][2],
            ],
        }
    }

    /// False when no box was supplied or the supplied one is degenerate.
    pub fn is_valid(&self) -> bool {
        self.cell().is_some()
    }

    pub fn cell(&self) -> Option<UnitCell> {
        UnitCell::from_box3(*self).ok()
    }
}

/// One trajectory frame: wrapped cartesian positions indexed by particle id.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: usize,
    pub positions: Vec<[f64; 3]>,
    pub box_: Box3,
    pub time_ps: Option<f64>,
}

impl Frame {
    pub fn new(index: usize, positions: Vec<[f64; 3]>, box_: Box3) -> Self {
        Self {
            index,
            positions,
            box_,
            time_ps: None,
        }
    }

    pub fn with_time(mut self, time_ps: f64) -> Self {
        self.time_ps = Some(time_ps);
        self
    }

    pub fn n_particles(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
