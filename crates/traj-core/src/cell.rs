use crate::error::{TrajError, TrajResult};
use crate::frame::Box3;

const MIN_LENGTH: f64 = 1e-6;
const MIN_VOLUME: f64 = 1e-12;
const RIGHT_ANGLE_TOL: f64 = 1e-3;

/// Periodic cell stored as a lattice matrix whose rows are the cell vectors
/// `a`, `b` and `c`, together with its inverse.
///
/// Fractional coordinates are row vectors: `r = f * cell` and `f = r * inv`.
/// Orthogonal and triclinic cells share the same code path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitCell {
    cell: [[f64; 3]; 3],
    inv: [[f64; 3]; 3],
}

impl UnitCell {
    pub fn orthorhombic(lx: f64, ly: f64, lz: f64) -> TrajResult<Self> {
        if [lx, ly, lz]
            .iter()
            .any(|&l| !l.is_finite() || l <= MIN_LENGTH)
        {
            return Err(TrajError::Invalid(
                "orthorhombic box lengths must be positive".into(),
            ));
        }
        Ok(Self {
            cell: [[lx, 0.0, 0.0], [0.0, ly, 0.0], [0.0, 0.0, lz]],
            inv: [
                [1.0 / lx, 0.0, 0.0],
                [0.0, 1.0 / ly, 0.0],
                [0.0, 0.0, 1.0 / lz],
            ],
        })
    }

    pub fn from_matrix(cell: [[f64; 3]; 3]) -> TrajResult<Self> {
        if cell.iter().flatten().any(|v| !v.is_finite()) {
            return Err(TrajError::Invalid("box matrix has non-finite entries".into()));
        }
        let [[m0, m1, m2], [m3, m4, m5], [m6, m7, m8]] = cell;
        let det = m0 * (m4 * m8 - m5 * m7) - m1 * (m3 * m8 - m5 * m6) + m2 * (m3 * m7 - m4 * m6);
        if !det.is_finite() || det.abs() <= MIN_VOLUME {
            return Err(TrajError::Invalid(
                "box matrix not invertible (zero volume)".into(),
            ));
        }
        let inv = [
            [
                (m4 * m8 - m5 * m7) / det,
                (m2 * m7 - m1 * m8) / det,
                (m1 * m5 - m2 * m4) / det,
            ],
            [
                (m5 * m6 - m3 * m8) / det,
                (m0 * m8 - m2 * m6) / det,
                (m2 * m3 - m0 * m5) / det,
            ],
            [
                (m3 * m7 - m4 * m6) / det,
                (m1 * m6 - m0 * m7) / det,
                (m0 * m4 - m1 * m3) / det,
            ],
        ];
        Ok(Self { cell, inv })
    }

    /// Builds a cell from edge lengths and the angles `alpha` (b^c), `beta`
    /// (a^c) and `gamma` (a^b) in degrees. `a` lies along x and `b` in the xy
    /// plane.
    pub fn from_lengths_angles(lengths: [f64; 3], angles_deg: [f64; 3]) -> TrajResult<Self> {
        let [a, b, c] = lengths;
        if lengths.iter().any(|&l| !l.is_finite() || l <= MIN_LENGTH) {
            return Err(TrajError::Invalid(format!(
                "cell lengths must be positive, got {lengths:?}"
            )));
        }
        if angles_deg
            .iter()
            .any(|&deg| !deg.is_finite() || deg <= 0.0 || deg >= 180.0)
        {
            return Err(TrajError::Invalid(format!(
                "cell angles must lie in (0, 180) degrees, got {angles_deg:?}"
            )));
        }
        let [alpha, beta, gamma] = angles_deg.map(f64::to_radians);
        if [alpha, beta, gamma]
            .iter()
            .all(|&angle| is_right_angle(angle))
        {
            return Self::orthorhombic(a, b, c);
        }

        let (cos_alpha, _) = cos_sin(alpha);
        let (cos_beta, _) = cos_sin(beta);
        let (cos_gamma, sin_gamma) = cos_sin(gamma);
        let cx = c * cos_beta;
        let cy = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let cz_sq = c * c - cx * cx - cy * cy;
        if !cz_sq.is_finite() || cz_sq <= 0.0 {
            return Err(TrajError::Invalid(format!(
                "cell angles {angles_deg:?} do not describe a cell with positive volume"
            )));
        }
        Self::from_matrix([
            [a, 0.0, 0.0],
            [b * cos_gamma, b * sin_gamma, 0.0],
            [cx, cy, cz_sq.sqrt()],
        ])
    }

    pub fn from_box3(box_: Box3) -> TrajResult<Self> {
        match box_ {
            Box3::Orthorhombic { lx, ly, lz } => Self::orthorhombic(lx, ly, lz),
            Box3::Triclinic { m } => {
                Self::from_matrix([[m[0], m[1], m[2]], [m[3], m[4], m[5]], [m[6], m[7], m[8]]])
            }
            Box3::None => Err(TrajError::Mismatch("box vectors required".into())),
        }
    }

    pub fn to_box3(&self) -> Box3 {
        if self.is_orthorhombic() {
            return Box3::Orthorhombic {
                lx: self.cell[0][0],
                ly: self.cell[1][1],
                lz: self.cell[2][2],
            };
        }
        let c = &self.cell;
        Box3::Triclinic {
            m: [
                c[0][0], c[0][1], c[0][2], c[1][0], c[1][1], c[1][2], c[2][0], c[2][1], c[2][2],
            ],
        }
    }

    pub fn matrix(&self) -> &[[f64; 3]; 3] {
        &self.cell
    }

    pub fn is_orthorhombic(&self) -> bool {
        let c = &self.cell;
        c[0][1] == 0.0
            && c[0][2] == 0.0
            && c[1][0] == 0.0
            && c[1][2] == 0.0
            && c[2][0] == 0.0
            && c[2][1] == 0.0
    }

    pub fn volume(&self) -> f64 {
        let c = &self.cell;
        let det = c[0][0] * (c[1][1] * c[2][2] - c[1][2] * c[2][1])
            - c[0][1] * (c[1][0] * c[2][2] - c[1][2] * c[2][0])
            + c[0][2] * (c[1][0] * c[2][1] - c[1][1] * c[2][0]);
        det.abs()
    }

    pub fn to_fractional(&self, r: [f64; 3]) -> [f64; 3] {
        let inv = &self.inv;
        [
            r[0] * inv[0][0] + r[1] * inv[1][0] + r[2] * inv[2][0],
            r[0] * inv[0][1] + r[1] * inv[1][1] + r[2] * inv[2][1],
            r[0] * inv[0][2] + r[1] * inv[1][2] + r[2] * inv[2][2],
        ]
    }

    pub fn to_cartesian(&self, f: [f64; 3]) -> [f64; 3] {
        let cell = &self.cell;
        [
            f[0] * cell[0][0] + f[1] * cell[1][0] + f[2] * cell[2][0],
            f[0] * cell[0][1] + f[1] * cell[1][1] + f[2] * cell[2][1],
            f[0] * cell[0][2] + f[1] * cell[1][2] + f[2] * cell[2][2],
        ]
    }

    /// Folds a cartesian position into the primary cell, i.e. fractional
    /// coordinates in `[0, 1)`.
    pub fn wrap(&self, r: [f64; 3]) -> [f64; 3] {
        let f = self.to_fractional(r).map(|v| {
            let folded = v - v.floor();
            // rounding can land exactly on 1.0 for tiny negative inputs
            if folded >= 1.0 {
                0.0
            } else {
                folded
            }
        });
        self.to_cartesian(f)
    }
}

fn is_right_angle(angle: f64) -> bool {
    (angle - std::f64::consts::FRAC_PI_2).abs() < RIGHT_ANGLE_TOL
}

fn cos_sin(angle: f64) -> (f64, f64) {
    if is_right_angle(angle) {
        (0.0, 1.0)
    } else {
        (angle.cos(), angle.sin())
    }
}
