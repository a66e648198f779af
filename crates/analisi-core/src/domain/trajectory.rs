use super::{AnalisiError, AnalisiResult};
use serde::{Deserialize, Serialize};

/// Molecular-dynamics trajectory handed to the external analysis program.
///
/// Positions and velocities are indexed `[frame][atom][axis]`, cells are the
/// per-frame box matrices with the lattice vectors as rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub symbols: Vec<String>,
    pub positions: Vec<Vec<[f64; 3]>>,
    pub velocities: Vec<Vec<[f64; 3]>>,
    pub cells: Vec<[[f64; 3]; 3]>,
    pub times: Vec<f64>,
}

impl Trajectory {
    pub fn frame_count(&self) -> usize {
        self.positions.len()
    }

    pub fn atom_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn validate(&self) -> AnalisiResult<()> {
        let frames = self.frame_count();
        if frames == 0 {
            return Err(AnalisiError::invalid_trajectory(
                "INPUT.TRAJECTORY_FRAMES",
                "trajectory contains no frames",
            ));
        }

        for (label, count) in [
            ("velocities", self.velocities.len()),
            ("cells", self.cells.len()),
            ("times", self.times.len()),
        ] {
            if count != frames {
                return Err(AnalisiError::invalid_trajectory(
                    "INPUT.TRAJECTORY_FRAMES",
                    format!("trajectory has {frames} position frames but {count} {label} entries"),
                ));
            }
        }

        let atoms = self.atom_count();
        for (frame, (positions, velocities)) in
            self.positions.iter().zip(&self.velocities).enumerate()
        {
            if positions.len() != atoms || velocities.len() != atoms {
                return Err(AnalisiError::invalid_trajectory(
                    "INPUT.TRAJECTORY_ATOMS",
                    format!(
                        "frame {frame} has {} positions and {} velocities for {atoms} symbols",
                        positions.len(),
                        velocities.len()
                    ),
                ));
            }
        }

        for (frame, cell) in self.cells.iter().enumerate() {
            let volume = cell_volume(cell);
            if !(volume.is_finite() && volume > 0.0) {
                return Err(AnalisiError::invalid_trajectory(
                    "INPUT.TRAJECTORY_CELL",
                    format!(
                        "frame {frame} cell must be a right-handed, non-degenerate basis \
                         (signed volume {volume})"
                    ),
                ));
            }
        }

        Ok(())
    }
}

/// Signed volume `a · (b × c)` of a cell given as row vectors.
pub fn cell_volume(cell: &[[f64; 3]; 3]) -> f64 {
    let [a, b, c] = *cell;
    a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
        + a[2] * (b[0] * c[1] - b[1] * c[0])
}
