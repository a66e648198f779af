//! On-disk encodings produced by the plugin: the binary trajectory consumed
//! by the analysis program and the JSON artifacts written for the host.

use super::traits::TrajectoryWriter;
use crate::domain::Trajectory;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Per-atom columns written to every snapshot.
pub const LAMMPS_COLUMNS: [&str; 8] = ["id", "type", "x", "y", "z", "vx", "vy", "vz"];

/// Writes every frame as one snapshot of a LAMMPS binary dump.
///
/// Snapshot layout (native endian): timestep `i64`, atom count `i64`,
/// triclinic flag `i32`, six boundary flags `i32`, bounding box
/// `xlo xhi ylo yhi zlo zhi` as `f64`, tilt factors `xy xz yz` when
/// triclinic, columns per atom `i32`, chunk count `i32`, then one chunk:
/// value count `i32` followed by the values as `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LammpsBinaryWriter;

impl TrajectoryWriter for LammpsBinaryWriter {
    fn write_trajectory(
        &self,
        trajectory: &Trajectory,
        type_ids: &[i32],
        path: &Path,
    ) -> io::Result<()> {
        if type_ids.len() != trajectory.atom_count() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "{} type ids for {} atoms",
                    type_ids.len(),
                    trajectory.atom_count()
                ),
            ));
        }

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(File::create(path)?);
        for frame in 0..trajectory.frame_count() {
            write_snapshot(&mut out, trajectory, type_ids, frame)?;
        }
        out.flush()
    }
}

fn write_snapshot(
    out: &mut impl Write,
    trajectory: &Trajectory,
    type_ids: &[i32],
    frame: usize,
) -> io::Result<()> {
    let atoms = trajectory.atom_count();
    let cell = &trajectory.cells[frame];
    let rotation = LammpsRotation::from_cell(cell).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("frame {frame} cell cannot be expressed as a LAMMPS box"),
        )
    })?;
    let bounds = LammpsBox::from_cell(cell, &rotation);
    if !rotation.is_identity() {
        debug!(frame, "rotated cell into the LAMMPS triclinic frame");
    }

    out.write_all(&(frame as i64).to_ne_bytes())?;
    out.write_all(&(atoms as i64).to_ne_bytes())?;
    out.write_all(&i32::from(bounds.is_triclinic()).to_ne_bytes())?;
    for _ in 0..6 {
        out.write_all(&0_i32.to_ne_bytes())?;
    }
    for value in bounds.bounding_box() {
        out.write_all(&value.to_ne_bytes())?;
    }
    if bounds.is_triclinic() {
        for value in bounds.tilt {
            out.write_all(&value.to_ne_bytes())?;
        }
    }

    let size_one = LAMMPS_COLUMNS.len();
    out.write_all(&(size_one as i32).to_ne_bytes())?;
    out.write_all(&1_i32.to_ne_bytes())?;
    out.write_all(&((atoms * size_one) as i32).to_ne_bytes())?;

    let positions = &trajectory.positions[frame];
    let velocities = &trajectory.velocities[frame];
    for atom in 0..atoms {
        let [x, y, z] = rotation.apply(positions[atom]);
        let [vx, vy, vz] = rotation.apply(velocities[atom]);
        let row = [
            (atom + 1) as f64,
            f64::from(type_ids[atom]),
            x,
            y,
            z,
            vx,
            vy,
            vz,
        ];
        for value in row {
            out.write_all(&value.to_ne_bytes())?;
        }
    }
    Ok(())
}

fn dot(u: [f64; 3], v: [f64; 3]) -> f64 {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

fn cross(u: [f64; 3], v: [f64; 3]) -> [f64; 3] {
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

fn normalized(v: [f64; 3]) -> Option<[f64; 3]> {
    let norm = dot(v, v).sqrt();
    (norm.is_finite() && norm > 0.0).then(|| [v[0] / norm, v[1] / norm, v[2] / norm])
}

/// Orthonormal basis putting `a` along +x and `b` in the xy plane with
/// positive y. Applying it to a vector gives its LAMMPS-frame components.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LammpsRotation {
    axes: [[f64; 3]; 3],
}

impl LammpsRotation {
    /// `None` for degenerate or left-handed cells.
    fn from_cell(cell: &[[f64; 3]; 3]) -> Option<Self> {
        let [a, b, c] = *cell;
        let ex = normalized(a)?;
        let along = dot(b, ex);
        let ey = normalized([b[0] - along * ex[0], b[1] - along * ex[1], b[2] - along * ex[2]])?;
        let ez = cross(ex, ey);
        (dot(c, ez) > 0.0).then_some(Self {
            axes: [ex, ey, ez],
        })
    }

    fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        self.axes.map(|axis| dot(axis, v))
    }

    fn is_identity(&self) -> bool {
        self.axes == [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
    }
}

/// Restricted triclinic box with its origin at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LammpsBox {
    hi: [f64; 3],
    tilt: [f64; 3],
}

impl LammpsBox {
    fn from_cell(cell: &[[f64; 3]; 3], rotation: &LammpsRotation) -> Self {
        let [a, b, c] = cell.map(|vector| rotation.apply(vector));
        let hi = [a[0], b[1], c[2]];
        // Rotation round-off leaves tilts of a few ulps on orthogonal cells.
        let tolerance = 1e-12 * hi.iter().fold(0.0_f64, |max, value| max.max(value.abs()));
        let tilt = [b[0], c[0], c[1]].map(|value| {
            if value.abs() <= tolerance { 0.0 } else { value }
        });
        Self { hi, tilt }
    }

    fn is_triclinic(&self) -> bool {
        self.tilt.iter().any(|value| *value != 0.0)
    }

    /// `xlo xhi ylo yhi zlo zhi`, widened by the tilt factors for
    /// triclinic boxes as LAMMPS does for dump headers.
    fn bounding_box(&self) -> [f64; 6] {
        let [xy, xz, yz] = self.tilt;
        let xlo = 0.0_f64.min(xy).min(xz).min(xy + xz);
        let xhi = self.hi[0] + 0.0_f64.max(xy).max(xz).max(xy + xz);
        let ylo = 0.0_f64.min(yz);
        let yhi = self.hi[1] + 0.0_f64.max(yz);
        [xlo, xhi, ylo, yhi, 0.0, self.hi[2]]
    }
}

/// Pretty JSON followed by a single trailing newline.
pub fn write_json_artifact<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let mut rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    rendered.push('\n');
    fs::write(path, rendered)
}
