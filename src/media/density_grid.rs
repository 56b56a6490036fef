// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::math::constants::{Float, Vector3f};
use std::fs;
use std::path::Path;

/// Scalar density samples on an `nx * ny * nz` lattice, x fastest.
/// Lookups outside the lattice read as zero density.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    nx: usize,
    ny: usize,
    nz: usize,
    data: Vec<Float>,
    max_density: Float,
}

impl DensityGrid {
    pub fn new(nx: usize, ny: usize, nz: usize, data: Vec<Float>) -> Result<Self> {
        let expected = checked_len(nx, ny, nz)
            .ok_or_else(|| RenderError::InvalidMedium(format!("grid dimensions {}x{}x{} are invalid", nx, ny, nz)))?;
        if data.len() != expected {
            return Err(RenderError::InvalidMedium(
                format!("grid {}x{}x{} needs {} values, got {}", nx, ny, nz, expected, data.len())));
        }
        if let Some(bad) = data.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(RenderError::InvalidMedium(format!("density value {} is not a non-negative number", bad)));
        }

        let max_density = data.iter().cloned().fold(0.0, Float::max);
        Ok(Self { nx, ny, nz, data, max_density })
    }

    /// Reads exactly `nx * ny * nz` whitespace-separated ASCII floats.
    /// Short or malformed files fail; trailing values are ignored with a warning.
    pub fn from_file<P: AsRef<Path>>(path: P, nx: usize, ny: usize, nz: usize) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading density grid {}x{}x{} from: {}.", nx, ny, nz, path.display());
        let text = fs::read_to_string(path).map_err(|e| RenderError::load(path, e.to_string()))?;
        let grid = Self::parse(&text, nx, ny, nz).map_err(|reason| RenderError::load(path, reason))?;
        log::info!("Density grid loaded, max density = {}.", grid.max_density);
        Ok(grid)
    }

    fn parse(text: &str, nx: usize, ny: usize, nz: usize) -> std::result::Result<Self, String> {
        let expected = checked_len(nx, ny, nz)
            .ok_or_else(|| format!("grid dimensions {}x{}x{} are invalid", nx, ny, nz))?;

        let mut tokens = text.split_whitespace();
        let mut data = Vec::with_capacity(expected);
        for idx in 0..expected {
            let token = tokens
                .next()
                .ok_or_else(|| format!("expected {} density values, found {}", expected, idx))?;
            let value = token
                .parse::<Float>()
                .map_err(|e| format!("value #{} ({:?}): {}", idx, token, e))?;
            data.push(value);
        }
        let trailing = tokens.count();
        if trailing > 0 {
            log::warn!("Ignoring {} trailing values after {} density samples.", trailing, expected);
        }

        Self::new(nx, ny, nz, data).map_err(|e| e.to_string())
    }

    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    pub fn max_density(&self) -> Float {
        self.max_density
    }

    pub fn data(&self) -> &[Float] {
        &self.data
    }

    /// Sample at integer lattice coordinates, zero outside the grid.
    pub fn value(&self, x: isize, y: isize, z: isize) -> Float {
        if x < 0 || y < 0 || z < 0 {
            return 0.0;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        if x >= self.nx || y >= self.ny || z >= self.nz {
            return 0.0;
        }
        self.data[(z * self.ny + y) * self.nx + x]
    }

    /// Trilinear reconstruction at `p` given in grid-local `[0, 1]^3`
    /// coordinates, with samples located at cell centres.
    pub fn lookup(&self, p: &Vector3f) -> Float {
        let ps = Vector3f::new(
            p.x * self.nx as Float - 0.5,
            p.y * self.ny as Float - 0.5,
            p.z * self.nz as Float - 0.5,
        );
        // Every neighbour of a point outside this range lies off the lattice.
        let (nx, ny, nz) = (self.nx as Float, self.ny as Float, self.nz as Float);
        if !(ps.x >= -1.0 && ps.x < nx && ps.y >= -1.0 && ps.y < ny && ps.z >= -1.0 && ps.z < nz) {
            return 0.0;
        }

        let fx = ps.x.floor();
        let fy = ps.y.floor();
        let fz = ps.z.floor();
        let (tx, ty, tz) = (ps.x - fx, ps.y - fy, ps.z - fz);
        let (x, y, z) = (fx as isize, fy as isize, fz as isize);

        let d00 = lerp(self.value(x, y, z), self.value(x + 1, y, z), tx);
        let d10 = lerp(self.value(x, y + 1, z), self.value(x + 1, y + 1, z), tx);
        let d01 = lerp(self.value(x, y, z + 1), self.value(x + 1, y, z + 1), tx);
        let d11 = lerp(self.value(x, y + 1, z + 1), self.value(x + 1, y + 1, z + 1), tx);
        let d0 = lerp(d00, d10, ty);
        let d1 = lerp(d01, d11, ty);
        lerp(d0, d1, tz)
    }
}

fn lerp(a: Float, b: Float, t: Float) -> Float {
    a * (1.0 - t) + b * t
}

fn checked_len(nx: usize, ny: usize, nz: usize) -> Option<usize> {
    if nx == 0 || ny == 0 || nz == 0 {
        return None;
    }
    nx.checked_mul(ny).and_then(|v| v.checked_mul(nz))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Float, b: Float) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn density_grid_parses_ascii() {
        let grid = DensityGrid::parse("0 1\n2 3\n4 5 6\n7", 2, 2, 2).expect("parse");
        assert_eq!(grid.value(1, 0, 0), 1.0);
        assert_eq!(grid.value(0, 1, 0), 2.0);
        assert_eq!(grid.value(0, 0, 1), 4.0);
        assert_eq!(grid.value(1, 1, 1), 7.0);
        assert_eq!(grid.value(2, 0, 0), 0.0);
        assert_eq!(grid.value(-1, 0, 0), 0.0);
        assert_eq!(grid.max_density(), 7.0);
    }

    #[test]
    fn density_grid_rejects_short_and_malformed() {
        assert!(DensityGrid::parse("1 2 3", 2, 2, 1).is_err());
        assert!(DensityGrid::parse("1 2 x 4", 2, 2, 1).is_err());
        assert!(DensityGrid::parse("1 2 -3 4", 2, 2, 1).is_err());
        assert!(DensityGrid::parse("1 2 3 4 5", 2, 2, 1).is_ok());
    }

    #[test]
    fn density_grid_trilinear_lookup() {
        let grid = DensityGrid::new(2, 2, 2, (0..8).map(|v| v as Float).collect()).expect("grid");
        // Cell centres reproduce the stored samples.
        assert!(approx(grid.lookup(&Vector3f::new(0.25, 0.25, 0.25)), 0.0));
        assert!(approx(grid.lookup(&Vector3f::new(0.75, 0.75, 0.75)), 7.0));
        assert!(approx(grid.lookup(&Vector3f::new(0.5, 0.5, 0.5)), 3.5));
        // Far outside the lattice everything is zero.
        assert!(approx(grid.lookup(&Vector3f::new(3.0, 0.5, 0.5)), 0.0));
    }

    #[test]
    fn density_grid_lookup_far_from_lattice() {
        let grid = DensityGrid::new(4, 4, 4, vec![1.0; 64]).expect("grid");
        assert_eq!(grid.lookup(&Vector3f::new(1.0e20, 0.5, 0.5)), 0.0);
        assert_eq!(grid.lookup(&Vector3f::new(0.5, -1.0e20, 0.5)), 0.0);
        assert_eq!(grid.lookup(&Vector3f::new(0.5, 0.5, Float::MAX)), 0.0);
        assert_eq!(grid.lookup(&Vector3f::new(Float::NAN, 0.5, 0.5)), 0.0);
        // Just past the last cell centre the edge samples still blend in.
        assert!(grid.lookup(&Vector3f::new(1.0, 0.5, 0.5)) > 0.0);
    }

    #[test]
    fn density_grid_from_file() {
        let mut path = std::env::temp_dir();
        path.push("macaron_density_grid_from_file.txt");
        std::fs::write(&path, "0.5 0.5\n0.5 0.5\n").expect("write density");
        let grid = DensityGrid::from_file(&path, 2, 2, 1).expect("load density");
        assert_eq!(grid.dimensions(), (2, 2, 1));
        assert_eq!(grid.max_density(), 0.5);

        let mut missing = std::env::temp_dir();
        missing.push("macaron_density_grid_missing.txt");
        let _ = std::fs::remove_file(&missing);
        match DensityGrid::from_file(&missing, 1, 1, 1) {
            Err(RenderError::Load { .. }) => {}
            other => panic!("expected load error, got {:?}", other),
        }
    }
}
