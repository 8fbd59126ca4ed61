//! Grid-jitter spawn placement ("blue noise" cells)
//!
//! The square arena is split into a grid of equal cells. Each entity gets its
//! own cell, picked at random without replacement, and a random spot inside
//! that cell's padded interior. Entities whose footprint fits in the padded
//! interior can never overlap, so placements are not checked afterwards.
//!
//! This approximates blue noise; it is not a Poisson-disk sampler.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::shape::Point;
use crate::error::ConfigError;

/// One square of the spawn grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnCell {
    /// Top-left corner
    pub origin: Point,
    pub size: f32,
}

/// Cell layout for a square spawn area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnGrid {
    pub area_side: f32,
    pub cells_per_axis: usize,
    pub cell_width: f32,
    /// Margin kept clear on every side of a cell
    pub padding: f32,
    /// Side of the region spawn points are drawn from
    pub padded_width: f32,
}

impl SpawnGrid {
    /// Lay out `floor(sqrt(num_cells))²` cells over the area
    ///
    /// Non-square `num_cells` round down. Sides that do not divide evenly give
    /// fractional cell widths.
    pub fn new(area_side: f32, num_cells: usize) -> Result<Self, ConfigError> {
        if !(area_side.is_finite() && area_side > 0.0) {
            return Err(ConfigError::InvalidArea(area_side));
        }
        let cells_per_axis = (num_cells as f64).sqrt().floor() as usize;
        if cells_per_axis == 0 {
            return Err(ConfigError::NoCells);
        }

        let cell_width = area_side / cells_per_axis as f32;
        let padding = cell_width / 4.0;
        let padded_width = cell_width - 2.0 * padding;

        Ok(Self {
            area_side,
            cells_per_axis,
            cell_width,
            padding,
            padded_width,
        })
    }

    /// Number of usable cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells_per_axis * self.cells_per_axis
    }

    /// Cell at a row-major index
    pub fn cell(&self, index: usize) -> SpawnCell {
        let col = index % self.cells_per_axis;
        let row = index / self.cells_per_axis;
        SpawnCell {
            origin: Vec2::new(col as f32, row as f32) * self.cell_width,
            size: self.cell_width,
        }
    }

    /// All cells, row-major
    pub fn cells(&self) -> impl Iterator<Item = SpawnCell> + '_ {
        (0..self.cell_count()).map(|i| self.cell(i))
    }

    /// Reject footprints that could reach past their cell's padding
    pub fn check_footprints(&self, footprints: &[f32]) -> Result<(), ConfigError> {
        if footprints.len() > self.cell_count() {
            return Err(ConfigError::TooManyEntities {
                entities: footprints.len(),
                cells: self.cell_count(),
            });
        }
        for (index, &footprint) in footprints.iter().enumerate() {
            if !(footprint.is_finite() && footprint > 0.0) {
                return Err(ConfigError::DegenerateShape {
                    what: "footprint",
                    value: footprint,
                });
            }
            if footprint > self.padded_width {
                return Err(ConfigError::FootprintTooLarge {
                    index,
                    footprint,
                    padded_width: self.padded_width,
                });
            }
        }
        Ok(())
    }

    /// Uniform point in the padded interior of `cell`
    pub fn jitter<R: Rng + ?Sized>(&self, cell: &SpawnCell, rng: &mut R) -> Point {
        let offset = Vec2::new(
            rng.random::<f32>() * self.padded_width,
            rng.random::<f32>() * self.padded_width,
        );
        cell.origin + Vec2::splat(self.padding) + offset
    }
}

/// Place one center point per footprint, in input order
///
/// `footprints` are diameters (circles) or the larger edge (boxes). Fails
/// without placing anything if the grid cannot hold every entity.
pub fn allocate_spawns<R: Rng + ?Sized>(
    area_side: f32,
    footprints: &[f32],
    num_cells: usize,
    rng: &mut R,
) -> Result<Vec<Point>, ConfigError> {
    let grid = SpawnGrid::new(area_side, num_cells)?;
    grid.check_footprints(footprints)?;

    let mut indices: Vec<usize> = (0..grid.cell_count()).collect();
    let (chosen, _) = indices.partial_shuffle(&mut *rng, footprints.len());

    log::debug!(
        "Spawning {} entities on {}x{} grid (cell={}, padded={}): cells {:?}",
        footprints.len(),
        grid.cells_per_axis,
        grid.cells_per_axis,
        grid.cell_width,
        grid.padded_width,
        chosen
    );

    Ok(chosen
        .iter()
        .map(|&index| grid.jitter(&grid.cell(index), &mut *rng))
        .collect())
}

/// [`allocate_spawns`] with a PCG generator seeded from `seed`
pub fn allocate_spawns_seeded(
    area_side: f32,
    footprints: &[f32],
    num_cells: usize,
    seed: u64,
) -> Result<Vec<Point>, ConfigError> {
    let mut rng = Pcg32::seed_from_u64(seed);
    allocate_spawns(area_side, footprints, num_cells, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Row-major cell index containing `p`
    fn cell_of(grid: &SpawnGrid, p: Point) -> (usize, usize) {
        (
            (p.x / grid.cell_width).floor() as usize,
            (p.y / grid.cell_width).floor() as usize,
        )
    }

    #[test]
    fn test_grid_layout() {
        let grid = SpawnGrid::new(300.0, 4).unwrap();
        assert_eq!(grid.cells_per_axis, 2);
        assert_eq!(grid.cell_width, 150.0);
        assert_eq!(grid.padding, 37.5);
        assert_eq!(grid.padded_width, 75.0);

        let origins: Vec<Point> = grid.cells().map(|c| c.origin).collect();
        assert_eq!(
            origins,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(150.0, 0.0),
                Vec2::new(0.0, 150.0),
                Vec2::new(150.0, 150.0),
            ]
        );
    }

    #[test]
    fn test_non_square_cell_count_rounds_down() {
        let grid = SpawnGrid::new(640.0, 10).unwrap();
        assert_eq!(grid.cells_per_axis, 3);
        assert_eq!(grid.cell_count(), 9);
        assert!((grid.cell_width - 213.333_33).abs() < 0.001);

        // 9 usable cells, so a 10th entity does not fit
        let result = allocate_spawns_seeded(640.0, &[10.0; 10], 10, 1);
        assert_eq!(
            result,
            Err(ConfigError::TooManyEntities {
                entities: 10,
                cells: 9
            })
        );
    }

    #[test]
    fn test_allocate_four_in_four() {
        let spawns = allocate_spawns_seeded(300.0, &[10.0; 4], 4, 42).unwrap();
        let grid = SpawnGrid::new(300.0, 4).unwrap();
        assert_eq!(spawns.len(), 4);

        for p in &spawns {
            assert!(p.x >= 0.0 && p.x <= 300.0);
            assert!(p.y >= 0.0 && p.y <= 300.0);
        }

        for i in 0..spawns.len() {
            for j in (i + 1)..spawns.len() {
                let (a, b) = (spawns[i], spawns[j]);
                assert_ne!(cell_of(&grid, a), cell_of(&grid, b));
                // Jitter only guarantees 2 * padding between cells, not cell_width - footprint
                let gap = (a.x - b.x).abs().max((a.y - b.y).abs());
                assert!(gap >= 2.0 * grid.padding - 0.001);
                assert!(gap >= 10.0);
            }
        }
    }

    #[test]
    fn test_points_stay_in_padded_interior() {
        let grid = SpawnGrid::new(640.0, 9).unwrap();
        let footprints = [64.0, 32.0, 96.0, 16.0, 16.0];
        let spawns = allocate_spawns_seeded(640.0, &footprints, 9, 7).unwrap();

        for (p, footprint) in spawns.iter().zip(footprints) {
            let (col, row) = cell_of(&grid, *p);
            let origin = Vec2::new(col as f32, row as f32) * grid.cell_width;
            let half = footprint / 2.0;
            // Whole footprint stays inside its own cell
            assert!(p.x - half >= origin.x - 0.001);
            assert!(p.y - half >= origin.y - 0.001);
            assert!(p.x + half <= origin.x + grid.cell_width + 0.001);
            assert!(p.y + half <= origin.y + grid.cell_width + 0.001);
        }
    }

    #[test]
    fn test_seed_determinism() {
        let footprints = [10.0; 6];
        let a = allocate_spawns_seeded(600.0, &footprints, 16, 1234).unwrap();
        let b = allocate_spawns_seeded(600.0, &footprints, 16, 1234).unwrap();
        assert_eq!(a, b);

        let c = allocate_spawns_seeded(600.0, &footprints, 16, 4321).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_injected_rng() {
        let mut rng1 = Pcg32::seed_from_u64(99);
        let mut rng2 = Pcg32::seed_from_u64(99);
        let a = allocate_spawns(300.0, &[20.0, 20.0], 4, &mut rng1).unwrap();
        let b = allocate_spawns(300.0, &[20.0, 20.0], 4, &mut rng2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_over_subscription() {
        let result = allocate_spawns_seeded(100.0, &[5.0; 5], 4, 0);
        assert_eq!(
            result,
            Err(ConfigError::TooManyEntities {
                entities: 5,
                cells: 4
            })
        );
    }

    #[test]
    fn test_footprint_too_large() {
        // 300 / 2 = 150 cells, 75 padded
        let result = allocate_spawns_seeded(300.0, &[10.0, 80.0], 4, 0);
        assert_eq!(
            result,
            Err(ConfigError::FootprintTooLarge {
                index: 1,
                footprint: 80.0,
                padded_width: 75.0
            })
        );
        assert!(allocate_spawns_seeded(300.0, &[75.0], 4, 0).is_ok());
    }

    #[test]
    fn test_malformed_inputs() {
        assert_eq!(SpawnGrid::new(0.0, 4), Err(ConfigError::InvalidArea(0.0)));
        assert!(matches!(
            SpawnGrid::new(f32::NAN, 4),
            Err(ConfigError::InvalidArea(_))
        ));
        assert_eq!(SpawnGrid::new(100.0, 0), Err(ConfigError::NoCells));
        assert!(matches!(
            allocate_spawns_seeded(100.0, &[0.0], 4, 0),
            Err(ConfigError::DegenerateShape { .. })
        ));
    }

    #[test]
    fn test_empty_request() {
        let spawns = allocate_spawns_seeded(100.0, &[], 4, 0).unwrap();
        assert!(spawns.is_empty());
    }
}
