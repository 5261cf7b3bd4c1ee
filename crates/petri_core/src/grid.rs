//! Fixed-size grid of cell values.
//!
//! Cells are stored row-major in a single `Vec`. Edge behavior is chosen
//! once at construction through [`Topology`] and applies uniformly to
//! [`Grid::get`], [`Grid::set`] and neighbor counting.

use crate::error::{CoreError, Result};
use petri_data::{Cell, Topology, BASE_ALIVE, DEAD};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Moore neighborhood offsets, excluding the center.
const MOORE: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
    topology: Topology,
}

impl Grid {
    /// Allocates an all-dead grid.
    pub fn new(width: u16, height: u16, topology: Topology) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self {
            cells: vec![DEAD; width as usize * height as usize],
            width,
            height,
            topology,
        })
    }

    /// Rebuilds a grid from a row-major buffer such as one returned by
    /// [`Grid::to_flat_buffer`].
    pub fn from_cells(width: u16, height: u16, topology: Topology, cells: Vec<Cell>) -> Result<Self> {
        let mut grid = Self::new(width, height, topology)?;
        if cells.len() != grid.cells.len() {
            return Err(CoreError::BufferLength {
                width,
                height,
                expected: grid.cells.len(),
                actual: cells.len(),
            });
        }
        grid.cells = cells;
        Ok(grid)
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width as usize + x
    }

    /// Maps arbitrary coordinates onto a cell index according to the topology.
    fn resolve(&self, x: i64, y: i64) -> Result<usize> {
        let (w, h) = (self.width as i64, self.height as i64);
        match self.topology {
            Topology::Toroidal => {
                Ok(self.index(x.rem_euclid(w) as usize, y.rem_euclid(h) as usize))
            }
            Topology::Bounded => {
                if x < 0 || x >= w || y < 0 || y >= h {
                    return Err(CoreError::OutOfRange {
                        x,
                        y,
                        width: self.width,
                        height: self.height,
                    });
                }
                Ok(self.index(x as usize, y as usize))
            }
        }
    }

    pub fn get(&self, x: i64, y: i64) -> Result<Cell> {
        let idx = self.resolve(x, y)?;
        Ok(self.cells[idx])
    }

    pub fn set(&mut self, x: i64, y: i64, value: Cell) -> Result<()> {
        let idx = self.resolve(x, y)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Counts nonzero cells in the Moore neighborhood of `(x, y)`.
    pub fn count_live_neighbors(&self, x: i64, y: i64) -> Result<u8> {
        let idx = self.resolve(x, y)?;
        let w = self.width as usize;
        Ok(self.live_neighbors_at(idx % w, idx / w))
    }

    /// Neighbor count for an in-grid position. Off-grid neighbors wrap on a
    /// torus and count as dead on a bounded grid.
    #[inline]
    pub(crate) fn live_neighbors_at(&self, x: usize, y: usize) -> u8 {
        let (w, h) = (self.width as i32, self.height as i32);
        let mut count = 0u8;
        for (dx, dy) in MOORE {
            let mut nx = x as i32 + dx;
            let mut ny = y as i32 + dy;
            match self.topology {
                Topology::Toroidal => {
                    nx = nx.rem_euclid(w);
                    ny = ny.rem_euclid(h);
                }
                Topology::Bounded => {
                    if nx < 0 || nx >= w || ny < 0 || ny >= h {
                        continue;
                    }
                }
            }
            if self.cells[self.index(nx as usize, ny as usize)] != DEAD {
                count += 1;
            }
        }
        count
    }

    /// Sets every cell alive with probability `density`, independently, from
    /// a ChaCha stream seeded with `seed`. The same arguments always produce
    /// the same grid. Non-finite densities are treated as zero.
    pub fn randomize(&mut self, seed: u64, density: f64) {
        let p = if density.is_finite() {
            density.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for cell in &mut self.cells {
            *cell = if rng.gen_bool(p) { BASE_ALIVE } else { DEAD };
        }
    }

    /// Number of living cells.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c != DEAD).count()
    }

    /// Row-major read-only view of the current cells.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Row-major owned snapshot, detached from the grid.
    #[must_use]
    pub fn to_flat_buffer(&self) -> Vec<Cell> {
        self.cells.clone()
    }

    /// Exchanges the cell storage with a fully computed buffer of the same
    /// length.
    pub(crate) fn swap_cells(&mut self, next: &mut Vec<Cell>) {
        debug_assert_eq!(next.len(), self.cells.len());
        std::mem::swap(&mut self.cells, next);
    }
}
