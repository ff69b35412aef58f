use std::fmt;

use thiserror::Error;

/// A `(row, col)` position on a [`Grid`].
pub type Coord = (usize, usize);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Cell ({row}, {col}) is outside of a {height}x{width} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("Seed cell ({row}, {col}) does not fit in a {height}x{width} grid")]
    InvalidSeed {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("A {height}x{width} grid has more cells than fit in memory")]
    TooLarge { height: usize, width: usize },
}

/// A rectangular board of cells, indexed `[row][col]`.
///
/// A `Grid` is a plain value. Every operation that changes cells either takes `&mut self`
/// explicitly or returns a fresh `Grid`, so a caller holding an older grid can keep comparing
/// against it.
///
/// A grid with `height == 0` or `width == 0` is valid and simply has no cells.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    height: usize,
    width: usize,

    /// Liveness flags in row-major order, `cells[row * width + col]`
    cells: Vec<bool>,
}

impl Grid {
    /// Allocate a `height x width` grid of dead cells, then bring every cell in `seed` to life.
    pub fn create(height: usize, width: usize, seed: &[Coord]) -> Result<Self, GridError> {
        let mut grid = Self::dead(height, width, cell_count(height, width)?);

        for &(row, col) in seed {
            if row >= height || col >= width {
                return Err(GridError::InvalidSeed {
                    row,
                    col,
                    height,
                    width,
                });
            }

            let i = grid.index(row, col);
            grid.cells[i] = true;
        }

        Ok(grid)
    }

    /// A fresh grid of dead cells.
    ///
    /// # Panics
    ///
    /// Panics when `height * width` overflows `usize`. Use [`Grid::create`] with an empty seed to
    /// get a [`GridError::TooLarge`] instead.
    pub fn clear(height: usize, width: usize) -> Self {
        match cell_count(height, width) {
            Ok(len) => Self::dead(height, width, len),
            Err(err) => panic!("{err}"),
        }
    }

    /// A fresh grid of dead cells with the new dimensions. Live cells of any previous grid are
    /// not carried over.
    ///
    /// # Panics
    ///
    /// Same as [`Grid::clear`].
    pub fn resize(height: usize, width: usize) -> Self {
        Self::clear(height, width)
    }

    /// Returns a copy of this grid with the cell at `(row, col)` flipped. `self` is untouched.
    pub fn toggle(&self, row: usize, col: usize) -> Result<Self, GridError> {
        let mut grid = self.clone();
        grid.toggle_in_place(row, col)?;

        Ok(grid)
    }

    /// Flip the cell at `(row, col)`.
    pub fn toggle_in_place(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        let i = self.checked_index(row, col)?;
        self.cells[i] = !self.cells[i];

        Ok(())
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Liveness of `(row, col)`, or `None` when the position is off the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.checked_index(row, col).ok().map(|i| self.cells[i])
    }

    /// Like [`Grid::get`], but positions off the grid read as dead.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.get(row, col).unwrap_or(false)
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Iterate over the positions of live cells in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    fn dead(height: usize, width: usize, len: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![false; len],
        }
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    fn checked_index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row >= self.height || col >= self.width {
            return Err(GridError::OutOfBounds {
                row,
                col,
                height: self.height,
                width: self.width,
            });
        }

        Ok(self.index(row, col))
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }
}

/// One line per row, `#` for a live cell and `.` for a dead one. No trailing newline.
fn cell_count(height: usize, width: usize) -> Result<usize, GridError> {
    height
        .checked_mul(width)
        .ok_or(GridError::TooLarge { height, width })
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            if row > 0 {
                f.write_str("\n")?;
            }

            for col in 0..self.width {
                let c = if self.cells[self.index(row, col)] { '#' } else { '.' };
                write!(f, "{c}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.height, self.width)?;
        write!(f, "{self}")
    }
}
