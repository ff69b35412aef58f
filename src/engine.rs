use crate::grid::Grid;
use crate::rules::B3S23;

/// Relative positions of the 8 cells around a cell
const NEIGHBORHOOD: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Count the live cells around `(row, col)`.
///
/// Edges are bounded: positions past the border of the grid are absent, so edge cells have 5
/// candidate neighbors and corner cells 3.
pub fn live_neighbors(grid: &Grid, row: usize, col: usize) -> u8 {
    let mut n = 0;

    for (dr, dc) in NEIGHBORHOOD {
        let (Some(r), Some(c)) = (row.checked_add_signed(dr), col.checked_add_signed(dc)) else {
            continue;
        };

        if grid.is_alive(r, c) {
            n += 1;
        }
    }

    n
}

/// Compute the next generation of `grid`. The input is left as is.
pub fn step(grid: &Grid) -> Grid {
    let mut next = Grid::clear(grid.height(), grid.width());
    step_into(grid, &mut next);

    next
}

/// Write the next generation of `current` into `next`.
///
/// `next` is reshaped first when its dimensions don't match, so it can be a reused buffer of any
/// size. Only `current` is ever read.
pub fn step_into(current: &Grid, next: &mut Grid) {
    let (height, width) = current.dimensions();

    if next.dimensions() != (height, width) {
        *next = Grid::clear(height, width);
    }

    let cells = next.cells_mut();

    for row in 0..height {
        for col in 0..width {
            let alive = current.is_alive(row, col);
            let neighbors = live_neighbors(current, row, col);

            cells[row * width + col] = B3S23.next(alive, neighbors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NEIGHBORHOOD;
    use super::live_neighbors;
    use super::step;
    use super::step_into;
    use crate::grid::Grid;

    #[test]
    fn corner_only_sees_three_neighbors() {
        let all = (0..3)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .collect::<Vec<_>>();
        let grid = Grid::create(3, 3, &all).unwrap();

        assert_eq!(live_neighbors(&grid, 0, 0), 3);
        assert_eq!(live_neighbors(&grid, 0, 1), 5);
        assert_eq!(live_neighbors(&grid, 2, 2), 3);
        assert_eq!(live_neighbors(&grid, 1, 1), 8);
    }

    #[test]
    fn corner_neighbors_are_the_in_bounds_ones() {
        let grid = Grid::create(4, 4, &[(0, 1), (1, 0), (1, 1), (3, 3), (0, 3)]).unwrap();

        assert_eq!(live_neighbors(&grid, 0, 0), 3);
    }

    #[test]
    fn every_neighborhood() {
        for mask in 0u16..256 {
            let seed = NEIGHBORHOOD
                .iter()
                .enumerate()
                .filter(|&(i, _)| mask & (1 << i) != 0)
                .map(|(_, &(dr, dc))| ((1 + dr) as usize, (1 + dc) as usize))
                .collect::<Vec<_>>();

            let n = mask.count_ones();

            for alive in [false, true] {
                let mut grid = Grid::create(3, 3, &seed).unwrap();
                if alive {
                    grid.toggle_in_place(1, 1).unwrap();
                }

                let expected = if alive { n == 2 || n == 3 } else { n == 3 };
                let next = step(&grid);

                assert_eq!(
                    next.get(1, 1),
                    Some(expected),
                    "mask {mask:08b}, alive {alive}"
                );
            }
        }
    }

    #[test]
    fn blinker_oscillates() {
        let horizontal = Grid::create(3, 3, &[(1, 0), (1, 1), (1, 2)]).unwrap();
        let vertical = Grid::create(3, 3, &[(0, 1), (1, 1), (2, 1)]).unwrap();

        assert_eq!(step(&horizontal), vertical);
        assert_eq!(step(&vertical), horizontal);
    }

    #[test]
    fn dead_grid_stays_dead() {
        let grid = Grid::clear(7, 5);

        assert_eq!(step(&grid), grid);
    }

    #[test]
    fn empty_grid_steps_to_empty() {
        let grid = Grid::clear(0, 0);

        assert_eq!(step(&grid), grid);
    }

    #[test]
    fn step_into_reshapes_buffer() {
        let grid = Grid::create(3, 3, &[(1, 0), (1, 1), (1, 2)]).unwrap();
        let mut buf = Grid::create(5, 2, &[(4, 1)]).unwrap();

        step_into(&grid, &mut buf);

        assert_eq!(buf, step(&grid));
    }

    #[test]
    fn step_into_overwrites_stale_cells() {
        let grid = Grid::clear(3, 3);
        let mut buf = Grid::create(3, 3, &[(0, 0), (2, 2)]).unwrap();

        step_into(&grid, &mut buf);

        assert_eq!(buf, grid);
    }
}
