//! Square letter grid with write-once cells

use super::{
    GameError, Letter, Placed, PlayerId, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE,
};

/// An N×N board. Shape is fixed at construction; a cell only ever goes from
/// empty to occupied (strategy trials in [`super::strategy`] undo their own
/// writes through [`Grid::clear`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    /// Row-major cells
    cells: Vec<Option<Placed>>,
}

impl Grid {
    /// Create an empty grid, rejecting sizes outside 3..=15.
    pub fn new(size: usize) -> Result<Self, GameError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(GameError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: vec![None; size * size],
        })
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether (`row`, `col`) lies on the board. Takes signed coordinates so
    /// direction walks can step off the edge without wrapping.
    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Option<Placed>, GameError> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Letter at a signed coordinate, `None` when empty or off the board.
    pub fn letter_at(&self, row: isize, col: isize) -> Option<Letter> {
        if !self.in_bounds(row, col) {
            return None;
        }
        self.cells[row as usize * self.size + col as usize].map(|p| p.letter)
    }

    /// Occupy an empty cell.
    pub fn set(
        &mut self,
        row: usize,
        col: usize,
        letter: Letter,
        owner: PlayerId,
    ) -> Result<(), GameError> {
        let i = self.index(row, col)?;
        if self.cells[i].is_some() {
            return Err(GameError::CellOccupied { row, col });
        }
        self.cells[i] = Some(Placed { letter, owner });
        Ok(())
    }

    /// Empty a cell again. Only trial placements use this.
    pub(crate) fn clear(&mut self, row: usize, col: usize) {
        if let Ok(i) = self.index(row, col) {
            self.cells[i] = None;
        }
    }

    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Ok(None))
    }

    /// True when every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| (i / self.size, i % self.size))
    }

    /// Letters only, one `Vec` per row.
    pub fn letters(&self) -> Vec<Vec<Option<Letter>>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|cell| cell.map(|p| p.letter)).collect())
            .collect()
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, GameError> {
        if row >= self.size || col >= self.size {
            return Err(GameError::OutOfBounds { row, col });
        }
        Ok(row * self.size + col)
    }
}

impl Default for Grid {
    /// Empty 7×7 grid.
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            cells: vec![None; DEFAULT_BOARD_SIZE * DEFAULT_BOARD_SIZE],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rejects_sizes_outside_range() {
        assert_eq!(Grid::new(2), Err(GameError::InvalidSize(2)));
        assert_eq!(Grid::new(16), Err(GameError::InvalidSize(16)));
        assert_eq!(Grid::new(0), Err(GameError::InvalidSize(0)));
        assert!(Grid::new(3).is_ok());
        assert!(Grid::new(15).is_ok());
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = Grid::new(3).unwrap();
        assert_eq!(grid.get(3, 0), Err(GameError::OutOfBounds { row: 3, col: 0 }));
        assert_eq!(grid.get(0, 7), Err(GameError::OutOfBounds { row: 0, col: 7 }));
        assert_eq!(grid.get(2, 2), Ok(None));
    }

    #[test]
    fn test_set_is_write_once() {
        let mut grid = Grid::new(3).unwrap();
        grid.set(1, 1, Letter::S, PlayerId::PlayerOne).unwrap();
        assert_eq!(
            grid.get(1, 1).unwrap(),
            Some(Placed {
                letter: Letter::S,
                owner: PlayerId::PlayerOne
            })
        );

        let err = grid.set(1, 1, Letter::O, PlayerId::PlayerTwo);
        assert_eq!(err, Err(GameError::CellOccupied { row: 1, col: 1 }));
        // Original letter survives
        assert_eq!(grid.letter_at(1, 1), Some(Letter::S));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut grid = Grid::new(4).unwrap();
        assert_eq!(
            grid.set(4, 4, Letter::S, PlayerId::PlayerOne),
            Err(GameError::OutOfBounds { row: 4, col: 4 })
        );
    }

    #[test]
    fn test_letter_at_off_board_is_none() {
        let grid = Grid::new(3).unwrap();
        assert_eq!(grid.letter_at(-1, 0), None);
        assert_eq!(grid.letter_at(0, 3), None);
    }

    #[test]
    fn test_is_full() {
        let mut grid = Grid::new(3).unwrap();
        for r in 0..3 {
            for c in 0..3 {
                assert!(!grid.is_full());
                grid.set(r, c, Letter::O, PlayerId::PlayerOne).unwrap();
            }
        }
        assert!(grid.is_full());
        assert_eq!(grid.empty_cells().count(), 0);
    }

    #[test]
    fn test_empty_cells_row_major() {
        let mut grid = Grid::new(3).unwrap();
        grid.set(0, 0, Letter::S, PlayerId::PlayerOne).unwrap();
        grid.set(1, 2, Letter::S, PlayerId::PlayerOne).unwrap();
        let empty: Vec<_> = grid.empty_cells().collect();
        assert_eq!(empty[0], (0, 1));
        assert_eq!(empty[1], (0, 2));
        assert_eq!(empty[2], (1, 0));
        assert!(!empty.contains(&(1, 2)));
        assert_eq!(empty.len(), 7);
    }

    #[test]
    fn test_letters_snapshot() {
        let mut grid = Grid::new(3).unwrap();
        grid.set(2, 1, Letter::O, PlayerId::PlayerTwo).unwrap();
        let letters = grid.letters();
        assert_eq!(letters.len(), 3);
        assert_eq!(letters[2][1], Some(Letter::O));
        assert_eq!(letters[0][0], None);
    }

    #[test]
    fn test_default_grid() {
        let grid = Grid::default();
        assert_eq!(grid.size(), DEFAULT_BOARD_SIZE);
        assert_eq!(grid, Grid::new(DEFAULT_BOARD_SIZE).unwrap());
    }

    proptest! {
        #[test]
        fn prop_new_grid_is_empty_square(size in MIN_BOARD_SIZE..=MAX_BOARD_SIZE) {
            let grid = Grid::new(size).unwrap();
            prop_assert_eq!(grid.size(), size);
            prop_assert_eq!(grid.empty_cells().count(), size * size);
            prop_assert!(!grid.is_full());
            let letters = grid.letters();
            prop_assert_eq!(letters.len(), size);
            prop_assert!(letters.iter().all(|row| row.len() == size && row.iter().all(Option::is_none)));
        }
    }
}
