//! SOS detection around a just-placed letter
//!
//! Only sequences passing through the placed cell are counted, so a call
//! credits exactly what the last move completed:
//! - an 'O' is the middle of a line: check both neighbours on each of 4 axes
//! - an 'S' is an end of a line: walk outward O-then-S in each of 8 directions

use super::{Grid, Letter};

/// Axes through a middle 'O' (horizontal, vertical, both diagonals).
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Outward directions from an end 'S'.
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
];

/// Count SOS sequences that include (`row`, `col`). Empty or off-board
/// origins count zero.
pub fn count_new_sos(grid: &Grid, row: usize, col: usize) -> usize {
    let (r, c) = (row as isize, col as isize);
    match grid.letter_at(r, c) {
        Some(Letter::O) => AXES
            .iter()
            .filter(|(dr, dc)| {
                grid.letter_at(r - dr, c - dc) == Some(Letter::S)
                    && grid.letter_at(r + dr, c + dc) == Some(Letter::S)
            })
            .count(),
        Some(Letter::S) => DIRECTIONS
            .iter()
            .filter(|(dr, dc)| {
                grid.letter_at(r + dr, c + dc) == Some(Letter::O)
                    && grid.letter_at(r + 2 * dr, c + 2 * dc) == Some(Letter::S)
            })
            .count(),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{PlayerId, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
    use proptest::prelude::*;

    fn place(grid: &mut Grid, row: usize, col: usize, letter: Letter) {
        grid.set(row, col, letter, PlayerId::PlayerOne).unwrap();
    }

    #[test]
    fn test_o_between_vertical_s() {
        let mut grid = Grid::new(5).unwrap();
        place(&mut grid, 1, 2, Letter::S);
        place(&mut grid, 3, 2, Letter::S);
        place(&mut grid, 2, 2, Letter::O);
        assert_eq!(count_new_sos(&grid, 2, 2), 1);
    }

    #[test]
    fn test_s_completes_outward_line() {
        let mut grid = Grid::new(5).unwrap();
        place(&mut grid, 0, 1, Letter::O);
        place(&mut grid, 0, 2, Letter::S);
        place(&mut grid, 0, 0, Letter::S);
        assert_eq!(count_new_sos(&grid, 0, 0), 1);
        // The far end sees the same line inward
        assert_eq!(count_new_sos(&grid, 0, 2), 1);
    }

    #[test]
    fn test_o_scores_all_four_axes() {
        let mut grid = Grid::new(3).unwrap();
        for (r, c) in [(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
            place(&mut grid, r, c, Letter::S);
        }
        place(&mut grid, 1, 1, Letter::O);
        assert_eq!(count_new_sos(&grid, 1, 1), 4);
    }

    #[test]
    fn test_s_scores_all_eight_directions() {
        let mut grid = Grid::new(5).unwrap();
        for (dr, dc) in DIRECTIONS {
            let o = ((2 + dr) as usize, (2 + dc) as usize);
            let s = ((2 + 2 * dr) as usize, (2 + 2 * dc) as usize);
            place(&mut grid, o.0, o.1, Letter::O);
            place(&mut grid, s.0, s.1, Letter::S);
        }
        place(&mut grid, 2, 2, Letter::S);
        assert_eq!(count_new_sos(&grid, 2, 2), 8);
    }

    #[test]
    fn test_edges_short_circuit() {
        let mut grid = Grid::new(3).unwrap();
        place(&mut grid, 0, 0, Letter::O);
        assert_eq!(count_new_sos(&grid, 0, 0), 0);
        place(&mut grid, 2, 2, Letter::S);
        assert_eq!(count_new_sos(&grid, 2, 2), 0);
    }

    #[test]
    fn test_empty_cell_counts_zero() {
        let grid = Grid::new(3).unwrap();
        assert_eq!(count_new_sos(&grid, 1, 1), 0);
        assert_eq!(count_new_sos(&grid, 9, 9), 0);
    }

    #[test]
    fn test_wrong_letters_do_not_match() {
        let mut grid = Grid::new(3).unwrap();
        place(&mut grid, 0, 0, Letter::S);
        place(&mut grid, 0, 1, Letter::S);
        place(&mut grid, 0, 2, Letter::S);
        assert_eq!(count_new_sos(&grid, 0, 0), 0);
        assert_eq!(count_new_sos(&grid, 0, 1), 0);
    }

    #[test]
    fn test_only_lines_through_origin_count() {
        let mut grid = Grid::new(5).unwrap();
        // A completed line elsewhere on the board
        place(&mut grid, 4, 0, Letter::S);
        place(&mut grid, 4, 1, Letter::O);
        place(&mut grid, 4, 2, Letter::S);
        place(&mut grid, 0, 4, Letter::S);
        assert_eq!(count_new_sos(&grid, 0, 4), 0);
    }

    proptest! {
        #[test]
        fn prop_count_is_bounded(
            size in MIN_BOARD_SIZE..=MAX_BOARD_SIZE,
            fill in proptest::collection::vec(proptest::option::of(any::<bool>()), 225),
        ) {
            let mut grid = Grid::new(size).unwrap();
            for r in 0..size {
                for c in 0..size {
                    if let Some(is_s) = fill[r * size + c] {
                        let letter = if is_s { Letter::S } else { Letter::O };
                        grid.set(r, c, letter, PlayerId::PlayerOne).unwrap();
                    }
                }
            }
            for r in 0..size {
                for c in 0..size {
                    let n = count_new_sos(&grid, r, c);
                    match grid.letter_at(r as isize, c as isize) {
                        Some(Letter::O) => prop_assert!(n <= 4),
                        Some(Letter::S) => prop_assert!(n <= 8),
                        None => prop_assert_eq!(n, 0),
                    }
                }
            }
        }
    }
}
