//! Computer opponent
//!
//! Priority heuristic, first match wins:
//! 1. a cell/letter that scores for the computer right now
//! 2. a cell/letter that would score for the opponent (occupied first)
//! 3. a random empty cell, 'S' 60% of the time
//!
//! Scans run row-major and try 'S' before 'O'. The block step only reuses the
//! scoring test against the opponent; it never checks that the chosen letter
//! actually denies them.

use rand::Rng;

use super::{count_new_sos, Grid, Letter, Move, PlayerId};

/// Chance of writing 'S' on a random fallback move
const FALLBACK_S_PROBABILITY: f64 = 0.6;

/// Pick the computer's move, or `None` when the grid is full.
///
/// `grid` is never modified: trials run on a scratch copy and each one is
/// reverted before the next.
pub fn choose_move<R: Rng>(grid: &Grid, me: PlayerId, rng: &mut R) -> Option<Move> {
    let mut scratch = grid.clone();

    scoring_move(&mut scratch, me)
        .or_else(|| scoring_move(&mut scratch, me.opponent()))
        .or_else(|| random_move(grid, rng))
}

/// First empty cell (row-major) where `player` would complete an SOS.
fn scoring_move(grid: &mut Grid, player: PlayerId) -> Option<Move> {
    let empty: Vec<_> = grid.empty_cells().collect();
    for (row, col) in empty {
        for letter in [Letter::S, Letter::O] {
            let trial = Trial::place(grid, row, col, letter, player);
            if trial.scores() {
                return Some(Move::new(row, col, letter));
            }
        }
    }
    None
}

fn random_move<R: Rng>(grid: &Grid, rng: &mut R) -> Option<Move> {
    let empty: Vec<_> = grid.empty_cells().collect();
    if empty.is_empty() {
        return None;
    }
    let (row, col) = empty[rng.random_range(0..empty.len())];
    let letter = if rng.random_bool(FALLBACK_S_PROBABILITY) {
        Letter::S
    } else {
        Letter::O
    };
    Some(Move::new(row, col, letter))
}

/// A provisional placement that is undone when dropped, including on early
/// return.
struct Trial<'a> {
    grid: &'a mut Grid,
    row: usize,
    col: usize,
    placed: bool,
}

impl<'a> Trial<'a> {
    fn place(grid: &'a mut Grid, row: usize, col: usize, letter: Letter, player: PlayerId) -> Self {
        let placed = grid.set(row, col, letter, player).is_ok();
        Self {
            grid,
            row,
            col,
            placed,
        }
    }

    fn scores(&self) -> bool {
        self.placed && count_new_sos(self.grid, self.row, self.col) > 0
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        if self.placed {
            self.grid.clear(self.row, self.col);
        }
    }
}
