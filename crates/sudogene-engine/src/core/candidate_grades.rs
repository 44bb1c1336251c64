use std::collections::BTreeMap;

use crate::Board;

/// Per-cell candidate values and their heuristic scores.
///
/// Cell `(row, col)` maps each value that could currently be written there to its score.
/// Scores start as `NaN` and are filled in by whatever heuristic is driving the play.
/// Each cell's values are kept in ascending order; the greedy scan walks them from the
/// largest down.
///
/// The structure only reflects the board it was last [refreshed](Self::refresh) against:
/// entries exist only for empty cells, and only for values absent from the cell's row,
/// column, and box.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateGrades {
    size: usize,
    cells: Vec<BTreeMap<u8, f64>>,
}

impl CandidateGrades {
    /// Creates a structure for a board of side `size` with no candidates.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![BTreeMap::new(); size * size],
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Recomputes every cell's candidate set from `board`.
    ///
    /// Each empty cell is seeded with all values `1..=N` scored `NaN`, then every value
    /// already present in the cell's row, column, or box is struck out. Filled cells end
    /// up with no candidates.
    ///
    /// # Panics
    ///
    /// Panics if `board` does not have the same side as this structure.
    pub fn refresh(&mut self, board: &Board) {
        assert_eq!(board.size(), self.size, "board size mismatch");
        for (row, col) in board.positions() {
            let cell = &mut self.cells[row * self.size + col];
            cell.clear();
            if !board.is_empty_cell(row, col) {
                continue;
            }
            cell.extend((1..=board.max_value()).map(|value| (value, f64::NAN)));
            cell.retain(|&value, _| board.is_legal(row, col, value));
        }
    }

    /// Candidates of a cell with their current scores.
    #[must_use]
    pub fn candidates(&self, row: usize, col: usize) -> &BTreeMap<u8, f64> {
        &self.cells[row * self.size + col]
    }

    /// Number of candidate values left for a cell.
    #[must_use]
    pub fn option_count(&self, row: usize, col: usize) -> usize {
        self.candidates(row, col).len()
    }

    /// Stores the score of an existing candidate.
    ///
    /// Returns `false` (and stores nothing) if `value` is not a candidate of the cell.
    pub fn set_grade(&mut self, row: usize, col: usize, value: u8, score: f64) -> bool {
        match self.cells[row * self.size + col].get_mut(&value) {
            Some(grade) => {
                *grade = score;
                true
            }
            None => false,
        }
    }

    /// Drops every candidate of a cell.
    pub fn clear_cell(&mut self, row: usize, col: usize) {
        self.cells[row * self.size + col].clear();
    }

    /// Returns whether any cell still has a candidate, i.e. whether a forward move exists.
    #[must_use]
    pub fn has_candidates(&self) -> bool {
        self.cells.iter().any(|cell| !cell.is_empty())
    }

    /// Iterates over `(row, col, candidates)` in row-major order, skipping cells
    /// without candidates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &BTreeMap<u8, f64>)> {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(move |(i, cell)| (i / size, i % size, cell))
    }
}
