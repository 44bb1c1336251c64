use std::fmt;

use serde::{Deserialize, Serialize};

use crate::BoardError;

/// Value stored in an empty cell.
pub const EMPTY: u8 = 0;

/// Sudoku board of side `N`, divided into `n×n` boxes where `n = √N`.
///
/// Cells hold `0` when empty and `1..=N` when filled. The board only checks its shape
/// and value range; it does not require the givens to be consistent.
///
/// # Example
///
/// ```
/// use sudogene_engine::{Board, BoardError};
///
/// let board = Board::from_rows(&[[0, 2, 0, 4], [3, 0, 1, 0], [0, 1, 0, 3], [4, 0, 2, 0]])?;
/// assert_eq!(board.size(), 4);
/// assert_eq!(board.box_size(), 2);
/// assert_eq!(board.count_empty_cells(), 8);
///
/// let err = Board::from_rows(&[[1, 2, 3], [2, 3, 1], [3, 1, 2]]).unwrap_err();
/// assert_eq!(err, BoardError::NotPerfectSquare { size: 3 });
/// # Ok::<(), BoardError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Board {
    size: usize,
    box_size: usize,
    cells: Vec<u8>,
}

impl Board {
    /// Builds a board from its rows.
    ///
    /// Fails when there are no rows, when the side is not a perfect square (or too large to
    /// store its values in a `u8`), when a row does not have exactly `N` columns, or when a
    /// value exceeds `N`.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, BoardError>
    where
        R: AsRef<[u8]>,
    {
        let size = rows.len();
        if size == 0 {
            return Err(BoardError::Empty);
        }
        if size > usize::from(u8::MAX) {
            return Err(BoardError::TooLarge { size });
        }
        let box_size = size.isqrt();
        if box_size * box_size != size {
            return Err(BoardError::NotPerfectSquare { size });
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(BoardError::RaggedRow {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if usize::from(value) > size {
                    return Err(BoardError::ValueOutOfRange {
                        row,
                        col,
                        value,
                        max: size,
                    });
                }
            }
            cells.extend_from_slice(values);
        }

        Ok(Self {
            size,
            box_size,
            cells,
        })
    }

    /// Creates an empty board of side `size`.
    pub fn empty(size: usize) -> Result<Self, BoardError> {
        Self::from_rows(&vec![vec![EMPTY; size]; size])
    }

    /// Side length `N` of the board.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Side length `n = √N` of a box.
    #[must_use]
    pub fn box_size(&self) -> usize {
        self.box_size
    }

    /// Largest value a cell can hold (equal to the side length).
    #[must_use]
    pub fn max_value(&self) -> u8 {
        // from_rows caps the side at u8::MAX
        u8::try_from(self.size).unwrap_or(u8::MAX)
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.size + col]
    }

    /// Writes `value` into a cell. Use [`EMPTY`] to clear it.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the board or `value` exceeds `N`.
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        assert!(
            usize::from(value) <= self.size,
            "value {value} out of range for board of size {}",
            self.size
        );
        self.cells[row * self.size + col] = value;
    }

    #[must_use]
    pub fn is_empty_cell(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == EMPTY
    }

    /// Iterates over the rows of the board.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(self.size)
    }

    /// Iterates over all cell coordinates in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| (row, col)))
    }

    /// Top-left coordinates of every box, in row-major order.
    pub fn box_origins(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let (size, box_size) = (self.size, self.box_size);
        (0..size)
            .step_by(box_size)
            .flat_map(move |row| (0..size).step_by(box_size).map(move |col| (row, col)))
    }

    fn box_origin(&self, row: usize, col: usize) -> (usize, usize) {
        (row - row % self.box_size, col - col % self.box_size)
    }

    fn box_cells(&self, row: usize, col: usize) -> impl Iterator<Item = u8> + '_ {
        let (top, left) = self.box_origin(row, col);
        (top..top + self.box_size)
            .flat_map(move |r| (left..left + self.box_size).map(move |c| self.get(r, c)))
    }

    fn col_cells(&self, col: usize) -> impl Iterator<Item = u8> + '_ {
        (0..self.size).map(move |row| self.get(row, col))
    }

    #[must_use]
    pub fn count_empty_cells(&self) -> usize {
        self.cells.iter().filter(|&&v| v == EMPTY).count()
    }

    #[must_use]
    pub fn count_empty_in_row(&self, row: usize) -> usize {
        self.cells[row * self.size..][..self.size]
            .iter()
            .filter(|&&v| v == EMPTY)
            .count()
    }

    #[must_use]
    pub fn count_empty_in_col(&self, col: usize) -> usize {
        self.col_cells(col).filter(|&v| v == EMPTY).count()
    }

    /// Counts empty cells in the box containing `(row, col)`.
    #[must_use]
    pub fn count_empty_in_box(&self, row: usize, col: usize) -> usize {
        self.box_cells(row, col).filter(|&v| v == EMPTY).count()
    }

    /// Counts how many times `value` appears anywhere on the board.
    #[must_use]
    pub fn count_value(&self, value: u8) -> usize {
        self.cells.iter().filter(|&&v| v == value).count()
    }

    #[must_use]
    pub fn row_contains(&self, row: usize, value: u8) -> bool {
        self.cells[row * self.size..][..self.size].contains(&value)
    }

    #[must_use]
    pub fn col_contains(&self, col: usize, value: u8) -> bool {
        self.col_cells(col).any(|v| v == value)
    }

    /// Returns whether the box containing `(row, col)` holds `value`.
    #[must_use]
    pub fn box_contains(&self, row: usize, col: usize, value: u8) -> bool {
        self.box_cells(row, col).any(|v| v == value)
    }

    /// Returns whether `value` can be written at `(row, col)` without repeating a value
    /// in the cell's row, column, or box.
    #[must_use]
    pub fn is_legal(&self, row: usize, col: usize, value: u8) -> bool {
        !(self.row_contains(row, value)
            || self.col_contains(col, value)
            || self.box_contains(row, col, value))
    }

    /// Returns whether every filled value is unique in its row, column, and box.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.positions().all(|(row, col)| {
            let value = self.get(row, col);
            if value == EMPTY {
                return true;
            }
            let row_count = self.cells[row * self.size..][..self.size]
                .iter()
                .filter(|&&v| v == value)
                .count();
            let col_count = self.col_cells(col).filter(|&v| v == value).count();
            let box_count = self.box_cells(row, col).filter(|&v| v == value).count();
            row_count == 1 && col_count == 1 && box_count == 1
        })
    }

    /// Returns whether the board is full and consistent.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.count_empty_cells() == 0 && self.is_consistent()
    }
}

impl TryFrom<Vec<Vec<u8>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<Board> for Vec<Vec<u8>> {
    fn from(board: Board) -> Self {
        board.rows().map(<[u8]>::to_vec).collect()
    }
}

/// Renders the grid with boxes separated by extra spacing.
///
/// ```text
/// 1 2  3 4
/// 3 4  1 2
///
/// 2 1  4 3
/// 4 3  2 .
/// ```
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.size.to_string().len();
        for (r, row) in self.rows().enumerate() {
            if r > 0 && r % self.box_size == 0 {
                writeln!(f)?;
            }
            for (c, &value) in row.iter().enumerate() {
                if c > 0 {
                    let sep = if c % self.box_size == 0 { "  " } else { " " };
                    f.write_str(sep)?;
                }
                if value == EMPTY {
                    write!(f, "{:>width$}", ".")?;
                } else {
                    write!(f, "{value:>width$}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLVED_9X9: [[u8; 9]; 9] = [
        [5, 3, 4, 6, 7, 8, 9, 1, 2],
        [6, 7, 2, 1, 9, 5, 3, 4, 8],
        [1, 9, 8, 3, 4, 2, 5, 6, 7],
        [8, 5, 9, 7, 6, 1, 4, 2, 3],
        [4, 2, 6, 8, 5, 3, 7, 9, 1],
        [7, 1, 3, 9, 2, 4, 8, 5, 6],
        [9, 6, 1, 5, 3, 7, 2, 8, 4],
        [2, 8, 7, 4, 1, 9, 6, 3, 5],
        [3, 4, 5, 2, 8, 6, 1, 7, 9],
    ];

    #[test]
    fn test_valid_sizes_are_accepted() {
        for size in [1, 4, 9, 16, 25] {
            let board = Board::empty(size).unwrap();
            assert_eq!(board.size(), size);
            assert_eq!(board.box_size() * board.box_size(), size);
            assert_eq!(board.count_empty_cells(), size * size);
        }
    }

    #[test]
    fn test_non_square_sizes_are_rejected() {
        for size in [2, 3, 5, 8, 10] {
            assert_eq!(
                Board::empty(size).unwrap_err(),
                BoardError::NotPerfectSquare { size },
                "size {size} should be rejected"
            );
        }
        let rows: Vec<Vec<u8>> = vec![];
        assert_eq!(Board::from_rows(&rows).unwrap_err(), BoardError::Empty);
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let rows = vec![vec![0, 0, 0, 0], vec![0, 0, 0], vec![0; 4], vec![0; 4]];
        assert_eq!(
            Board::from_rows(&rows).unwrap_err(),
            BoardError::RaggedRow {
                row: 1,
                len: 3,
                expected: 4
            }
        );
    }

    #[test]
    fn test_out_of_range_value_is_rejected() {
        let rows = [[0, 0, 0, 0], [0, 5, 0, 0], [0; 4], [0; 4]];
        assert!(matches!(
            Board::from_rows(&rows),
            Err(BoardError::ValueOutOfRange { row: 1, col: 1, .. })
        ));
    }

    #[test]
    fn test_unit_queries() {
        let mut rows = SOLVED_9X9;
        rows[0][0] = 0;
        rows[0][1] = 0;
        rows[4][4] = 0;
        let board = Board::from_rows(&rows).unwrap();

        assert_eq!(board.count_empty_cells(), 3);
        assert_eq!(board.count_empty_in_row(0), 2);
        assert_eq!(board.count_empty_in_col(0), 1);
        assert_eq!(board.count_empty_in_box(1, 2), 2);
        assert_eq!(board.count_empty_in_box(3, 3), 1);
        assert_eq!(board.count_value(5), 8);

        assert!(!board.row_contains(0, 5));
        assert!(board.row_contains(0, 4));
        assert!(board.col_contains(0, 6));
        assert!(!board.box_contains(4, 4, 5));

        assert!(board.is_legal(0, 0, 5));
        assert!(!board.is_legal(0, 0, 3));
        assert!(board.is_consistent());
        assert!(!board.is_solved());
    }

    #[test]
    fn test_solved_board() {
        let board = Board::from_rows(&SOLVED_9X9).unwrap();
        assert!(board.is_solved());

        let mut broken = board.clone();
        broken.set(0, 0, 3);
        assert!(!broken.is_consistent());
    }

    #[test]
    fn test_box_origins() {
        let board = Board::empty(4).unwrap();
        let origins: Vec<_> = board.box_origins().collect();
        assert_eq!(origins, vec![(0, 0), (0, 2), (2, 0), (2, 2)]);
    }

    #[test]
    fn test_display_groups_boxes() {
        let board = Board::from_rows(&[[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 0]])
            .unwrap();
        assert_eq!(
            board.to_string(),
            "1 2  3 4\n3 4  1 2\n\n2 1  4 3\n4 3  2 .\n"
        );
    }

    #[test]
    fn test_serde_as_nested_rows() {
        let board = Board::from_rows(&[[1, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, "[[1,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,4]]");
        let parsed: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, board);

        assert!(serde_json::from_str::<Board>("[[1,2],[2,1]]").is_err());
    }
}
