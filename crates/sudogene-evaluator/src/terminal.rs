//! Terminal operations: the leaves of a heuristic program.
//!
//! Every terminal measures one feature of the current play state for a candidate move
//! `(row, col, value)`. Terminals are pure: they read the [`ScoringContext`] and never
//! modify it.
//!
//! | Terminal | Measures |
//! |---|---|
//! | `countEmptyCellInRow` | empty cells in the move's row |
//! | `countEmptyCellInCol` | empty cells in the move's column |
//! | `countEmptyCellInSquare` | empty cells in the move's box |
//! | `numOfOptionsInCell` | candidates left for the move's cell |
//! | `numOfOptionsToAppearInBoard` | how many more times the value may still be placed |
//! | `countEmptyCellsInRowsContainsNum` | empty cells in rows already holding the value |
//! | `countEmptyCellsInColsContainsNum` | empty cells in columns already holding the value |
//! | `countEmptyCellsInSquareContainsNum` | empty cells in boxes already holding the value |
//! | `countEmptyCellsInRowsThatNotContainsNum` | empty cells in rows missing the value |
//! | `countEmptyCellsInColsThatNotContainsNum` | empty cells in columns missing the value |
//! | `countEmptyCellsInSquareThatNotContainsNum` | empty cells in boxes missing the value |

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sudogene_engine::{Board, CandidateGrades};

use crate::ExprError;

/// The state a program reads when scoring one candidate move.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub row: usize,
    pub col: usize,
    pub value: u8,
    pub board: &'a Board,
    pub grades: &'a CandidateGrades,
}

/// A leaf computation of a heuristic program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TerminalOp {
    CountEmptyCellInRow,
    CountEmptyCellInCol,
    CountEmptyCellInSquare,
    NumOfOptionsInCell,
    NumOfOptionsToAppearInBoard,
    CountEmptyCellsInRowsContainsNum,
    CountEmptyCellsInColsContainsNum,
    CountEmptyCellsInSquareContainsNum,
    CountEmptyCellsInRowsThatNotContainsNum,
    CountEmptyCellsInColsThatNotContainsNum,
    CountEmptyCellsInSquareThatNotContainsNum,
}

impl TerminalOp {
    pub const ALL: [Self; 11] = [
        Self::CountEmptyCellInRow,
        Self::CountEmptyCellInCol,
        Self::CountEmptyCellInSquare,
        Self::NumOfOptionsInCell,
        Self::NumOfOptionsToAppearInBoard,
        Self::CountEmptyCellsInRowsContainsNum,
        Self::CountEmptyCellsInColsContainsNum,
        Self::CountEmptyCellsInSquareContainsNum,
        Self::CountEmptyCellsInRowsThatNotContainsNum,
        Self::CountEmptyCellsInColsThatNotContainsNum,
        Self::CountEmptyCellsInSquareThatNotContainsNum,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CountEmptyCellInRow => "countEmptyCellInRow",
            Self::CountEmptyCellInCol => "countEmptyCellInCol",
            Self::CountEmptyCellInSquare => "countEmptyCellInSquare",
            Self::NumOfOptionsInCell => "numOfOptionsInCell",
            Self::NumOfOptionsToAppearInBoard => "numOfOptionsToAppearInBoard",
            Self::CountEmptyCellsInRowsContainsNum => "countEmptyCellsInRowsContainsNum",
            Self::CountEmptyCellsInColsContainsNum => "countEmptyCellsInColsContainsNum",
            Self::CountEmptyCellsInSquareContainsNum => "countEmptyCellsInSquareContainsNum",
            Self::CountEmptyCellsInRowsThatNotContainsNum => {
                "countEmptyCellsInRowsThatNotContainsNum"
            }
            Self::CountEmptyCellsInColsThatNotContainsNum => {
                "countEmptyCellsInColsThatNotContainsNum"
            }
            Self::CountEmptyCellsInSquareThatNotContainsNum => {
                "countEmptyCellsInSquareThatNotContainsNum"
            }
        }
    }

    /// Scores the candidate move described by `ctx`.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn evaluate(self, ctx: &ScoringContext<'_>) -> f64 {
        let ScoringContext {
            row,
            col,
            value,
            board,
            grades,
        } = *ctx;
        let count = match self {
            Self::CountEmptyCellInRow => board.count_empty_in_row(row),
            Self::CountEmptyCellInCol => board.count_empty_in_col(col),
            Self::CountEmptyCellInSquare => board.count_empty_in_box(row, col),
            Self::NumOfOptionsInCell => grades.option_count(row, col),
            Self::NumOfOptionsToAppearInBoard => {
                board.size().saturating_sub(board.count_value(value))
            }
            Self::CountEmptyCellsInRowsContainsNum => empty_in_rows(board, value, true),
            Self::CountEmptyCellsInColsContainsNum => empty_in_cols(board, value, true),
            Self::CountEmptyCellsInSquareContainsNum => empty_in_boxes(board, value, true),
            Self::CountEmptyCellsInRowsThatNotContainsNum => empty_in_rows(board, value, false),
            Self::CountEmptyCellsInColsThatNotContainsNum => empty_in_cols(board, value, false),
            Self::CountEmptyCellsInSquareThatNotContainsNum => {
                empty_in_boxes(board, value, false)
            }
        };
        count as f64
    }
}

fn empty_in_rows(board: &Board, value: u8, contains: bool) -> usize {
    (0..board.size())
        .filter(|&row| board.row_contains(row, value) == contains)
        .map(|row| board.count_empty_in_row(row))
        .sum()
}

fn empty_in_cols(board: &Board, value: u8, contains: bool) -> usize {
    (0..board.size())
        .filter(|&col| board.col_contains(col, value) == contains)
        .map(|col| board.count_empty_in_col(col))
        .sum()
}

fn empty_in_boxes(board: &Board, value: u8, contains: bool) -> usize {
    board
        .box_origins()
        .filter(|&(row, col)| board.box_contains(row, col, value) == contains)
        .map(|(row, col)| board.count_empty_in_box(row, col))
        .sum()
}

impl fmt::Display for TerminalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a terminal by name.
///
/// The older spelling with an underscore before `ThatNotContainsNum`
/// (`countEmptyCellsInRows_ThatNotContainsNum`) is accepted as well.
///
/// ```
/// use sudogene_evaluator::terminal::TerminalOp;
///
/// let op: TerminalOp = "numOfOptionsInCell".parse()?;
/// assert_eq!(op, TerminalOp::NumOfOptionsInCell);
///
/// let op: TerminalOp = "countEmptyCellsInCols_ThatNotContainsNum".parse()?;
/// assert_eq!(op, TerminalOp::CountEmptyCellsInColsThatNotContainsNum);
///
/// assert!("countFullCells".parse::<TerminalOp>().is_err());
/// # Ok::<(), sudogene_evaluator::ExprError>(())
/// ```
impl FromStr for TerminalOp {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace("_ThatNot", "ThatNot");
        Self::ALL
            .into_iter()
            .find(|op| op.name() == normalized)
            .ok_or_else(|| ExprError::UnknownTerminal(s.to_owned()))
    }
}

impl TryFrom<String> for TerminalOp {
    type Error = ExprError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TerminalOp> for String {
    fn from(op: TerminalOp) -> Self {
        op.name().to_owned()
    }
}
