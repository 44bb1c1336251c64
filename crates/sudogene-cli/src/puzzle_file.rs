//! Puzzle collections stored as text.
//!
//! A puzzle file holds any number of boards. Each board starts with a header line
//! beginning with `G`, followed by its `N × N` cells in row-major order. Cells are
//! base-36 digits (`0` = empty, `1`-`9`, then `A` = 10 and so on), and whitespace
//! between them is ignored, so a board may be written on one line or as `N` lines:
//!
//! ```text
//! Grid 01
//! 1200
//! 0012
//! 2100
//! 0000
//! ```
//!
//! Every line starting with `G` opens a new board, so a row of a 16×16 board must not
//! begin with the cell value 16.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail, ensure};
use log::warn;
use rand::Rng;
use sudogene_engine::Board;

#[derive(Debug, Clone)]
pub struct PuzzleFile {
    path: PathBuf,
    size: usize,
    puzzles: Vec<String>,
}

impl PuzzleFile {
    /// Reads every puzzle of side `size` from the file at `path`.
    pub fn open<P>(path: P, size: usize) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read puzzle file: {}", path.display()))?;
        Self::from_text(path, &text, size)
    }

    /// Splits `text` into puzzles; `path` is only used in messages.
    pub fn from_text<P>(path: P, text: &str, size: usize) -> anyhow::Result<Self>
    where
        P: Into<PathBuf>,
    {
        ensure!(
            (1..36).contains(&size),
            "Puzzle side {size} cannot be written with base-36 digits"
        );

        let mut puzzles = vec![];
        let mut current: Option<String> = None;
        for line in text.lines() {
            if line.starts_with('G') {
                puzzles.extend(current.replace(String::new()));
            } else if let Some(cells) = &mut current {
                cells.extend(line.chars().filter(|ch| !ch.is_whitespace()));
            }
        }
        puzzles.extend(current);

        Ok(Self {
            path: path.into(),
            size,
            puzzles,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn count_boards(&self) -> usize {
        self.puzzles.len()
    }

    /// Decodes the puzzle at `index` (0-based).
    pub fn load_board(&self, index: usize) -> anyhow::Result<Board> {
        let Some(cells) = self.puzzles.get(index) else {
            bail!(
                "Puzzle index {index} is out of range: {} holds {} boards",
                self.path.display(),
                self.count_boards()
            );
        };

        let expected = self.size * self.size;
        let values = cells
            .chars()
            .map(|ch| {
                ch.to_digit(36)
                    .and_then(|digit| u8::try_from(digit).ok())
                    .with_context(|| format!("Puzzle {index} has invalid cell character {ch:?}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        ensure!(
            values.len() >= expected,
            "Puzzle {index} has {} cells, expected {expected}",
            values.len()
        );
        if values.len() > expected {
            warn!(
                "puzzle {index} has {} trailing cells, ignoring them",
                values.len() - expected
            );
        }

        let rows = values[..expected].chunks(self.size).collect::<Vec<_>>();
        let board =
            Board::from_rows(&rows).with_context(|| format!("Puzzle {index} is not a board"))?;
        Ok(board)
    }

    /// Picks a puzzle uniformly at random, returning its index with the board.
    pub fn load_random_board<R>(&self, rng: &mut R) -> anyhow::Result<(usize, Board)>
    where
        R: Rng + ?Sized,
    {
        ensure!(
            !self.puzzles.is_empty(),
            "{} holds no puzzles",
            self.path.display()
        );
        let index = rng.random_range(0..self.puzzles.len());
        Ok((index, self.load_board(index)?))
    }
}
