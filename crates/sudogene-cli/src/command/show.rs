use std::path::PathBuf;

use crate::puzzle_file::PuzzleFile;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ShowArg {
    /// Puzzle file to read
    #[arg(long)]
    puzzles: PathBuf,
    /// Side length of the puzzles in the file
    #[arg(long, default_value_t = 9)]
    size: usize,
    /// Index of the puzzle to print; random when omitted
    #[arg(long)]
    index: Option<usize>,
}

pub(crate) fn run(arg: &ShowArg) -> anyhow::Result<()> {
    let ShowArg {
        puzzles,
        size,
        index,
    } = arg;
    let file = PuzzleFile::open(puzzles, *size)?;
    let (index, board) = match index {
        Some(index) => (*index, file.load_board(*index)?),
        None => file.load_random_board(&mut rand::rng())?,
    };

    println!("File path: {}", file.path().display());
    println!("Boards: {}", file.count_boards());
    println!("Board size: {size}");
    println!("Board index: {index}");
    println!("Empty cells: {}", board.count_empty_cells());
    println!();
    println!("{board}");
    Ok(())
}
