//! Per-generation progress printed while evolving.

use std::io::{self, Write};

use sudogene_training::{
    board_solver::BoardSolver,
    evolution::{EvolutionObserver, GenerationReport},
    individual::Individual as _,
};

/// Prints the fitness summary of every generation.
#[derive(Debug)]
pub struct Progress<W> {
    writer: W,
    max_generations: usize,
}

impl<W> Progress<W>
where
    W: Write,
{
    #[must_use]
    pub fn new(writer: W, max_generations: usize) -> Self {
        Self {
            writer,
            max_generations,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> EvolutionObserver<BoardSolver> for Progress<W>
where
    W: Write,
{
    type Error = io::Error;

    fn on_generation(&mut self, report: &GenerationReport<'_, BoardSolver>) -> io::Result<()> {
        let stats = &report.fitness_stats;
        let w = &mut self.writer;
        writeln!(
            w,
            "Generation #{}/{}:",
            report.generation, self.max_generations
        )?;
        writeln!(w, "  Best Program: {}", report.best.program().to_infix())?;
        writeln!(w, "  Fitness Stats:")?;
        writeln!(w, "    Min:    {:.3}", stats.min)?;
        writeln!(w, "    Max:    {:.3}", stats.max)?;
        writeln!(w, "    Mean:   {:.3}", stats.mean)?;
        writeln!(w, "    Median: {:.3}", stats.median)?;
        writeln!(w, "    StdDev: {:.3}", stats.std_dev)?;
        w.flush()
    }
}
