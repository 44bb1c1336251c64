//! CSV progress reports.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::NaiveDateTime;
use sudogene_evaluator::function_set::FunctionSet;
use sudogene_training::{
    board_solver::BoardSolver,
    config::ExperimentConfig,
    evolution::{EvolutionObserver, EvolutionOutcome, GenerationReport},
    individual::Individual,
};

const TITLE: &str = "Genetic Sudoku Experiment";

const COLUMNS: [&str; 6] = [
    "Generation",
    "Worst Individual Fitness",
    "Best Individual Fitness",
    "Average Fitness",
    "Best Individual Tree - Prefix",
    "Best Individual Tree - Infix",
];

/// Experiment description written at the top of a report.
#[derive(Debug, Clone, Copy)]
pub struct ReportHeader<'a> {
    pub started_at: NaiveDateTime,
    pub original_empty_cells: usize,
    pub config: &'a ExperimentConfig,
    pub function_set: &'a FunctionSet,
}

/// Report file name for an experiment started at `started_at`.
#[must_use]
pub fn file_name(started_at: NaiveDateTime) -> String {
    format!("{}.csv", started_at.format("%d-%m-%Y_%H-%M-%S"))
}

/// Writes one CSV row per generation.
#[derive(Debug)]
pub struct CsvReport<W> {
    writer: W,
}

impl CsvReport<BufWriter<File>> {
    /// Creates `dir` if needed and a new report file named after the start time.
    pub fn create(dir: &Path, header: &ReportHeader<'_>) -> anyhow::Result<(Self, PathBuf)> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;
        let path = dir.join(file_name(header.started_at));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        let mut report = Self::new(BufWriter::new(file));
        report
            .write_header(header)
            .with_context(|| format!("Failed to write report file: {}", path.display()))?;
        Ok((report, path))
    }
}

impl<W> CsvReport<W>
where
    W: Write,
{
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_header(&mut self, header: &ReportHeader<'_>) -> io::Result<()> {
        let ReportHeader {
            started_at,
            original_empty_cells,
            config,
            function_set,
        } = header;

        self.write_row([TITLE])?;
        let time = started_at.format("%d/%m/%Y %H:%M:%S").to_string();
        self.write_row([format!("Experiment Time: {time}")])?;
        self.write_row(["Experiment Parameters:"])?;
        let parameters = [
            ("Original Empty Cells:", original_empty_cells.to_string()),
            ("Population Size:", config.population_size.to_string()),
            ("Max Generations:", config.max_generations.to_string()),
            ("Crossover Probability:", config.crossover_prob.to_string()),
            ("Mutation Probability:", config.mutation_prob.to_string()),
            (
                "Percent of good individuals from population:",
                config.good_population_percent.to_string(),
            ),
            ("Tree Height:", config.tree_height.to_string()),
        ];
        for (name, value) in parameters {
            self.write_row([name, value.as_str()])?;
        }
        if let Some(seed) = config.seed {
            self.write_row(["Seed:".to_owned(), seed.to_string()])?;
        }
        self.write_row([""])?;

        self.write_row(["Primitive Set:"])?;
        self.write_row(function_set.primitives().iter().map(|op| op.name()))?;
        self.write_row(["Terminal Set:"])?;
        self.write_row(function_set.terminals().iter().map(|op| op.name()))?;
        self.write_row([""])?;
        self.write_row([""])?;
        self.write_row(COLUMNS)
    }

    fn write_row<I, S>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.writer.write_all(b",")?;
            }
            write_field(&mut self.writer, field.as_ref())?;
        }
        self.writer.write_all(b"\n")
    }
}

fn write_field<W>(writer: &mut W, field: &str) -> io::Result<()>
where
    W: Write,
{
    if field.contains([',', '"', '\n']) {
        write!(writer, "\"{}\"", field.replace('"', "\"\""))
    } else {
        writer.write_all(field.as_bytes())
    }
}

impl<W> EvolutionObserver<BoardSolver> for CsvReport<W>
where
    W: Write,
{
    type Error = io::Error;

    fn on_generation(&mut self, report: &GenerationReport<'_, BoardSolver>) -> io::Result<()> {
        let best = report.best.program();
        self.write_row([
            report.generation.to_string(),
            report.worst.fitness().to_string(),
            report.best.fitness().to_string(),
            report.average_fitness.to_string(),
            best.to_prefix(),
            best.to_infix(),
        ])
    }

    fn on_finish(&mut self, _outcome: &EvolutionOutcome<BoardSolver>) -> io::Result<()> {
        self.writer.flush()
    }
}
